pub mod config;
pub mod console;
pub mod logging;
pub mod session;

pub use config::{AppConfig, ConfigError, LoggingConfig};
pub use console::ConsoleSurface;
pub use session::{Event, Input, Session};
