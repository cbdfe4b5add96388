//! Host configuration, read from a TOML file.
//!
//! ```toml
//! catalog_path = "data/catalog.csv"
//! news_path = "data/news.json"
//! gallery_path = "data/gallery.csv"
//! submit_delay_ms = 2000
//! reset_delay_ms = 300
//!
//! [logging]
//! level = "info"
//! stdout = true
//! file = "site.log"
//! ```
//!
//! Every key is optional. A missing file yields [`AppConfig::default`].

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use site_core::{controller::DEFAULT_RESET_DELAY, submission::DEFAULT_SUBMIT_DELAY};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    pub stdout: bool,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            stdout: true,
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub news_path: Option<PathBuf>,
    pub gallery_path: Option<PathBuf>,
    pub submit_delay_ms: u64,
    pub reset_delay_ms: u64,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("catalog.csv"),
            news_path: None,
            gallery_path: None,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY.as_millis() as u64,
            reset_delay_ms: DEFAULT_RESET_DELAY.as_millis() as u64,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}
