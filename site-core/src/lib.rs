pub mod calculations;
pub mod confirmation;
pub mod controller;
pub mod gallery;
pub mod models;
pub mod news;
pub mod submission;
pub mod surface;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{Command, Effect, PageController};
pub use models::*;
pub use surface::PresentationSurface;
