//! Loaders for the static data the site pages consume.

pub mod catalog_loader;
pub mod gallery_loader;
pub mod news_source;

pub use catalog_loader::{CatalogLoadError, CatalogLoader, CatalogRecord, EntryKind};
pub use gallery_loader::{GalleryLoadError, GalleryLoader};
pub use news_source::JsonFileNewsSource;
