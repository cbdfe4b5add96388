use serde::{Deserialize, Serialize};

/// A project tile in the portfolio gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
}
