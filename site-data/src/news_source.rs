use std::path::PathBuf;

use async_trait::async_trait;
use site_core::{
    NewsArticle,
    news::{NewsError, NewsSource},
};
use tracing::debug;

/// Reads the news feed from a JSON array on disk.
///
/// ```json
/// [{"id": "1", "title": "…", "excerpt": "…", "category": "Cloud",
///   "author": "…", "date": "2024-03-15"}]
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileNewsSource {
    path: PathBuf,
}

impl JsonFileNewsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NewsSource for JsonFileNewsSource {
    async fn fetch(&self) -> Result<Vec<NewsArticle>, NewsError> {
        debug!(path = %self.path.display(), "reading news feed");
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| NewsError::Unavailable(format!("{}: {e}", self.path.display())))?;
        serde_json::from_slice(&bytes).map_err(|e| NewsError::Malformed(e.to_string()))
    }
}
