//! CSV loader for the portfolio gallery.
//!
//! Columns: `id,title,description,category`. Ids must be unique; they name
//! the detail modal of each project.

use std::{collections::HashSet, io::Read, path::Path};

use site_core::GalleryItem;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum GalleryLoadError {
    #[error("cannot read gallery file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("duplicate gallery id '{id}' on row {row}")]
    DuplicateId { id: String, row: usize },
}

pub struct GalleryLoader;

impl GalleryLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<GalleryItem>, GalleryLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for (idx, result) in csv_reader.deserialize().enumerate() {
            let item: GalleryItem = result?;
            if !seen.insert(item.id.clone()) {
                return Err(GalleryLoadError::DuplicateId {
                    id: item.id,
                    row: idx + 1,
                });
            }
            items.push(item);
        }

        Ok(items)
    }

    pub fn load_from_file(path: &Path) -> Result<Vec<GalleryItem>, GalleryLoadError> {
        let items = Self::parse(std::fs::File::open(path)?)?;
        info!(path = %path.display(), count = items.len(), "gallery loaded");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_reads_items() {
        let csv = "id,title,description,category\n\
                   p1,Corporate Portal,Intranet for a bank,web\n\
                   p2,Fitness App,Workout tracking,mobile\n";

        let items = GalleryLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].category, "mobile");
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let csv = "id,title,description,category\np1,A,a,web\np1,B,b,web\n";

        let err = GalleryLoader::parse(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, GalleryLoadError::DuplicateId { row: 2, .. }));
    }
}
