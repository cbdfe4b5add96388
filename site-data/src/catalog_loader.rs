//! CSV loader for the budget form's price catalog.
//!
//! ## CSV Format
//!
//! | Column  | Type    | Notes                                  |
//! |---------|---------|----------------------------------------|
//! | `kind`  | string  | `product` or `add_on`                  |
//! | `id`    | string  | Unique per kind                        |
//! | `label` | string  | Shown in selectors and the summary     |
//! | `price` | decimal | Non-negative, e.g. `1499.99`           |
//!
//! ```csv
//! kind,id,label,price
//! product,web,Corporate website,1200.00
//! add_on,seo,SEO optimisation,250.00
//! ```
//!
//! Loading fails on the first bad row: an unknown `kind`, an unparseable
//! price, or any entry [`Catalog::new`] rejects.

use std::{io::Read, path::Path, str::FromStr};

use rust_decimal::Decimal;
use serde::Deserialize;
use site_core::{AddOn, AddOnId, Catalog, CatalogError, Product, ProductId};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("cannot read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, not counting the header.
    #[error("unrecognised entry kind '{kind}' on row {row}")]
    UnknownKind { kind: String, row: usize },

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Product,
    AddOn,
}

impl FromStr for EntryKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            "add_on" | "addon" => Ok(Self::AddOn),
            _ => Err(()),
        }
    }
}

/// A single row of the catalog CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub kind: String,
    pub id: String,
    pub label: String,
    pub price: Decimal,
}

pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse catalog records from any reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, CatalogLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: CatalogRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Split records into products and add-ons and validate them as a catalog.
    pub fn build(records: Vec<CatalogRecord>) -> Result<Catalog, CatalogLoadError> {
        let mut products = Vec::new();
        let mut add_ons = Vec::new();

        for (idx, record) in records.into_iter().enumerate() {
            let kind = record
                .kind
                .parse::<EntryKind>()
                .map_err(|()| CatalogLoadError::UnknownKind {
                    kind: record.kind.clone(),
                    row: idx + 1,
                })?;

            match kind {
                EntryKind::Product => products.push(Product {
                    id: ProductId::new(record.id),
                    label: record.label,
                    price: record.price,
                }),
                EntryKind::AddOn => add_ons.push(AddOn {
                    id: AddOnId::new(record.id),
                    label: record.label,
                    price: record.price,
                }),
            }
        }

        debug!(products = products.len(), add_ons = add_ons.len(), "building catalog");
        Ok(Catalog::new(products, add_ons)?)
    }

    pub fn load_from_str(input: &str) -> Result<Catalog, CatalogLoadError> {
        Self::build(Self::parse(input.as_bytes())?)
    }

    pub fn load_from_file(path: &Path) -> Result<Catalog, CatalogLoadError> {
        let file = std::fs::File::open(path)?;
        let catalog = Self::build(Self::parse(file)?)?;
        info!(path = %path.display(), "catalog loaded");
        Ok(catalog)
    }
}
