use std::{collections::BTreeMap, fmt};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a product in the [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of an add-on in the [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddOnId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AddOnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AddOnId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub label: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: AddOnId,
    pub label: String,
    pub price: Decimal,
}

/// Highest price a catalog entry may carry. Keeps every estimate sum well
/// inside `Decimal` range.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Errors raised while building a [`Catalog`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{kind} entry has an empty id")]
    EmptyId { kind: &'static str },

    #[error("{kind} '{id}' has an empty label")]
    EmptyLabel { kind: &'static str, id: String },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{kind} '{id}' has a negative price {price}")]
    NegativePrice {
        kind: &'static str,
        id: String,
        price: Decimal,
    },

    #[error("{kind} '{id}' has a price {price} above the {max} limit", max = MAX_PRICE)]
    PriceTooLarge {
        kind: &'static str,
        id: String,
        price: Decimal,
    },
}

/// Products and add-ons offered on the budget form.
///
/// A catalog can only be obtained through [`Catalog::new`], which rejects
/// empty ids or labels, duplicate ids, and negative or oversized prices. Everything
/// downstream can therefore assume a well-formed price list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
    add_ons: BTreeMap<AddOnId, AddOn>,
}

impl Catalog {
    pub fn new(
        products: Vec<Product>,
        add_ons: Vec<AddOn>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for product in products {
            check_entry("product", product.id.as_str(), &product.label, product.price)?;
            if catalog.products.contains_key(&product.id) {
                return Err(CatalogError::DuplicateId {
                    kind: "product",
                    id: product.id.to_string(),
                });
            }
            catalog.products.insert(product.id.clone(), product);
        }

        for add_on in add_ons {
            check_entry("add-on", add_on.id.as_str(), &add_on.label, add_on.price)?;
            if catalog.add_ons.contains_key(&add_on.id) {
                return Err(CatalogError::DuplicateId {
                    kind: "add-on",
                    id: add_on.id.to_string(),
                });
            }
            catalog.add_ons.insert(add_on.id.clone(), add_on);
        }

        Ok(catalog)
    }

    pub fn product(
        &self,
        id: &ProductId,
    ) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn add_on(
        &self,
        id: &AddOnId,
    ) -> Option<&AddOn> {
        self.add_ons.get(id)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn add_ons(&self) -> impl Iterator<Item = &AddOn> {
        self.add_ons.values()
    }
}

fn check_entry(
    kind: &'static str,
    id: &str,
    label: &str,
    price: Decimal,
) -> Result<(), CatalogError> {
    if id.trim().is_empty() {
        return Err(CatalogError::EmptyId { kind });
    }
    if label.trim().is_empty() {
        return Err(CatalogError::EmptyLabel {
            kind,
            id: id.to_string(),
        });
    }
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CatalogError::NegativePrice {
            kind,
            id: id.to_string(),
            price,
        });
    }
    if price > MAX_PRICE {
        return Err(CatalogError::PriceTooLarge {
            kind,
            id: id.to_string(),
            price,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn product(
        id: &str,
        price: Decimal,
    ) -> Product {
        Product {
            id: ProductId::new(id),
            label: format!("{id} label"),
            price,
        }
    }

    fn add_on(
        id: &str,
        price: Decimal,
    ) -> AddOn {
        AddOn {
            id: AddOnId::new(id),
            label: format!("{id} label"),
            price,
        }
    }

    #[test]
    fn new_indexes_products_and_add_ons() {
        let catalog = Catalog::new(
            vec![product("web", dec!(100.00)), product("app", dec!(250.00))],
            vec![add_on("seo", dec!(20.00))],
        )
        .unwrap();

        assert_eq!(
            catalog.product(&ProductId::new("app")).map(|p| p.price),
            Some(dec!(250.00))
        );
        assert_eq!(
            catalog.add_on(&AddOnId::new("seo")).map(|a| a.price),
            Some(dec!(20.00))
        );
        assert_eq!(catalog.products().count(), 2);
    }

    #[test]
    fn new_rejects_duplicate_product_ids() {
        let result = Catalog::new(
            vec![product("web", dec!(100.00)), product("web", dec!(90.00))],
            vec![],
        );

        assert_eq!(
            result,
            Err(CatalogError::DuplicateId {
                kind: "product",
                id: "web".to_string(),
            })
        );
    }

    #[test]
    fn new_rejects_negative_add_on_price() {
        let result = Catalog::new(vec![], vec![add_on("seo", dec!(-1.00))]);

        assert!(matches!(result, Err(CatalogError::NegativePrice { .. })));
    }

    #[test]
    fn new_accepts_zero_price() {
        let result = Catalog::new(vec![product("free", dec!(0.00))], vec![]);

        assert!(result.is_ok());
    }

    #[test]
    fn new_rejects_price_above_limit() {
        let result = Catalog::new(vec![], vec![add_on("gold", Decimal::MAX / dec!(2))]);

        assert!(matches!(
            result,
            Err(CatalogError::PriceTooLarge { kind: "add-on", .. })
        ));
    }

    #[test]
    fn new_accepts_price_at_limit() {
        let result = Catalog::new(vec![product("platinum", MAX_PRICE)], vec![]);

        assert!(result.is_ok());
    }

    #[test]
    fn new_rejects_blank_id() {
        let result = Catalog::new(vec![product("  ", dec!(1.00))], vec![]);

        assert_eq!(result, Err(CatalogError::EmptyId { kind: "product" }));
    }

    #[test]
    fn lookup_of_unknown_id_is_none() {
        let catalog = Catalog::new(vec![product("web", dec!(100.00))], vec![]).unwrap();

        assert!(catalog.product(&ProductId::new("shop")).is_none());
    }
}
