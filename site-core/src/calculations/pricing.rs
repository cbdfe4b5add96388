//! Budget estimate for a product, a set of add-ons and a financing term.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Base price: catalog price of the selected product (0 if none) |
//! | 2    | Add-ons: sum of the catalog prices of the selected add-ons |
//! | 3    | Discount %: `min(term / 365 × 20, 20)`, 0 for terms ≤ 0 |
//! | 4    | Discount amount: `(step 1 + step 2) × step 3 / 100` |
//! | 5    | Total: `step 1 + step 2 - step 4` |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use site_core::calculations::PriceCalculator;
//! use site_core::{AddOn, AddOnId, Catalog, Product, ProductId};
//!
//! let catalog = Catalog::new(
//!     vec![Product { id: ProductId::new("web"), label: "Website".into(), price: dec!(100.00) }],
//!     vec![AddOn { id: AddOnId::new("seo"), label: "SEO".into(), price: dec!(20.00) }],
//! )
//! .unwrap();
//!
//! let calculator = PriceCalculator::new(&catalog);
//! let estimate = calculator.compute(Some(&ProductId::new("web")), [&AddOnId::new("seo")], 365);
//!
//! assert_eq!(estimate.discount_percent, dec!(20));
//! assert_eq!(estimate.discount_amount, dec!(24.00));
//! assert_eq!(estimate.total, dec!(96.00));
//! ```

use rust_decimal::Decimal;
use tracing::{trace, warn};

use crate::models::{AddOnId, Catalog, Estimate, ProductId};

/// Days over which the discount ramps up to its cap.
pub const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Discount percentage reached at a full-year term.
pub const MAX_DISCOUNT_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Discount percentage for a financing term, ramping linearly from 0% at
/// 0 days to [`MAX_DISCOUNT_PERCENT`] at 365 days and capped there.
///
/// Non-positive terms get no discount.
pub fn discount_percent(term_days: i64) -> Decimal {
    if term_days <= 0 {
        return Decimal::ZERO;
    }
    let ramp = Decimal::from(term_days) / DAYS_PER_YEAR * MAX_DISCOUNT_PERCENT;
    ramp.min(MAX_DISCOUNT_PERCENT)
}

/// Computes [`Estimate`]s against a catalog.
///
/// Unknown product or add-on ids contribute nothing to the price. The
/// controller never stores unknown add-ons and submission rejects unknown
/// products, so a warning here means a caller bypassed those checks.
#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator<'a> {
    catalog: &'a Catalog,
}

impl<'a> PriceCalculator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn compute<'i>(
        &self,
        product: Option<&ProductId>,
        add_ons: impl IntoIterator<Item = &'i AddOnId>,
        term_days: i64,
    ) -> Estimate {
        let base_price = self.base_price(product);
        let add_ons_total = self.add_ons_total(add_ons);
        let discount_percent = discount_percent(term_days);
        let discount_amount = (base_price + add_ons_total) * discount_percent / Decimal::ONE_HUNDRED;
        let total = base_price + add_ons_total - discount_amount;

        trace!(%base_price, %add_ons_total, %discount_amount, %total, "estimate computed");

        Estimate {
            base_price,
            add_ons_total,
            discount_percent,
            discount_amount,
            total,
        }
    }

    fn base_price(
        &self,
        product: Option<&ProductId>,
    ) -> Decimal {
        let Some(id) = product else {
            return Decimal::ZERO;
        };
        match self.catalog.product(id) {
            Some(product) => product.price,
            None => {
                warn!(product = %id, "unknown product priced at zero");
                Decimal::ZERO
            }
        }
    }

    fn add_ons_total<'i>(
        &self,
        add_ons: impl IntoIterator<Item = &'i AddOnId>,
    ) -> Decimal {
        add_ons
            .into_iter()
            .map(|id| match self.catalog.add_on(id) {
                Some(add_on) => add_on.price,
                None => {
                    warn!(add_on = %id, "unknown add-on priced at zero");
                    Decimal::ZERO
                }
            })
            .sum()
    }
}
