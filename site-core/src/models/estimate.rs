use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{format_currency, format_discount};

/// Figures computed for one product/add-on/term selection.
///
/// Values keep full precision; rounding to cents only happens when an
/// [`EstimateDisplay`] is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub base_price: Decimal,
    pub add_ons_total: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

impl Estimate {
    /// Base price plus add-ons, before the term discount.
    pub fn subtotal(&self) -> Decimal {
        self.base_price + self.add_ons_total
    }

    pub fn display(&self) -> EstimateDisplay {
        EstimateDisplay {
            base_price: format_currency(self.base_price),
            add_ons_total: format_currency(self.add_ons_total),
            discount_amount: format_discount(self.discount_amount),
            total: format_currency(self.total),
        }
    }
}

/// Formatted strings for the price regions of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateDisplay {
    pub base_price: String,
    pub add_ons_total: String,
    pub discount_amount: String,
    pub total: String,
}

impl EstimateDisplay {
    /// What the price regions show after a form reset.
    pub fn zeroed() -> Self {
        let zero = format_currency(Decimal::ZERO);
        Self {
            base_price: zero.clone(),
            add_ons_total: zero.clone(),
            discount_amount: zero.clone(),
            total: zero,
        }
    }
}
