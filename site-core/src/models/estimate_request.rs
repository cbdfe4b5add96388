use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AddOnId, ContactInfo, ProductId};

/// The record handed to the submission endpoint.
///
/// Built once at submit time from a validated form and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub contact: ContactInfo,
    pub product_id: ProductId,
    pub term_days: u16,
    pub add_on_ids: BTreeSet<AddOnId>,
    pub total: Decimal,
    pub submitted_at: DateTime<Utc>,
}
