//! Confirmation summary shown after a successful submission.

use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    calculations::common::format_currency,
    models::{Catalog, EstimateRequest},
    surface::PresentationSurface,
};

/// Shown in place of add-on labels when none were selected.
pub const NO_ADD_ONS_LABEL: &str = "None";

/// Human-readable view of an [`EstimateRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationSummary {
    pub customer: String,
    pub email: String,
    pub phone: String,
    pub product: String,
    pub term_days: u16,
    pub add_ons: Vec<String>,
    pub total: Decimal,
}

impl ConfirmationSummary {
    /// Resolves product and add-on labels from the catalog. Ids the catalog
    /// does not know are shown as-is.
    pub fn new(
        request: &EstimateRequest,
        catalog: &Catalog,
    ) -> Self {
        let product_label = catalog
            .product(&request.product_id)
            .map_or_else(|| request.product_id.to_string(), |p| p.label.clone());
        let add_on_labels = request
            .add_on_ids
            .iter()
            .map(|id| catalog.add_on(id).map_or_else(|| id.to_string(), |a| a.label.clone()))
            .collect();

        Self::with_labels(request, product_label, add_on_labels)
    }

    pub fn with_labels(
        request: &EstimateRequest,
        product_label: impl Into<String>,
        add_on_labels: Vec<String>,
    ) -> Self {
        Self {
            customer: request.contact.full_name(),
            email: request.contact.email.clone(),
            phone: request.contact.phone.clone(),
            product: product_label.into(),
            term_days: request.term_days,
            add_ons: add_on_labels,
            total: request.total,
        }
    }

    /// Add-on labels joined with ", ", or [`NO_ADD_ONS_LABEL`].
    pub fn add_ons_line(&self) -> String {
        if self.add_ons.is_empty() {
            NO_ADD_ONS_LABEL.to_string()
        } else {
            self.add_ons.join(", ")
        }
    }
}

impl fmt::Display for ConfirmationSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Your request summary:")?;
        writeln!(f, "Customer: {}", self.customer)?;
        writeln!(f, "Email:    {}", self.email)?;
        writeln!(f, "Phone:    {}", self.phone)?;
        writeln!(f, "Product:  {}", self.product)?;
        writeln!(f, "Term:     {} days", self.term_days)?;
        writeln!(f, "Add-ons:  {}", self.add_ons_line())?;
        write!(f, "Total:    {}", format_currency(self.total))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmationState {
    #[default]
    Hidden,
    Shown,
}

/// Two-state confirmation dialog: `Hidden -> Shown -> Hidden`.
#[derive(Debug, Default)]
pub struct ConfirmationView {
    state: ConfirmationState,
}

impl ConfirmationView {
    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    pub fn show<S: PresentationSurface + ?Sized>(
        &mut self,
        summary: &ConfirmationSummary,
        surface: &mut S,
    ) {
        surface.show_confirmation(summary);
        self.state = ConfirmationState::Shown;
    }

    /// Hides the dialog. Returns `true` only on the `Shown -> Hidden`
    /// transition; dismissing a hidden dialog does nothing.
    pub fn dismiss<S: PresentationSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> bool {
        match self.state {
            ConfirmationState::Shown => {
                surface.hide_confirmation();
                self.state = ConfirmationState::Hidden;
                true
            }
            ConfirmationState::Hidden => {
                debug!("confirmation already hidden");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        models::{AddOnId, ContactInfo, ProductId},
        test_support::{RecordingSurface, SurfaceEvent, sample_catalog},
    };

    fn request(add_ons: &[&str]) -> EstimateRequest {
        EstimateRequest {
            contact: ContactInfo {
                name: "Ana María".to_string(),
                surname: "López".to_string(),
                phone: "600123123".to_string(),
                email: "ana@example.com".to_string(),
            },
            product_id: ProductId::new("web"),
            term_days: 365,
            add_on_ids: add_ons.iter().map(|id| AddOnId::new(*id)).collect::<BTreeSet<_>>(),
            total: dec!(96),
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn summary_resolves_labels_from_catalog() {
        let summary = ConfirmationSummary::new(&request(&["seo", "hosting"]), &sample_catalog());

        assert_eq!(summary.product, "Corporate website");
        assert_eq!(summary.add_ons_line(), "Hosting, SEO");
        assert_eq!(summary.customer, "Ana María López");
    }

    #[test]
    fn summary_without_add_ons_says_none() {
        let summary = ConfirmationSummary::new(&request(&[]), &sample_catalog());

        assert_eq!(summary.add_ons_line(), "None");
    }

    #[test]
    fn summary_display_lists_every_line() {
        let summary = ConfirmationSummary::new(&request(&["seo"]), &sample_catalog());

        assert_eq!(
            summary.to_string(),
            "Your request summary:\n\
             Customer: Ana María López\n\
             Email:    ana@example.com\n\
             Phone:    600123123\n\
             Product:  Corporate website\n\
             Term:     365 days\n\
             Add-ons:  SEO\n\
             Total:    €96.00"
        );
    }

    #[test]
    fn dismiss_is_idempotent() {
        let mut view = ConfirmationView::default();
        let mut surface = RecordingSurface::default();
        let summary = ConfirmationSummary::new(&request(&[]), &sample_catalog());

        view.show(&summary, &mut surface);
        assert_eq!(view.state(), ConfirmationState::Shown);

        assert!(view.dismiss(&mut surface));
        assert!(!view.dismiss(&mut surface));
        assert_eq!(view.state(), ConfirmationState::Hidden);
        assert_eq!(
            surface
                .events
                .iter()
                .filter(|e| matches!(e, SurfaceEvent::ConfirmationHidden))
                .count(),
            1
        );
    }
}
