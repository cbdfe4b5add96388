//! Fakes shared by the unit tests of this crate.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use rust_decimal_macros::dec;

use crate::{
    confirmation::ConfirmationSummary,
    models::{AddOn, AddOnId, BudgetForm, Catalog, EstimateDisplay, EstimateRequest, FormField, Product, ProductId},
    submission::{EstimateSubmitter, SubmissionError},
    surface::PresentationSurface,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Estimate(EstimateDisplay),
    FieldError(FormField, String),
    FieldCleared(FormField),
    FieldValid(FormField),
    Busy(bool),
    Notified(String),
    Asked(String),
    ConfirmationShown(ConfirmationSummary),
    ConfirmationHidden,
    FormReset,
}

/// Surface that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
    pub confirm_answer: bool,
}

impl RecordingSurface {
    pub fn last_estimate(&self) -> Option<EstimateDisplay> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::Estimate(display) => Some(display.clone()),
            _ => None,
        })
    }

    /// Message currently shown in the error slot of `field`.
    pub fn field_error(
        &self,
        field: FormField,
    ) -> Option<String> {
        self.events.iter().fold(None, |current, e| match e {
            SurfaceEvent::FieldError(f, message) if *f == field => Some(message.clone()),
            SurfaceEvent::FieldCleared(f) if *f == field => None,
            _ => current,
        })
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Notified(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_confirmation(&self) -> Option<ConfirmationSummary> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::ConfirmationShown(summary) => Some(summary.clone()),
            _ => None,
        })
    }
}

impl PresentationSurface for RecordingSurface {
    fn show_estimate(
        &mut self,
        display: &EstimateDisplay,
    ) {
        self.events.push(SurfaceEvent::Estimate(display.clone()));
    }

    fn set_field_error(
        &mut self,
        field: FormField,
        message: &str,
    ) {
        self.events
            .push(SurfaceEvent::FieldError(field, message.to_string()));
    }

    fn clear_field_error(
        &mut self,
        field: FormField,
    ) {
        self.events.push(SurfaceEvent::FieldCleared(field));
    }

    fn mark_field_valid(
        &mut self,
        field: FormField,
    ) {
        self.events.push(SurfaceEvent::FieldValid(field));
    }

    fn set_submit_busy(
        &mut self,
        busy: bool,
    ) {
        self.events.push(SurfaceEvent::Busy(busy));
    }

    fn notify(
        &mut self,
        message: &str,
    ) {
        self.events.push(SurfaceEvent::Notified(message.to_string()));
    }

    fn confirm(
        &mut self,
        question: &str,
    ) -> bool {
        self.events.push(SurfaceEvent::Asked(question.to_string()));
        self.confirm_answer
    }

    fn show_confirmation(
        &mut self,
        summary: &ConfirmationSummary,
    ) {
        self.events
            .push(SurfaceEvent::ConfirmationShown(summary.clone()));
    }

    fn hide_confirmation(&mut self) {
        self.events.push(SurfaceEvent::ConfirmationHidden);
    }

    fn reset_form(&mut self) {
        self.events.push(SurfaceEvent::FormReset);
    }
}

/// Submitter that counts calls and succeeds or fails on demand.
#[derive(Debug, Clone, Default)]
pub struct CountingSubmitter {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingSubmitter {
    pub fn new(fail: bool) -> Self {
        Self {
            calls: Arc::default(),
            fail,
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl EstimateSubmitter for CountingSubmitter {
    async fn submit(
        &self,
        _request: &EstimateRequest,
    ) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(SubmissionError::Transport("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn sample_catalog() -> Catalog {
    Catalog::new(
        vec![
            Product {
                id: ProductId::new("web"),
                label: "Corporate website".to_string(),
                price: dec!(100.00),
            },
            Product {
                id: ProductId::new("landing"),
                label: "Landing page".to_string(),
                price: dec!(50.00),
            },
        ],
        vec![
            AddOn {
                id: AddOnId::new("seo"),
                label: "SEO".to_string(),
                price: dec!(20.00),
            },
            AddOn {
                id: AddOnId::new("hosting"),
                label: "Hosting".to_string(),
                price: dec!(35.50),
            },
        ],
    )
    .expect("sample catalog is valid")
}

/// A form that passes every rule, with consent given.
pub fn valid_form() -> BudgetForm {
    BudgetForm {
        name: "Ana María".to_string(),
        surname: "López García".to_string(),
        phone: "600123123".to_string(),
        email: "ana@example.com".to_string(),
        product: Some(ProductId::new("web")),
        term: "90".to_string(),
        add_ons: Default::default(),
        consent: true,
    }
}
