use std::ops::{Deref, DerefMut};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::submitter::{EstimateSubmitter, SubmissionError};
use crate::{
    calculations::PriceCalculator,
    models::{BudgetForm, Catalog, EstimateRequest, FormField},
    surface::PresentationSurface,
    validation::{self, FieldError},
};

pub const CONSENT_REQUIRED_MESSAGE: &str =
    "You must accept the privacy conditions to continue.";
pub const SEND_FAILED_MESSAGE: &str = "Error sending the estimate. Please try again.";

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Local precondition failure; the submitter was not called.
    #[error("form is not ready to submit ({} invalid field(s), consent missing: {consent_missing})", .invalid_fields.len())]
    Precondition {
        invalid_fields: Vec<(FormField, FieldError)>,
        consent_missing: bool,
    },

    #[error(transparent)]
    Send(#[from] SubmissionError),
}

/// Marks the submit control busy for as long as it lives.
///
/// The control is re-enabled in `Drop`, so every exit path out of the
/// send, including an early return or a panic unwinding through it,
/// releases it. The guard derefs to the surface so the scope can keep
/// writing to the page.
pub struct BusyGuard<'a, S: PresentationSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: PresentationSurface + ?Sized> BusyGuard<'a, S> {
    pub fn acquire(surface: &'a mut S) -> Self {
        surface.set_submit_busy(true);
        Self { surface }
    }
}

impl<S: PresentationSurface + ?Sized> Deref for BusyGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        self.surface
    }
}

impl<S: PresentationSurface + ?Sized> DerefMut for BusyGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.surface
    }
}

impl<S: PresentationSurface + ?Sized> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_submit_busy(false);
    }
}

/// Runs the submit flow of the budget form.
pub struct SubmissionOrchestrator {
    submitter: Box<dyn EstimateSubmitter>,
}

impl SubmissionOrchestrator {
    pub fn new(submitter: Box<dyn EstimateSubmitter>) -> Self {
        Self { submitter }
    }

    /// Validates `form`, then sends the resulting [`EstimateRequest`].
    ///
    /// Precondition failures are written to the surface (field errors inline,
    /// missing consent as one notification) and returned without touching the
    /// submitter. A send failure raises one notification; nothing is retried.
    ///
    /// # Errors
    ///
    /// * [`SubmitError::Precondition`] – a field is invalid or consent is unset.
    /// * [`SubmitError::Send`] – the submitter reported a failure.
    pub async fn submit<S: PresentationSurface + ?Sized>(
        &self,
        catalog: &Catalog,
        form: &BudgetForm,
        surface: &mut S,
    ) -> Result<EstimateRequest, SubmitError> {
        let request = match Self::prepare(catalog, form) {
            Ok(request) => request,
            Err(invalid_fields) => {
                for (field, error) in &invalid_fields {
                    surface.set_field_error(*field, &error.to_string());
                }
                if !form.consent {
                    surface.notify(CONSENT_REQUIRED_MESSAGE);
                }
                warn!(
                    invalid = invalid_fields.len(),
                    consent = form.consent,
                    "submission blocked by form validation"
                );
                return Err(SubmitError::Precondition {
                    invalid_fields,
                    consent_missing: !form.consent,
                });
            }
        };

        let mut guard = BusyGuard::acquire(surface);
        debug!(product = %request.product_id, "sending estimate request");

        match self.submitter.submit(&request).await {
            Ok(()) => {
                info!(total = %request.total, "estimate request submitted");
                Ok(request)
            }
            Err(err) => {
                error!(error = %err, "estimate submission failed");
                guard.notify(SEND_FAILED_MESSAGE);
                Err(err.into())
            }
        }
    }

    /// Builds the request, or returns the failing fields. The list is empty
    /// when only consent is missing.
    fn prepare(
        catalog: &Catalog,
        form: &BudgetForm,
    ) -> Result<EstimateRequest, Vec<(FormField, FieldError)>> {
        let invalid_fields = validation::validate_form(form, catalog);
        if !invalid_fields.is_empty() || !form.consent {
            return Err(invalid_fields);
        }

        let (Some(product_id), Ok(term_days)) =
            (form.product.clone(), validation::parse_term(&form.term))
        else {
            // validate_form already rejected a missing product or bad term
            return Err(invalid_fields);
        };

        let estimate = PriceCalculator::new(catalog).compute(
            Some(&product_id),
            &form.add_ons,
            i64::from(term_days),
        );

        Ok(EstimateRequest {
            contact: form.contact(),
            product_id,
            term_days,
            add_on_ids: form.add_ons.clone(),
            total: estimate.total,
            submitted_at: Utc::now(),
        })
    }
}
