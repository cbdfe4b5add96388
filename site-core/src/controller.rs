//! Page controller for the budget form.
//!
//! Every user action arrives as a [`Command`] and goes through
//! [`PageController::dispatch`], the single place where form state changes.
//! Work the host must schedule (timers) comes back as [`Effect`]s, so the
//! controller can be driven in tests without a runtime event loop.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    calculations::PriceCalculator,
    confirmation::{ConfirmationState, ConfirmationSummary, ConfirmationView},
    models::{AddOnId, BudgetForm, Catalog, Estimate, EstimateDisplay, FormField},
    submission::{EstimateSubmitter, SubmissionOrchestrator},
    surface::PresentationSurface,
    validation,
};

/// Delay between dismissing the confirmation and clearing the form.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(300);

pub const RESET_PROMPT: &str = "Are you sure you want to reset the form?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A keystroke or selection change in a field; clears its error state.
    EditField { field: FormField, value: String },
    /// The field lost focus; runs its validation rule.
    BlurField(FormField),
    ToggleAddOn { id: AddOnId, selected: bool },
    SetConsent(bool),
    Submit,
    DismissConfirmation,
    /// The reset button; asks the user before clearing anything.
    RequestReset,
    /// Clears the form without asking.
    ResetForm,
}

/// Follow-up work for the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Dispatch [`Command::ResetForm`] after the given delay.
    ScheduleReset(Duration),
}

/// Owns all state of the budget page for its lifetime.
pub struct PageController {
    catalog: Catalog,
    form: BudgetForm,
    estimate: Estimate,
    confirmation: ConfirmationView,
    orchestrator: SubmissionOrchestrator,
    reset_delay: Duration,
}

impl PageController {
    pub fn new(
        catalog: Catalog,
        submitter: Box<dyn EstimateSubmitter>,
    ) -> Self {
        Self {
            catalog,
            form: BudgetForm::default(),
            estimate: Estimate::default(),
            confirmation: ConfirmationView::default(),
            orchestrator: SubmissionOrchestrator::new(submitter),
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }

    pub fn with_reset_delay(
        mut self,
        delay: Duration,
    ) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn form(&self) -> &BudgetForm {
        &self.form
    }

    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    pub fn confirmation_state(&self) -> ConfirmationState {
        self.confirmation.state()
    }

    /// Applies one command to the page.
    pub async fn dispatch<S: PresentationSurface + ?Sized>(
        &mut self,
        command: Command,
        surface: &mut S,
    ) -> Vec<Effect> {
        debug!(?command, "dispatching");
        match command {
            Command::EditField { field, value } => {
                self.form.set(field, value);
                surface.clear_field_error(field);
                if field.affects_estimate() {
                    self.recalculate(surface);
                }
            }
            Command::BlurField(field) => self.validate_field(field, surface),
            Command::ToggleAddOn { id, selected } => {
                if self.catalog.add_on(&id).is_none() {
                    warn!(add_on = %id, "ignoring toggle of unknown add-on");
                    return Vec::new();
                }
                if selected {
                    self.form.add_ons.insert(id);
                } else {
                    self.form.add_ons.remove(&id);
                }
                self.recalculate(surface);
            }
            Command::SetConsent(consent) => self.form.consent = consent,
            Command::Submit => self.submit(surface).await,
            Command::DismissConfirmation => {
                if self.confirmation.dismiss(surface) {
                    return vec![Effect::ScheduleReset(self.reset_delay)];
                }
            }
            Command::RequestReset => {
                if surface.confirm(RESET_PROMPT) {
                    self.reset(surface);
                } else {
                    debug!("reset cancelled");
                }
            }
            Command::ResetForm => self.reset(surface),
        }
        Vec::new()
    }

    fn recalculate<S: PresentationSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) {
        self.estimate = PriceCalculator::new(&self.catalog).compute(
            self.form.product.as_ref(),
            &self.form.add_ons,
            self.form.term_days(),
        );
        surface.show_estimate(&self.estimate.display());
    }

    fn validate_field<S: PresentationSurface + ?Sized>(
        &self,
        field: FormField,
        surface: &mut S,
    ) {
        surface.clear_field_error(field);
        match validation::validate_field(&self.form, &self.catalog, field) {
            Ok(()) if !self.form.value(field).trim().is_empty() => surface.mark_field_valid(field),
            Ok(()) => {}
            Err(error) => {
                debug!(%field, %error, "field rejected");
                surface.set_field_error(field, &error.to_string());
            }
        }
    }

    async fn submit<S: PresentationSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) {
        // Errors were already surfaced to the user by the orchestrator.
        if let Ok(request) = self
            .orchestrator
            .submit(&self.catalog, &self.form, surface)
            .await
        {
            let summary = ConfirmationSummary::new(&request, &self.catalog);
            self.confirmation.show(&summary, surface);
        }
    }

    fn reset<S: PresentationSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) {
        self.form = BudgetForm::default();
        self.estimate = Estimate::default();
        surface.reset_form();
        for field in FormField::ALL {
            surface.clear_field_error(field);
        }
        surface.show_estimate(&EstimateDisplay::zeroed());
        info!("budget form reset");
    }
}
