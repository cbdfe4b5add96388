//! The page regions the budget form writes into.
//!
//! The host owns layout and styling; the controller only pushes formatted
//! strings and state flags through this trait.

use crate::{
    confirmation::ConfirmationSummary,
    models::{EstimateDisplay, FormField},
};

pub trait PresentationSurface {
    /// Writes the four price regions (base, add-ons, discount, total).
    fn show_estimate(
        &mut self,
        display: &EstimateDisplay,
    );

    fn set_field_error(
        &mut self,
        field: FormField,
        message: &str,
    );

    /// Clears both the error and the valid marker of a field.
    fn clear_field_error(
        &mut self,
        field: FormField,
    );

    fn mark_field_valid(
        &mut self,
        field: FormField,
    );

    /// Disables the submit control and shows a busy indicator, or restores it.
    fn set_submit_busy(
        &mut self,
        busy: bool,
    );

    /// Blocking notification the user must acknowledge.
    fn notify(
        &mut self,
        message: &str,
    );

    /// Yes/no question; returns the user's answer.
    fn confirm(
        &mut self,
        question: &str,
    ) -> bool;

    fn show_confirmation(
        &mut self,
        summary: &ConfirmationSummary,
    );

    fn hide_confirmation(&mut self);

    /// Clears every input of the form.
    fn reset_form(&mut self);
}
