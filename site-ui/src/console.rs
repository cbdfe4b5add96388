//! Text rendering of the budget page for a terminal.

use std::{collections::BTreeMap, fmt, io::Write};

use site_core::{
    EstimateDisplay, FormField, PresentationSurface, confirmation::ConfirmationSummary,
};
use tracing::warn;

/// A [`PresentationSurface`] that prints every page update as text.
///
/// Confirmation prompts cannot block on stdin here because input arrives
/// through the session's channel. The session answers a prompt ahead of
/// time with [`ConsoleSurface::answer_next_confirm`]; an unanswered prompt
/// counts as "no".
pub struct ConsoleSurface<W: Write> {
    out: W,
    field_errors: BTreeMap<FormField, String>,
    busy: bool,
    confirmation_open: bool,
    next_answer: Option<bool>,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            field_errors: BTreeMap::new(),
            busy: false,
            confirmation_open: false,
            next_answer: None,
        }
    }

    pub fn answer_next_confirm(
        &mut self,
        answer: bool,
    ) {
        self.next_answer = Some(answer);
    }

    pub fn field_errors(&self) -> &BTreeMap<FormField, String> {
        &self.field_errors
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_confirmation_open(&self) -> bool {
        self.confirmation_open
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one line of output; a broken pipe only gets logged.
    pub fn line(
        &mut self,
        args: fmt::Arguments<'_>,
    ) {
        if let Err(error) = writeln!(self.out, "{args}").and_then(|()| self.out.flush()) {
            warn!(%error, "console write failed");
        }
    }
}

impl<W: Write> PresentationSurface for ConsoleSurface<W> {
    fn show_estimate(
        &mut self,
        display: &EstimateDisplay,
    ) {
        self.line(format_args!(
            "Base: {} | Add-ons: {} | Discount: {} | Total: {}",
            display.base_price, display.add_ons_total, display.discount_amount, display.total
        ));
    }

    fn set_field_error(
        &mut self,
        field: FormField,
        message: &str,
    ) {
        self.field_errors.insert(field, message.to_string());
        self.line(format_args!("  ✗ {field}: {message}"));
    }

    fn clear_field_error(
        &mut self,
        field: FormField,
    ) {
        self.field_errors.remove(&field);
    }

    fn mark_field_valid(
        &mut self,
        field: FormField,
    ) {
        self.line(format_args!("  ✓ {field}"));
    }

    fn set_submit_busy(
        &mut self,
        busy: bool,
    ) {
        self.busy = busy;
        if busy {
            self.line(format_args!("Sending..."));
        }
    }

    fn notify(
        &mut self,
        message: &str,
    ) {
        self.line(format_args!("! {message}"));
    }

    fn confirm(
        &mut self,
        question: &str,
    ) -> bool {
        let answer = self.next_answer.take().unwrap_or(false);
        self.line(format_args!("? {question} {}", if answer { "yes" } else { "no" }));
        answer
    }

    fn show_confirmation(
        &mut self,
        summary: &ConfirmationSummary,
    ) {
        self.confirmation_open = true;
        self.line(format_args!("{summary}"));
        self.line(format_args!("(type `ok` to close)"));
    }

    fn hide_confirmation(&mut self) {
        self.confirmation_open = false;
    }

    fn reset_form(&mut self) {
        self.line(format_args!("Form cleared."));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn output(surface: ConsoleSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn estimate_prints_all_four_regions() {
        let mut surface = ConsoleSurface::new(Vec::new());

        surface.show_estimate(&EstimateDisplay::zeroed());

        assert_eq!(
            output(surface),
            "Base: €0.00 | Add-ons: €0.00 | Discount: €0.00 | Total: €0.00\n"
        );
    }

    #[test]
    fn field_errors_are_tracked_until_cleared() {
        let mut surface = ConsoleSurface::new(Vec::new());

        surface.set_field_error(FormField::Phone, "Only digits, max 9 digits");
        assert_eq!(surface.field_errors().len(), 1);

        surface.clear_field_error(FormField::Phone);
        assert!(surface.field_errors().is_empty());
        assert_eq!(output(surface), "  ✗ phone: Only digits, max 9 digits\n");
    }

    #[test]
    fn unanswered_confirm_is_no() {
        let mut surface = ConsoleSurface::new(Vec::new());

        assert!(!surface.confirm("Really?"));

        surface.answer_next_confirm(true);
        assert!(surface.confirm("Really?"));
        assert!(!surface.confirm("Really?"));
    }
}
