//! Field validation for the budget form.
//!
//! Rules run in order and the first failing rule wins. A required field
//! whose trimmed value is empty fails with [`FieldError::Required`] before
//! its specific rule is checked. Validation is stateless; callers run it on
//! blur and clear the error slot on every edit.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{BudgetForm, Catalog, FormField};

/// Letters accepted in names: ASCII plus the Spanish accented set.
const NAME_LETTERS: &str = r"a-zA-ZáéíóúüñÁÉÍÓÚÜÑ\s";

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^[{NAME_LETTERS}]{{1,15}}$")).unwrap());
static SURNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^[{NAME_LETTERS}]{{1,40}}$")).unwrap());
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{1,9}$").unwrap());
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const MIN_TERM_DAYS: u16 = 1;
pub const MAX_TERM_DAYS: u16 = 365;

/// Why a field value was rejected. The `Display` text is the message shown
/// in the field's error slot.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Only letters, max 15 characters")]
    InvalidName,

    #[error("Only letters, max 40 characters")]
    InvalidSurname,

    #[error("Only digits, max 9 digits")]
    InvalidPhone,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Term must be between 1 and 365 days")]
    TermOutOfRange,

    #[error("Select a valid product")]
    UnknownProduct,
}

/// Validates a single raw field value.
///
/// Product values are only checked for presence here; whether the id exists
/// is a catalog question answered by [`validate_form`].
pub fn validate(
    field: FormField,
    raw: &str,
) -> Result<(), FieldError> {
    if raw.trim().is_empty() {
        return if field.is_required() {
            Err(FieldError::Required)
        } else {
            Ok(())
        };
    }

    match field {
        FormField::Name => check(&NAME_REGEX, raw, FieldError::InvalidName),
        FormField::Surname => check(&SURNAME_REGEX, raw, FieldError::InvalidSurname),
        FormField::Phone => check(&PHONE_REGEX, raw, FieldError::InvalidPhone),
        FormField::Email => check(&EMAIL_REGEX, raw, FieldError::InvalidEmail),
        FormField::Term => parse_term(raw).map(|_| ()),
        FormField::Product => Ok(()),
    }
}

/// Parses a term in days, rejecting anything outside
/// [`MIN_TERM_DAYS`]..=[`MAX_TERM_DAYS`] or not an integer.
pub fn parse_term(raw: &str) -> Result<u16, FieldError> {
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|days| (MIN_TERM_DAYS..=MAX_TERM_DAYS).contains(days))
        .ok_or(FieldError::TermOutOfRange)
}

/// Validates a field against the form, including the catalog lookup for the
/// selected product.
pub fn validate_field(
    form: &BudgetForm,
    catalog: &Catalog,
    field: FormField,
) -> Result<(), FieldError> {
    validate(field, form.value(field))?;
    match (field, &form.product) {
        (FormField::Product, Some(id)) if catalog.product(id).is_none() => {
            Err(FieldError::UnknownProduct)
        }
        _ => Ok(()),
    }
}

/// Validates every field of the form, returning the failures in field order.
pub fn validate_form(
    form: &BudgetForm,
    catalog: &Catalog,
) -> Vec<(FormField, FieldError)> {
    FormField::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(form, catalog, field)
                .err()
                .map(|error| (field, error))
        })
        .collect()
}

fn check(
    regex: &Regex,
    raw: &str,
    error: FieldError,
) -> Result<(), FieldError> {
    if regex.is_match(raw) {
        Ok(())
    } else {
        Err(error)
    }
}
