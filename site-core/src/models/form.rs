use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::models::{AddOnId, ContactInfo, ProductId};

/// Input fields of the budget form that carry validation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Surname,
    Phone,
    Email,
    Product,
    Term,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        Self::Name,
        Self::Surname,
        Self::Phone,
        Self::Email,
        Self::Product,
        Self::Term,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Product => "product",
            Self::Term => "term",
        }
    }

    /// Every field on the budget form is mandatory.
    pub fn is_required(&self) -> bool {
        true
    }

    /// Fields whose edits change the computed estimate.
    pub fn affects_estimate(&self) -> bool {
        matches!(self, Self::Product | Self::Term)
    }
}

impl fmt::Display for FormField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown form field '{s}'"))
    }
}

/// Raw, unvalidated state of the budget form.
///
/// Text fields are kept exactly as typed; validation and parsing happen
/// on blur and at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetForm {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    pub product: Option<ProductId>,
    pub term: String,
    pub add_ons: BTreeSet<AddOnId>,
    pub consent: bool,
}

impl BudgetForm {
    /// Current raw value of `field`. An unselected product reads as "".
    pub fn value(
        &self,
        field: FormField,
    ) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Surname => &self.surname,
            FormField::Phone => &self.phone,
            FormField::Email => &self.email,
            FormField::Product => self.product.as_ref().map_or("", ProductId::as_str),
            FormField::Term => &self.term,
        }
    }

    /// Stores a raw edit. A blank product value clears the selection.
    pub fn set(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Surname => self.surname = value,
            FormField::Phone => self.phone = value,
            FormField::Email => self.email = value,
            FormField::Product => {
                self.product = (!value.trim().is_empty()).then(|| ProductId::new(value.trim()))
            }
            FormField::Term => self.term = value,
        }
    }

    /// Term in days, read the lenient way the price preview needs it:
    /// anything that does not parse as an integer counts as 0.
    pub fn term_days(&self) -> i64 {
        self.term.trim().parse().unwrap_or(0)
    }

    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            name: self.name.clone(),
            surname: self.surname.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn set_and_value_round_through_each_text_field() {
        let mut form = BudgetForm::default();
        form.set(FormField::Name, "Ana");
        form.set(FormField::Email, "ana@example.com");

        assert_eq!(form.value(FormField::Name), "Ana");
        assert_eq!(form.value(FormField::Email), "ana@example.com");
        assert_eq!(form.value(FormField::Phone), "");
    }

    #[test]
    fn blank_product_clears_selection() {
        let mut form = BudgetForm::default();
        form.set(FormField::Product, "web");
        assert_eq!(form.product, Some(ProductId::new("web")));

        form.set(FormField::Product, "  ");

        assert_eq!(form.product, None);
        assert_eq!(form.value(FormField::Product), "");
    }

    #[test]
    fn term_days_defaults_to_zero_when_unparseable() {
        let mut form = BudgetForm::default();
        assert_eq!(form.term_days(), 0);

        form.set(FormField::Term, "abc");
        assert_eq!(form.term_days(), 0);

        form.set(FormField::Term, " 90 ");
        assert_eq!(form.term_days(), 90);
    }

    #[test]
    fn form_field_parses_case_insensitively() {
        assert_eq!("Surname".parse::<FormField>(), Ok(FormField::Surname));
        assert!("address".parse::<FormField>().is_err());
    }
}
