//! Rounding and currency formatting shared by the estimate views.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol used by every price region.
pub const CURRENCY_SYMBOL: &str = "€";

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use site_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as `€1234.50`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use site_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(96)), "€96.00");
/// assert_eq!(format_currency(dec!(0.125)), "€0.13");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{:.2}", round_half_up(amount))
}

/// Formats a discount with a leading minus sign (`-€24.00`).
///
/// A zero discount is shown without the sign.
pub fn format_discount(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    if rounded.is_zero() {
        format_currency(Decimal::ZERO)
    } else {
        format!("-{}", format_currency(rounded))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_zero() {
        assert_eq!(round_half_up(dec!(0.00)), dec!(0.00));
    }

    // =========================================================================
    // formatting tests
    // =========================================================================

    #[test]
    fn format_currency_pads_to_two_places() {
        assert_eq!(format_currency(dec!(50)), "€50.00");
        assert_eq!(format_currency(dec!(7.5)), "€7.50");
    }

    #[test]
    fn format_currency_rounds_long_fractions() {
        assert_eq!(format_currency(dec!(114.9369863)), "€114.94");
    }

    #[test]
    fn format_discount_prefixes_minus() {
        assert_eq!(format_discount(dec!(24)), "-€24.00");
    }

    #[test]
    fn format_discount_omits_sign_for_zero() {
        assert_eq!(format_discount(dec!(0)), "€0.00");
        assert_eq!(format_discount(dec!(0.001)), "€0.00");
    }
}
