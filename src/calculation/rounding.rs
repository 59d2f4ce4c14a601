//! Display helpers shared by the calculators.
//!
//! Every monetary quantity is rounded to two decimal places at the point it
//! is computed, so the step log only ever shows rounded values. The rounding
//! policy itself lives in [`crate::models::round2`].

use rust_decimal::{Decimal, RoundingStrategy};

pub use crate::models::{round2, round_rate};

/// Formats an amount with exactly two decimals.
pub(crate) fn money(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// Formats a fraction as a percentage without trailing zeros ("10%", "2.5%").
pub(crate) fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Formats a fraction as a percentage with a fixed number of decimals.
pub(crate) fn percent_fixed(rate: Decimal, decimals: u32) -> String {
    let scaled = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_pads_to_two_decimals() {
        assert_eq!(money(dec!(60000)), "60000.00");
        assert_eq!(money(dec!(1480.5)), "1480.50");
        assert_eq!(money(dec!(0.004)), "0.00");
    }

    #[test]
    fn percent_drops_trailing_zeros() {
        assert_eq!(percent(dec!(0.10)), "10%");
        assert_eq!(percent(dec!(0.025)), "2.5%");
        assert_eq!(percent(dec!(0.45)), "45%");
    }

    #[test]
    fn percent_fixed_rounds_to_requested_decimals() {
        assert_eq!(percent_fixed(dec!(0.05), 2), "5.00%");
        assert_eq!(percent_fixed(dec!(0.05) / dec!(12), 4), "0.4167%");
        assert_eq!(percent_fixed(dec!(0.0139), 2), "1.39%");
    }
}
