//! Monetary rounding policy and magnitude limits.
//!
//! Every amount the engine stores or displays is rounded here, and every
//! amount a calculator accepts is checked against [`MAX_AMOUNT`] so that the
//! arithmetic that follows stays far inside the range of [`Decimal`].

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::{EngineError, EngineResult};

/// Largest accepted monetary amount in either direction: one quadrillion.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Largest accepted rate in either direction, as a fraction (10000%).
pub const MAX_RATE: Decimal = dec!(100);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 round away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::round2;
///
/// assert_eq!(round2(dec!(123.454)), dec!(123.45));
/// assert_eq!(round2(dec!(123.455)), dec!(123.46));
/// assert_eq!(round2(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate to four decimal places (hundredths of a percent).
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Rejects an amount whose magnitude exceeds [`MAX_AMOUNT`].
pub(crate) fn check_amount(field: &str, value: Decimal) -> EngineResult<Decimal> {
    check_magnitude(field, value, MAX_AMOUNT)
}

/// Rejects a rate whose magnitude exceeds [`MAX_RATE`].
pub(crate) fn check_rate(field: &str, value: Decimal) -> EngineResult<Decimal> {
    check_magnitude(field, value, MAX_RATE)
}

fn check_magnitude(field: &str, value: Decimal, limit: Decimal) -> EngineResult<Decimal> {
    if value.abs() > limit {
        return Err(EngineError::CalculationError {
            message: format!("{} of {} exceeds the supported limit of {}", field, value, limit),
        });
    }
    Ok(value)
}
