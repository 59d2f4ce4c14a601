//! Value-added tax calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaxTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{StepLog, VatRate, check_amount, check_rate};

use super::rounding::{money, percent, round2};

/// The result of a VAT calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatResult {
    /// Net amount.
    pub amount_without_tax: Decimal,
    /// Gross amount.
    pub amount_with_tax: Decimal,
    /// VAT charged on the sale.
    pub output_tax: Decimal,
    /// Creditable VAT paid on purchases.
    pub input_tax: Decimal,
    /// Output tax less input tax; negative when input tax is carried forward.
    pub payable_tax: Decimal,
    /// The rate applied.
    pub rate: Decimal,
    /// The ordered calculation log.
    pub steps: StepLog,
}

/// Calculates VAT for an amount.
///
/// When `includes_tax` is true, `amount` is the gross amount: the net amount
/// is `round2(amount / (1 + rate))` and output tax is taken on the rounded
/// net. Otherwise `amount` is net and the gross amount is net plus output
/// tax. Payable tax is output tax less `input_tax`.
///
/// # Errors
///
/// Returns `InvalidInput` for `rate` when `1 + rate` is zero, since the
/// gross amount cannot be split. Returns `CalculationError` when an amount
/// exceeds [`MAX_AMOUNT`](crate::models::MAX_AMOUNT) or the rate exceeds
/// [`MAX_RATE`](crate::models::MAX_RATE) in magnitude, including a net
/// amount pushed out of range by a rate close to -100%.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::calculate_vat;
///
/// let result = calculate_vat(dec!(1130), dec!(0.13), true, dec!(0)).unwrap();
/// assert_eq!(result.amount_without_tax, dec!(1000));
/// assert_eq!(result.output_tax, dec!(130));
/// assert_eq!(result.payable_tax, dec!(130));
/// ```
pub fn calculate_vat(
    amount: Decimal,
    rate: Decimal,
    includes_tax: bool,
    input_tax: Decimal,
) -> EngineResult<VatResult> {
    let amount = check_amount("amount", amount)?;
    let rate = check_rate("rate", rate)?;
    let input_tax = check_amount("input tax", input_tax)?;
    let rate_label = percent(rate);

    let (amount_without_tax, amount_with_tax, output_tax, steps) = if includes_tax {
        let divisor = Decimal::ONE + rate;
        if divisor.is_zero() {
            return Err(EngineError::InvalidInput {
                field: "rate".to_string(),
                message: format!("1 + rate must not be zero, found rate {}", rate),
            });
        }
        let net = amount.checked_div(divisor).unwrap_or(Decimal::MAX);
        let net = round2(check_amount("amount excluding tax", net)?);
        let output_tax = round2(net * rate);

        let steps = StepLog::new()
            .record("Amount including tax", round2(amount), "")
            .record("Rate", rate_label.as_str(), "")
            .record(
                "Amount excluding tax",
                net,
                format!("{} ÷ (1 + {})", money(amount), rate_label),
            )
            .record(
                "Output tax",
                output_tax,
                format!("{} × {}", money(net), rate_label),
            );

        (net, round2(amount), output_tax, steps)
    } else {
        let output_tax = round2(amount * rate);
        let gross = round2(amount + output_tax);

        let steps = StepLog::new()
            .record("Amount excluding tax", round2(amount), "")
            .record("Rate", rate_label.as_str(), "")
            .record(
                "Output tax",
                output_tax,
                format!("{} × {}", money(amount), rate_label),
            )
            .record(
                "Amount including tax",
                gross,
                format!("{} + {}", money(amount), money(output_tax)),
            );

        (round2(amount), gross, output_tax, steps)
    };

    let payable_tax = round2(output_tax - input_tax);

    let steps = if input_tax > Decimal::ZERO {
        steps.record("Input tax", round2(input_tax), "").record(
            "Tax payable",
            payable_tax,
            format!("{} - {}", money(output_tax), money(input_tax)),
        )
    } else {
        steps.record("Tax payable", payable_tax, "")
    };

    debug!(%amount, %rate, includes_tax, %output_tax, %payable_tax, "Calculated VAT");

    Ok(VatResult {
        amount_without_tax,
        amount_with_tax,
        output_tax,
        input_tax: round2(input_tax),
        payable_tax,
        rate,
        steps,
    })
}

/// Calculates VAT using a statutory rate category.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::calculate_vat_for_category;
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::VatRate;
///
/// let result = calculate_vat_for_category(
///     dec!(1000),
///     VatRate::Services,
///     false,
///     dec!(0),
///     TaxTables::statutory(),
/// )
/// .unwrap();
/// assert_eq!(result.amount_with_tax, dec!(1060));
/// ```
pub fn calculate_vat_for_category(
    amount: Decimal,
    category: VatRate,
    includes_tax: bool,
    input_tax: Decimal,
    tables: &TaxTables,
) -> EngineResult<VatResult> {
    calculate_vat(amount, tables.vat().rate(category), includes_tax, input_tax)
}
