//! Individual income tax calculation.
//!
//! Computes tax on consolidated income with the quick-deduction formula
//! `taxable × rate - quick_deduction`, which equals the marginal sum over
//! brackets for any continuous bracket table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaxTables;
use crate::error::EngineResult;
use crate::models::{Deductions, StepLog, TaxPeriod, check_amount};

use super::bracket_resolver::resolve_bracket;
use super::rounding::{money, percent, round2};

/// The result of an individual income tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualTaxResult {
    /// Income less all deductions, floored at zero.
    pub taxable_income: Decimal,
    /// Tax payable, never negative.
    pub tax: Decimal,
    /// Income less the special deduction and tax.
    pub after_tax: Decimal,
    /// Marginal rate of the resolved bracket.
    pub rate: Decimal,
    /// Quick deduction of the resolved bracket.
    pub quick_deduction: Decimal,
    /// The ordered calculation log.
    pub steps: StepLog,
}

/// Calculates individual income tax.
///
/// The basic deduction falls back to the statutory deduction for `period`
/// when `deductions.basic` is `None`. Taxable income is
/// `income - basic - special - additional - other`, floored at zero and
/// rounded to cents; it is then resolved against the annual or monthly
/// bracket table.
///
/// The after-tax figure subtracts only the special deduction (the employee's
/// own social insurance contributions) and the tax. Basic and additional
/// deductions reduce taxable income but are not cash outflows.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`](crate::error::EngineError) if
/// income or any deduction exceeds [`MAX_AMOUNT`](crate::models::MAX_AMOUNT)
/// in magnitude.
///
/// # Arguments
///
/// * `income` - Gross income for the period
/// * `deductions` - Deductions to apply before tax
/// * `period` - Selects the bracket table and default basic deduction
/// * `tables` - The tax tables to calculate against
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::calculate_individual_tax;
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::{Deductions, TaxPeriod};
///
/// let result = calculate_individual_tax(
///     dec!(100000),
///     &Deductions::default(),
///     TaxPeriod::Annual,
///     TaxTables::statutory(),
/// )
/// .unwrap();
///
/// // (100000 - 60000) × 10% - 2520 = 1480
/// assert_eq!(result.taxable_income, dec!(40000));
/// assert_eq!(result.tax, dec!(1480));
/// assert_eq!(result.after_tax, dec!(98520));
/// ```
pub fn calculate_individual_tax(
    income: Decimal,
    deductions: &Deductions,
    period: TaxPeriod,
    tables: &TaxTables,
) -> EngineResult<IndividualTaxResult> {
    let income = check_amount("income", income)?;
    let basic = check_amount(
        "basic deduction",
        deductions
            .basic
            .unwrap_or_else(|| tables.basic_deduction(period)),
    )?;
    let special = check_amount("special deduction", deductions.special)?;
    let additional = check_amount("additional deduction", deductions.additional)?;
    let other = check_amount("other deductions", deductions.other)?;

    let taxable_income =
        round2((income - basic - special - additional - other).max(Decimal::ZERO));

    let steps = StepLog::new()
        .record("Income", round2(income), "")
        .record("Basic deduction", round2(basic), "")
        .record("Special deduction (social insurance)", round2(special), "")
        .record("Special additional deduction", round2(additional), "")
        .record("Other deductions", round2(other), "")
        .record(
            "Taxable income",
            taxable_income,
            format!(
                "{} - {} - {} - {} - {}",
                money(income),
                money(basic),
                money(special),
                money(additional),
                money(other)
            ),
        );

    let bracket = resolve_bracket(taxable_income, tables.brackets(period));
    let tax = round2(bracket.tax_on(taxable_income)).max(Decimal::ZERO);

    debug!(
        %taxable_income,
        rate = %bracket.rate,
        quick_deduction = %bracket.quick_deduction,
        ?period,
        "Resolved income tax bracket"
    );

    let after_tax = round2(income - special - tax);

    let steps = steps
        .record("Applicable rate", percent(bracket.rate), "")
        .record("Quick deduction", round2(bracket.quick_deduction), "")
        .record(
            "Tax payable",
            tax,
            format!(
                "{} × {} - {}",
                money(taxable_income),
                percent(bracket.rate),
                money(bracket.quick_deduction)
            ),
        )
        .record(
            "After-tax income",
            after_tax,
            format!("{} - {} - {}", money(income), money(special), money(tax)),
        );

    Ok(IndividualTaxResult {
        taxable_income,
        tax,
        after_tax,
        rate: bracket.rate,
        quick_deduction: round2(bracket.quick_deduction),
        steps,
    })
}
