//! Year-end bonus tax calculation.
//!
//! A bonus is either taxed on its own, using the monthly table resolved on
//! a notional monthly amount of `bonus / 12`, or combined with annual
//! consolidated income and taxed as individual income tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaxTables;
use crate::error::EngineResult;
use crate::models::{BonusMethod, Deductions, StepLog, TaxPeriod, check_amount};

use super::bracket_resolver::resolve_bracket;
use super::individual_tax::calculate_individual_tax;
use super::rounding::{money, percent, round2};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// The result of a bonus tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTaxResult {
    /// The method the bonus was taxed under.
    pub method: BonusMethod,
    /// The bonus amount.
    pub bonus: Decimal,
    /// Tax attributable to the calculation.
    ///
    /// Under [`BonusMethod::Combined`] this is the tax on the whole of annual
    /// income plus bonus.
    pub tax: Decimal,
    /// Amount retained after tax.
    pub after_tax: Decimal,
    /// Marginal rate applied.
    pub rate: Decimal,
    /// Annual consolidated income, combined method only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<Decimal>,
    /// Annual income plus bonus, combined method only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_income: Option<Decimal>,
    /// The ordered calculation log.
    pub steps: StepLog,
}

/// Both bonus methods side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusComparison {
    /// The bonus taxed separately.
    pub separate: BonusTaxResult,
    /// The bonus combined with annual income.
    pub combined: BonusTaxResult,
    /// Tax for the year under separate taxation: the bonus tax plus the tax
    /// on annual income alone.
    pub separate_total_tax: Decimal,
    /// Tax for the year under combined taxation.
    pub combined_total_tax: Decimal,
    /// The method with the lower tax for the year; separate on a tie.
    pub recommended: BonusMethod,
    /// Absolute difference between the two yearly totals.
    pub saving: Decimal,
}

/// Calculates tax on a year-end bonus.
///
/// # Arguments
///
/// * `bonus` - The bonus amount
/// * `method` - Separate or combined taxation
/// * `annual_income` - Annual consolidated income excluding the bonus; only
///   read by the combined method
/// * `tables` - The tax tables to calculate against
///
/// # Separate taxation
///
/// The monthly bracket is resolved on `bonus / 12`, but the rate and quick
/// deduction apply once to the full bonus: `bonus × rate - quick_deduction`,
/// floored at zero.
///
/// # Combined taxation
///
/// Delegates to [`calculate_individual_tax`] on `annual_income + bonus` with
/// the statutory annual basic deduction and no other deductions.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`](crate::error::EngineError) if
/// the bonus, or under the combined method annual income plus bonus, exceeds
/// [`MAX_AMOUNT`](crate::models::MAX_AMOUNT) in magnitude.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::calculate_bonus_tax;
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::BonusMethod;
///
/// let result = calculate_bonus_tax(
///     dec!(36000),
///     BonusMethod::Separate,
///     dec!(0),
///     TaxTables::statutory(),
/// )
/// .unwrap();
///
/// // 36000 / 12 = 3000 resolves to 3%
/// assert_eq!(result.tax, dec!(1080));
/// assert_eq!(result.after_tax, dec!(34920));
/// ```
pub fn calculate_bonus_tax(
    bonus: Decimal,
    method: BonusMethod,
    annual_income: Decimal,
    tables: &TaxTables,
) -> EngineResult<BonusTaxResult> {
    let bonus = check_amount("bonus", bonus)?;
    match method {
        BonusMethod::Separate => Ok(separate(bonus, tables)),
        BonusMethod::Combined => combined(bonus, annual_income, tables),
    }
}

fn separate(bonus: Decimal, tables: &TaxTables) -> BonusTaxResult {
    let monthly_bonus = bonus / MONTHS_PER_YEAR;
    let bracket = resolve_bracket(monthly_bonus, tables.brackets(TaxPeriod::Monthly));
    let tax = round2(bracket.tax_on(bonus)).max(Decimal::ZERO);
    let after_tax = round2(bonus - tax);

    debug!(%bonus, rate = %bracket.rate, %tax, "Taxed bonus separately");

    let steps = StepLog::new()
        .record("Bonus", round2(bonus), "")
        .record(
            "Monthly average",
            round2(monthly_bonus),
            format!("{} ÷ 12", money(bonus)),
        )
        .record("Applicable rate", percent(bracket.rate), "")
        .record("Quick deduction", round2(bracket.quick_deduction), "")
        .record(
            "Tax payable",
            tax,
            format!(
                "{} × {} - {}",
                money(bonus),
                percent(bracket.rate),
                money(bracket.quick_deduction)
            ),
        )
        .record(
            "After-tax bonus",
            after_tax,
            format!("{} - {}", money(bonus), money(tax)),
        );

    BonusTaxResult {
        method: BonusMethod::Separate,
        bonus: round2(bonus),
        tax,
        after_tax,
        rate: bracket.rate,
        annual_income: None,
        total_income: None,
        steps,
    }
}

fn combined(
    bonus: Decimal,
    annual_income: Decimal,
    tables: &TaxTables,
) -> EngineResult<BonusTaxResult> {
    let annual_income = check_amount("annual income", annual_income)?;
    let total_income = annual_income + bonus;
    let individual = calculate_individual_tax(
        total_income,
        &Deductions::basic_only(tables.basic_deduction(TaxPeriod::Annual)),
        TaxPeriod::Annual,
        tables,
    )?;

    debug!(%bonus, %annual_income, tax = %individual.tax, "Taxed bonus with annual income");

    let steps = StepLog::new()
        .record("Annual income", round2(annual_income), "")
        .record("Bonus", round2(bonus), "")
        .record(
            "Total income",
            round2(total_income),
            format!("{} + {}", money(annual_income), money(bonus)),
        )
        .record("Taxable income", individual.taxable_income, "")
        .record("Tax payable", individual.tax, "")
        .record("After-tax income", individual.after_tax, "");

    Ok(BonusTaxResult {
        method: BonusMethod::Combined,
        bonus: round2(bonus),
        tax: individual.tax,
        after_tax: individual.after_tax,
        rate: individual.rate,
        annual_income: Some(round2(annual_income)),
        total_income: Some(round2(total_income)),
        steps,
    })
}

/// Calculates a bonus under both methods and recommends the cheaper one.
///
/// The combined tax already covers annual income, so the separate method is
/// compared on its bonus tax plus the tax annual income would bear alone.
///
/// # Errors
///
/// Fails under the same conditions as [`calculate_bonus_tax`].
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::compare_bonus_methods;
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::BonusMethod;
///
/// let comparison =
///     compare_bonus_methods(dec!(30000), dec!(40000), TaxTables::statutory()).unwrap();
///
/// // Combined income of 70000 leaves only 10000 taxable at 3%
/// assert_eq!(comparison.combined.tax, dec!(300));
/// assert_eq!(comparison.separate.tax, dec!(900));
/// assert_eq!(comparison.recommended, BonusMethod::Combined);
/// assert_eq!(comparison.saving, dec!(600));
/// ```
pub fn compare_bonus_methods(
    bonus: Decimal,
    annual_income: Decimal,
    tables: &TaxTables,
) -> EngineResult<BonusComparison> {
    let separate = calculate_bonus_tax(bonus, BonusMethod::Separate, annual_income, tables)?;
    let combined = calculate_bonus_tax(bonus, BonusMethod::Combined, annual_income, tables)?;
    let income_alone = calculate_individual_tax(
        annual_income,
        &Deductions::basic_only(tables.basic_deduction(TaxPeriod::Annual)),
        TaxPeriod::Annual,
        tables,
    )?;

    let separate_total_tax = separate.tax + income_alone.tax;
    let combined_total_tax = combined.tax;
    let recommended = if combined_total_tax < separate_total_tax {
        BonusMethod::Combined
    } else {
        BonusMethod::Separate
    };
    let saving = (separate_total_tax - combined_total_tax).abs();

    Ok(BonusComparison {
        separate,
        combined,
        separate_total_tax,
        combined_total_tax,
        recommended,
        saving,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn tables() -> &'static TaxTables {
        TaxTables::statutory()
    }

    fn taxed_separately(bonus: Decimal) -> BonusTaxResult {
        calculate_bonus_tax(bonus, BonusMethod::Separate, dec!(0), tables()).unwrap()
    }

    fn taxed_combined(bonus: Decimal, annual_income: Decimal) -> BonusTaxResult {
        calculate_bonus_tax(bonus, BonusMethod::Combined, annual_income, tables()).unwrap()
    }

    #[test]
    fn test_separate_first_bracket_boundary() {
        let result = taxed_separately(dec!(36000));

        assert_eq!(result.method, BonusMethod::Separate);
        assert_eq!(result.rate, dec!(0.03));
        assert_eq!(result.tax, dec!(1080));
        assert_eq!(result.after_tax, dec!(34920));
        assert_eq!(result.annual_income, None);
        assert_eq!(result.total_income, None);
    }

    #[test]
    fn test_separate_applies_quick_deduction_once() {
        // 60000 / 12 = 5000 resolves to 10% with quick deduction 210
        let result = taxed_separately(dec!(60000));

        assert_eq!(result.rate, dec!(0.10));
        assert_eq!(result.tax, dec!(5790));
        assert_eq!(result.after_tax, dec!(54210));
    }

    #[test]
    fn test_separate_notch_just_above_boundary() {
        // One cent over the 3000 monthly boundary jumps the whole bonus to 10%
        let result = taxed_separately(dec!(36000.12));

        assert_eq!(result.rate, dec!(0.10));
        assert_eq!(result.tax, dec!(3390.01));
    }

    #[test]
    fn test_separate_zero_bonus() {
        let result = taxed_separately(dec!(0));

        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.after_tax, Decimal::ZERO);
        assert_eq!(result.rate, dec!(0.03));
    }

    #[test]
    fn test_separate_records_monthly_average() {
        let result = taxed_separately(dec!(50000));
        let step = result.steps.find("Monthly average").unwrap();

        assert_eq!(step.value.to_string(), "4166.67");
        assert_eq!(step.formula, "50000.00 ÷ 12");
    }

    #[test]
    fn test_combined_matches_individual_tax() {
        let result = taxed_combined(dec!(30000), dec!(100000));
        let individual = calculate_individual_tax(
            dec!(130000),
            &Deductions::basic_only(dec!(60000)),
            TaxPeriod::Annual,
            tables(),
        )
        .unwrap();

        assert_eq!(result.method, BonusMethod::Combined);
        assert_eq!(result.tax, individual.tax);
        assert_eq!(result.tax, dec!(4480));
        assert_eq!(result.after_tax, dec!(125520));
        assert_eq!(result.annual_income, Some(dec!(100000)));
        assert_eq!(result.total_income, Some(dec!(130000)));
    }

    #[test]
    fn test_combined_steps() {
        let result = taxed_combined(dec!(30000), dec!(100000));
        let labels: Vec<&str> = result
            .steps
            .steps()
            .iter()
            .map(|s| s.label.as_str())
            .collect();

        assert_eq!(
            labels,
            vec![
                "Annual income",
                "Bonus",
                "Total income",
                "Taxable income",
                "Tax payable",
                "After-tax income"
            ]
        );
        assert_eq!(
            result.steps.find("Total income").unwrap().formula,
            "100000.00 + 30000.00"
        );
    }

    #[test]
    fn test_compare_prefers_separate_on_tie() {
        // Both methods owe nothing
        let comparison = compare_bonus_methods(dec!(0), dec!(10000), tables()).unwrap();

        assert_eq!(comparison.separate.tax, Decimal::ZERO);
        assert_eq!(comparison.combined.tax, Decimal::ZERO);
        assert_eq!(comparison.recommended, BonusMethod::Separate);
        assert_eq!(comparison.saving, Decimal::ZERO);
    }

    #[test]
    fn test_compare_prefers_separate_for_high_earners() {
        let comparison = compare_bonus_methods(dec!(36000), dec!(300000), tables()).unwrap();

        // Income alone: 240000 × 20% - 16920 = 31080; bonus separately: 1080
        assert_eq!(comparison.separate.tax, dec!(1080));
        assert_eq!(comparison.separate_total_tax, dec!(32160));
        // Combined: 276000 × 20% - 16920 = 38280
        assert_eq!(comparison.combined_total_tax, dec!(38280));
        assert_eq!(comparison.recommended, BonusMethod::Separate);
        assert_eq!(comparison.saving, dec!(6120));
    }

    #[test]
    fn test_compare_prefers_combined_when_income_is_below_threshold() {
        let comparison = compare_bonus_methods(dec!(30000), dec!(40000), tables()).unwrap();

        assert_eq!(comparison.separate_total_tax, dec!(900));
        assert_eq!(comparison.combined_total_tax, dec!(300));
        assert_eq!(comparison.recommended, BonusMethod::Combined);
        assert_eq!(comparison.saving, dec!(600));
    }

    #[test]
    fn test_oversized_bonus_is_a_calculation_error() {
        for method in [BonusMethod::Separate, BonusMethod::Combined] {
            let result = calculate_bonus_tax(Decimal::MAX, method, dec!(0), tables());
            assert!(matches!(result, Err(EngineError::CalculationError { .. })));
        }
    }

    #[test]
    fn test_oversized_combined_income_is_a_calculation_error() {
        let result =
            calculate_bonus_tax(Decimal::MAX, BonusMethod::Combined, Decimal::MAX, tables());
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));

        // Each part is within range but the total is not
        let result = calculate_bonus_tax(
            dec!(900_000_000_000_000),
            BonusMethod::Combined,
            dec!(900_000_000_000_000),
            tables(),
        );
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_compare_propagates_oversized_income() {
        let result = compare_bonus_methods(dec!(1000), Decimal::MAX, tables());
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }
}
