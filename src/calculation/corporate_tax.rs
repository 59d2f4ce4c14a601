//! Corporate income tax calculation.
//!
//! Supports the standard rate, the high-tech enterprise rate and the tiered
//! small low-profit enterprise relief.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CorporateRates, TaxTables};
use crate::error::{EngineError, EngineResult};
use crate::models::{Adjustments, CompanyType, StepLog, check_amount};

use super::rounding::{money, percent, percent_fixed, round2, round_rate};

/// The result of a corporate income tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateTaxResult {
    /// The company type the tax was calculated for.
    pub company_type: CompanyType,
    /// Operating revenue.
    pub revenue: Decimal,
    /// Operating costs.
    pub costs: Decimal,
    /// Revenue less costs.
    pub profit: Decimal,
    /// Profit after tax adjustments.
    pub taxable_income: Decimal,
    /// Tax payable.
    pub tax: Decimal,
    /// Tax as a fraction of taxable income, to four decimals.
    pub effective_rate: Decimal,
    /// Tax as a fraction of revenue, to four decimals.
    pub tax_burden_rate: Decimal,
    /// The ordered calculation log.
    pub steps: StepLog,
}

/// Calculates corporate income tax.
///
/// Taxable income is `profit + increase - decrease`. A taxable income of zero
/// or less is a tax loss: no tax is due and both rates are zero.
///
/// Small enterprises pay the first-tier rate on taxable income up to the
/// first-tier ceiling. Between the two ceilings, the first tier is taxed at
/// the first-tier rate and the excess at the second-tier rate. Above the
/// small enterprise ceiling the standard rate applies to all of it.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if revenue, costs or either
/// adjustment exceeds [`MAX_AMOUNT`](crate::models::MAX_AMOUNT) in
/// magnitude, or if revenue is too small to express the tax burden rate.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::calculate_corporate_tax;
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::{Adjustments, CompanyType};
///
/// let result = calculate_corporate_tax(
///     dec!(900000),
///     dec!(400000),
///     &Adjustments::default(),
///     CompanyType::Small,
///     TaxTables::statutory(),
/// )
/// .unwrap();
///
/// assert_eq!(result.taxable_income, dec!(500000));
/// assert_eq!(result.tax, dec!(12500));
/// assert_eq!(result.effective_rate, dec!(0.025));
/// ```
pub fn calculate_corporate_tax(
    revenue: Decimal,
    costs: Decimal,
    adjustments: &Adjustments,
    company_type: CompanyType,
    tables: &TaxTables,
) -> EngineResult<CorporateTaxResult> {
    let revenue = check_amount("revenue", revenue)?;
    let costs = check_amount("costs", costs)?;
    check_amount("adjustments added", adjustments.increase)?;
    check_amount("adjustments deducted", adjustments.decrease)?;

    let profit = round2(revenue - costs);
    let taxable_income = round2(profit + adjustments.increase - adjustments.decrease);

    let mut steps = StepLog::new()
        .record("Revenue", round2(revenue), "")
        .record("Costs", round2(costs), "")
        .record(
            "Profit",
            profit,
            format!("{} - {}", money(revenue), money(costs)),
        );

    steps = if adjustments.is_adjusted() {
        steps
            .record("Adjustments added", round2(adjustments.increase), "")
            .record("Adjustments deducted", round2(adjustments.decrease), "")
            .record(
                "Taxable income",
                taxable_income,
                format!(
                    "{} + {} - {}",
                    money(profit),
                    money(adjustments.increase),
                    money(adjustments.decrease)
                ),
            )
    } else {
        steps.record("Taxable income", taxable_income, "")
    };

    let (tax, effective_rate, steps) = if taxable_income <= Decimal::ZERO {
        (
            Decimal::ZERO,
            Decimal::ZERO,
            steps.record("Tax loss", taxable_income, "no tax payable on a loss"),
        )
    } else {
        apply_rates(taxable_income, company_type, tables.corporate(), steps)
    };

    let tax_burden_rate = if revenue > Decimal::ZERO {
        tax.checked_div(revenue)
            .map(round_rate)
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("tax burden of {} on revenue {} is out of range", tax, revenue),
            })?
    } else {
        Decimal::ZERO
    };

    debug!(
        %taxable_income,
        ?company_type,
        %tax,
        "Calculated corporate income tax"
    );

    let steps = steps
        .record("Tax payable", tax, "")
        .record(
            "Tax burden rate",
            percent_fixed(tax_burden_rate, 2),
            format!("{} ÷ {}", money(tax), money(revenue)),
        );

    Ok(CorporateTaxResult {
        company_type,
        revenue: round2(revenue),
        costs: round2(costs),
        profit,
        taxable_income,
        tax,
        effective_rate: round_rate(effective_rate),
        tax_burden_rate,
        steps,
    })
}

/// Applies the company type's rate schedule to a positive taxable income.
fn apply_rates(
    taxable_income: Decimal,
    company_type: CompanyType,
    rates: &CorporateRates,
    steps: StepLog,
) -> (Decimal, Decimal, StepLog) {
    match company_type {
        CompanyType::Normal => flat(taxable_income, rates.normal, "standard rate", steps),
        CompanyType::Hightech => flat(
            taxable_income,
            rates.high_tech,
            "high-tech enterprise",
            steps,
        ),
        CompanyType::Small if taxable_income <= rates.small_tier_1_ceiling => flat(
            taxable_income,
            rates.small_tier_1_rate,
            "small enterprise relief",
            steps,
        ),
        CompanyType::Small if taxable_income <= rates.small_ceiling => {
            let ceiling = rates.small_tier_1_ceiling;
            let excess = taxable_income - ceiling;
            let first_tier = round2(ceiling * rates.small_tier_1_rate);
            let second_tier = round2(excess * rates.small_tier_2_rate);
            let tax = round2(first_tier + second_tier);

            let steps = steps
                .record(
                    format!("Portion up to {}", money(ceiling)),
                    first_tier,
                    format!("{} × {}", money(ceiling), percent(rates.small_tier_1_rate)),
                )
                .record(
                    format!("Portion above {}", money(ceiling)),
                    second_tier,
                    format!("{} × {}", money(excess), percent(rates.small_tier_2_rate)),
                );

            (tax, tax / taxable_income, steps)
        }
        CompanyType::Small => flat(
            taxable_income,
            rates.normal,
            "above small enterprise ceiling",
            steps,
        ),
    }
}

fn flat(
    taxable_income: Decimal,
    rate: Decimal,
    basis: &str,
    steps: StepLog,
) -> (Decimal, Decimal, StepLog) {
    let tax = round2(taxable_income * rate);
    let steps = steps.record(
        "Applicable rate",
        format!("{} ({})", percent(rate), basis),
        format!("{} × {}", money(taxable_income), percent(rate)),
    );
    (tax, rate, steps)
}
