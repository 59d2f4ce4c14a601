//! Social insurance contributions and monthly salary tax.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaxTables;
use crate::error::EngineResult;
use crate::models::{
    Deductions, SocialInsuranceRates, StepLog, TaxPeriod, check_amount, check_rate,
};

use super::individual_tax::calculate_individual_tax;
use super::rounding::round2;

/// Employee social insurance and housing fund contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsuranceResult {
    /// Contribution base: the salary, capped at the base limit if a positive one is set.
    pub base: Decimal,
    /// Pension insurance contribution.
    pub pension: Decimal,
    /// Medical insurance contribution.
    pub medical: Decimal,
    /// Unemployment insurance contribution.
    pub unemployment: Decimal,
    /// Housing provident fund contribution.
    pub housing_fund: Decimal,
    /// Sum of all four contributions.
    pub total: Decimal,
}

/// The result of a monthly salary tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryTaxResult {
    /// Gross monthly salary.
    pub salary: Decimal,
    /// Social insurance total deducted as the special deduction.
    pub social_insurance: Decimal,
    /// Special additional deductions.
    pub additional_deduction: Decimal,
    /// Salary less all deductions, floored at zero.
    pub taxable_income: Decimal,
    /// Tax withheld.
    pub tax: Decimal,
    /// Net pay: salary less social insurance and tax.
    pub after_tax: Decimal,
    /// Marginal rate of the resolved monthly bracket.
    pub rate: Decimal,
    /// The ordered calculation log.
    pub steps: StepLog,
}

/// Social insurance and salary tax for one month, chained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// The contributions.
    pub social_insurance: SocialInsuranceResult,
    /// The salary tax, using the contributions as the special deduction.
    pub salary_tax: SalaryTaxResult,
}

/// Calculates employee social insurance contributions.
///
/// Contributions are taken on `min(salary, base_limit)`, or on the salary
/// when no limit is given. A limit of zero or less leaves the base uncapped.
/// Each contribution is rounded to cents before they are totalled. Any rate
/// left unset uses the default from `tables`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::calculate_social_insurance;
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::SocialInsuranceRates;
///
/// let result = calculate_social_insurance(
///     dec!(10000),
///     &SocialInsuranceRates::default(),
///     None,
///     TaxTables::statutory(),
/// )
/// .unwrap();
///
/// assert_eq!(result.pension, dec!(800));
/// assert_eq!(result.total, dec!(2250));
/// ```
///
/// # Errors
///
/// Returns `CalculationError` when the salary or the limit exceeds
/// [`MAX_AMOUNT`](crate::models::MAX_AMOUNT) in magnitude, or a rate
/// exceeds [`MAX_RATE`](crate::models::MAX_RATE).
pub fn calculate_social_insurance(
    salary: Decimal,
    rates: &SocialInsuranceRates,
    base_limit: Option<Decimal>,
    tables: &TaxTables,
) -> EngineResult<SocialInsuranceResult> {
    let defaults = tables.social_insurance();
    let salary = check_amount("salary", salary)?;
    let base = match base_limit {
        Some(limit) if limit > Decimal::ZERO => salary.min(check_amount("base limit", limit)?),
        _ => salary,
    };

    let contribution = |field: &str, rate: Option<Decimal>, default: Decimal| {
        check_rate(field, rate.unwrap_or(default)).map(|rate| round2(base * rate))
    };

    let pension = contribution("pension rate", rates.pension, defaults.pension)?;
    let medical = contribution("medical rate", rates.medical, defaults.medical)?;
    let unemployment =
        contribution("unemployment rate", rates.unemployment, defaults.unemployment)?;
    let housing_fund =
        contribution("housing fund rate", rates.housing_fund, defaults.housing_fund)?;
    let total = round2(pension + medical + unemployment + housing_fund);

    Ok(SocialInsuranceResult {
        base: round2(base),
        pension,
        medical,
        unemployment,
        housing_fund,
        total,
    })
}

/// Calculates monthly individual income tax on a salary.
///
/// Delegates to [`calculate_individual_tax`] on the monthly table with the
/// statutory monthly basic deduction, `social_insurance_total` as the
/// special deduction and `additional_deduction` as the special additional
/// deduction. The step log is the individual tax log.
///
/// # Errors
///
/// Returns `CalculationError` when any amount exceeds
/// [`MAX_AMOUNT`](crate::models::MAX_AMOUNT) in magnitude.
pub fn calculate_salary_tax(
    salary: Decimal,
    social_insurance_total: Decimal,
    additional_deduction: Decimal,
    tables: &TaxTables,
) -> EngineResult<SalaryTaxResult> {
    let deductions = Deductions {
        basic: Some(tables.basic_deduction(TaxPeriod::Monthly)),
        special: social_insurance_total,
        additional: additional_deduction,
        other: Decimal::ZERO,
    };
    let result = calculate_individual_tax(salary, &deductions, TaxPeriod::Monthly, tables)?;

    Ok(SalaryTaxResult {
        salary: round2(salary),
        social_insurance: round2(social_insurance_total),
        additional_deduction: round2(additional_deduction),
        taxable_income: result.taxable_income,
        tax: result.tax,
        after_tax: result.after_tax,
        rate: result.rate,
        steps: result.steps,
    })
}

/// Derives net pay from a gross monthly salary.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::calculate_payroll;
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::SocialInsuranceRates;
///
/// let payroll = calculate_payroll(
///     dec!(10000),
///     &SocialInsuranceRates::default(),
///     None,
///     dec!(0),
///     TaxTables::statutory(),
/// )
/// .unwrap();
///
/// // 10000 - 5000 - 2250 = 2750 taxable at 3%
/// assert_eq!(payroll.salary_tax.tax, dec!(82.50));
/// assert_eq!(payroll.salary_tax.after_tax, dec!(7667.50));
/// ```
///
/// # Errors
///
/// Propagates the magnitude errors of [`calculate_social_insurance`] and
/// [`calculate_salary_tax`].
pub fn calculate_payroll(
    salary: Decimal,
    rates: &SocialInsuranceRates,
    base_limit: Option<Decimal>,
    additional_deduction: Decimal,
    tables: &TaxTables,
) -> EngineResult<PayrollResult> {
    let social_insurance = calculate_social_insurance(salary, rates, base_limit, tables)?;
    let salary_tax =
        calculate_salary_tax(salary, social_insurance.total, additional_deduction, tables)?;

    debug!(
        %salary,
        social_insurance = %social_insurance.total,
        tax = %salary_tax.tax,
        net = %salary_tax.after_tax,
        "Calculated payroll"
    );

    Ok(PayrollResult {
        social_insurance,
        salary_tax,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::MAX_AMOUNT;
    use rust_decimal_macros::dec;

    fn tables() -> &'static TaxTables {
        TaxTables::statutory()
    }

    fn contributions(salary: Decimal, base_limit: Option<Decimal>) -> SocialInsuranceResult {
        calculate_social_insurance(salary, &SocialInsuranceRates::default(), base_limit, tables())
            .unwrap()
    }

    #[test]
    fn test_default_rates() {
        let result = contributions(dec!(10000), None);

        assert_eq!(result.base, dec!(10000));
        assert_eq!(result.pension, dec!(800));
        assert_eq!(result.medical, dec!(200));
        assert_eq!(result.unemployment, dec!(50));
        assert_eq!(result.housing_fund, dec!(1200));
        assert_eq!(result.total, dec!(2250));
    }

    #[test]
    fn test_base_limit_caps_contributions() {
        let result = contributions(dec!(50000), Some(dec!(30000)));

        assert_eq!(result.base, dec!(30000));
        assert_eq!(result.total, dec!(6750));
    }

    #[test]
    fn test_base_limit_above_salary_has_no_effect() {
        let result = contributions(dec!(8000), Some(dec!(30000)));

        assert_eq!(result.base, dec!(8000));
    }

    #[test]
    fn test_explicit_rates_override_defaults() {
        let rates = SocialInsuranceRates {
            housing_fund: Some(dec!(0.05)),
            medical: Some(dec!(0)),
            ..SocialInsuranceRates::default()
        };
        let result = calculate_social_insurance(dec!(10000), &rates, None, tables()).unwrap();

        assert_eq!(result.housing_fund, dec!(500));
        assert_eq!(result.medical, dec!(0));
        assert_eq!(result.pension, dec!(800));
        assert_eq!(result.total, dec!(1350));
    }

    #[test]
    fn test_components_are_rounded_before_totalling() {
        let result = contributions(dec!(3333.33), None);

        // 266.6664 + 66.6666 + 16.66665 + 399.9996
        assert_eq!(result.pension, dec!(266.67));
        assert_eq!(result.medical, dec!(66.67));
        assert_eq!(result.unemployment, dec!(16.67));
        assert_eq!(result.housing_fund, dec!(400.00));
        assert_eq!(result.total, dec!(750.01));
    }

    #[test]
    fn test_salary_tax() {
        let result = calculate_salary_tax(dec!(20000), dec!(4500), dec!(2000), tables()).unwrap();

        // 20000 - 5000 - 4500 - 2000 = 8500; 8500 × 10% - 210 = 640
        assert_eq!(result.taxable_income, dec!(8500));
        assert_eq!(result.tax, dec!(640));
        assert_eq!(result.rate, dec!(0.10));
        assert_eq!(result.after_tax, dec!(14860));
        assert_eq!(result.social_insurance, dec!(4500));
        assert_eq!(result.additional_deduction, dec!(2000));
    }

    #[test]
    fn test_salary_tax_matches_individual_tax() {
        let salary_tax =
            calculate_salary_tax(dec!(12345.67), dec!(1500), dec!(1000), tables()).unwrap();
        let individual = calculate_individual_tax(
            dec!(12345.67),
            &Deductions {
                basic: Some(dec!(5000)),
                special: dec!(1500),
                additional: dec!(1000),
                other: dec!(0),
            },
            TaxPeriod::Monthly,
            tables(),
        )
        .unwrap();

        assert_eq!(salary_tax.tax, individual.tax);
        assert_eq!(salary_tax.after_tax, individual.after_tax);
        assert_eq!(salary_tax.steps, individual.steps);
    }

    #[test]
    fn test_low_salary_pays_no_tax() {
        let result = calculate_salary_tax(dec!(5000), dec!(1125), dec!(0), tables()).unwrap();

        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.after_tax, dec!(3875));
    }

    #[test]
    fn test_payroll_chains_contributions_into_tax() {
        let payroll = calculate_payroll(
            dec!(10000),
            &SocialInsuranceRates::default(),
            None,
            dec!(0),
            tables(),
        )
        .unwrap();

        assert_eq!(payroll.salary_tax.social_insurance, payroll.social_insurance.total);
        assert_eq!(payroll.salary_tax.taxable_income, dec!(2750));
        assert_eq!(payroll.salary_tax.tax, dec!(82.50));
        assert_eq!(
            payroll.salary_tax.after_tax,
            dec!(10000) - payroll.social_insurance.total - payroll.salary_tax.tax
        );
    }

    #[test]
    fn test_zero_base_limit_leaves_the_base_uncapped() {
        let zero = contributions(dec!(10000), Some(dec!(0)));
        let negative = contributions(dec!(10000), Some(dec!(-1)));
        let unlimited = contributions(dec!(10000), None);

        assert_eq!(zero.base, dec!(10000));
        assert_eq!(zero, unlimited);
        assert_eq!(negative, unlimited);
    }

    #[test]
    fn test_oversized_salary_is_a_calculation_error() {
        let result = calculate_social_insurance(
            Decimal::MAX,
            &SocialInsuranceRates::default(),
            None,
            tables(),
        );
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));

        let payroll = calculate_payroll(
            Decimal::MAX,
            &SocialInsuranceRates::default(),
            Some(dec!(30000)),
            dec!(0),
            tables(),
        );
        assert!(matches!(payroll, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_oversized_rate_is_a_calculation_error() {
        let rates = SocialInsuranceRates {
            pension: Some(Decimal::MAX),
            ..SocialInsuranceRates::default()
        };
        let result = calculate_social_insurance(MAX_AMOUNT, &rates, None, tables());

        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_oversized_additional_deduction_is_a_calculation_error() {
        let result = calculate_salary_tax(dec!(20000), dec!(4500), Decimal::MAX, tables());

        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_largest_supported_salary_is_calculated() {
        let payroll = calculate_payroll(
            MAX_AMOUNT,
            &SocialInsuranceRates::default(),
            None,
            dec!(0),
            tables(),
        )
        .unwrap();

        // 22.5% of the salary goes to contributions
        assert_eq!(payroll.social_insurance.total, dec!(225_000_000_000_000));
        assert!(payroll.salary_tax.after_tax > Decimal::ZERO);
    }
}
