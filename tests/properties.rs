//! Property-based tests for the calculators.
//!
//! Amounts are generated as whole cents so every input has at most two
//! decimals, the same shape callers send over the API.

use proptest::prelude::*;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use tax_engine::calculation::{
    calculate_bonus_tax, calculate_corporate_tax, calculate_individual_tax, calculate_mortgage,
    calculate_payroll, calculate_social_insurance, calculate_vat, resolve_bracket, round2,
};
use tax_engine::config::TaxTables;
use tax_engine::error::EngineError;
use tax_engine::models::{
    Adjustments, BonusMethod, CompanyType, Deductions, MAX_AMOUNT, RepaymentMethod,
    SocialInsuranceRates, TaxPeriod,
};

fn cents(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(100)
}

fn no_deductions() -> Deductions {
    Deductions::basic_only(Decimal::ZERO)
}

fn period() -> impl Strategy<Value = TaxPeriod> {
    prop_oneof![Just(TaxPeriod::Annual), Just(TaxPeriod::Monthly)]
}

fn vat_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(dec!(0.13)),
        Just(dec!(0.09)),
        Just(dec!(0.06)),
        Just(dec!(0.03)),
        Just(dec!(0.01)),
    ]
}

#[test]
fn test_statutory_examples() {
    let tables = TaxTables::statutory();

    let individual = calculate_individual_tax(
        dec!(100000),
        &Deductions::default(),
        TaxPeriod::Annual,
        tables,
    )
    .expect("Failed to calculate individual tax");
    assert_eq!(individual.taxable_income, dec!(40000));
    assert_eq!(individual.tax, dec!(1480));

    let mortgage = calculate_mortgage(
        dec!(1000000),
        dec!(0.05),
        360,
        RepaymentMethod::EqualPayment,
    )
    .expect("Failed to build schedule");
    assert_eq!(mortgage.monthly_payment, dec!(5368.22));
    assert_eq!(mortgage.schedule.len(), 360);

    let vat = calculate_vat(dec!(1130), dec!(0.13), true, Decimal::ZERO)
        .expect("Failed to calculate VAT");
    assert_eq!(vat.amount_without_tax, dec!(1000));
    assert_eq!(vat.output_tax, dec!(130));

    let corporate = calculate_corporate_tax(
        dec!(900000),
        dec!(400000),
        &Adjustments::default(),
        CompanyType::Small,
        tables,
    )
    .expect("Failed to calculate corporate tax");
    assert_eq!(corporate.tax, dec!(12500));
}

proptest! {
    /// Property: tax is the resolved bracket's quick-deduction formula, floored at zero
    #[test]
    fn prop_bracket_formula_consistency(
        taxable in 0u64..200_000_000u64,
        period in period(),
    ) {
        let tables = TaxTables::statutory();
        let taxable = cents(taxable);

        let result = calculate_individual_tax(taxable, &no_deductions(), period, tables).unwrap();
        let bracket = resolve_bracket(taxable, tables.brackets(period));

        prop_assert_eq!(result.taxable_income, taxable);
        prop_assert_eq!(result.rate, bracket.rate);
        prop_assert_eq!(
            result.tax,
            round2(taxable * bracket.rate - bracket.quick_deduction).max(Decimal::ZERO)
        );
    }

    /// Property: taxable income is income less every deduction, floored at zero
    #[test]
    fn prop_taxable_income_arithmetic(
        income in 0u64..100_000_000u64,
        basic in 0u64..10_000_000u64,
        special in 0u64..5_000_000u64,
        additional in 0u64..5_000_000u64,
        other in 0u64..5_000_000u64,
    ) {
        let deductions = Deductions {
            basic: Some(cents(basic)),
            special: cents(special),
            additional: cents(additional),
            other: cents(other),
        };
        let income = cents(income);

        let result = calculate_individual_tax(
            income,
            &deductions,
            TaxPeriod::Annual,
            TaxTables::statutory(),
        ).unwrap();

        let expected = (income
            - deductions.basic.unwrap_or_default()
            - deductions.special
            - deductions.additional
            - deductions.other)
            .max(Decimal::ZERO);
        prop_assert_eq!(result.taxable_income, expected);
        prop_assert!(result.tax >= Decimal::ZERO);
    }

    /// Property: the separate method taxes the whole bonus at the rate for bonus / 12
    #[test]
    fn prop_bonus_separate_method(bonus in 0u64..500_000_000u64) {
        let tables = TaxTables::statutory();
        let bonus = cents(bonus);

        let result =
            calculate_bonus_tax(bonus, BonusMethod::Separate, Decimal::ZERO, tables).unwrap();
        let bracket = resolve_bracket(bonus / dec!(12), tables.brackets(TaxPeriod::Monthly));

        prop_assert_eq!(
            result.tax,
            round2(bonus * bracket.rate - bracket.quick_deduction).max(Decimal::ZERO)
        );
        prop_assert_eq!(result.after_tax, round2(bonus - result.tax));
    }

    /// Property: the combined method is individual tax on income plus bonus
    #[test]
    fn prop_bonus_combined_equivalence(
        bonus in 0u64..100_000_000u64,
        annual_income in 0u64..200_000_000u64,
    ) {
        let tables = TaxTables::statutory();
        let bonus = cents(bonus);
        let annual_income = cents(annual_income);

        let combined =
            calculate_bonus_tax(bonus, BonusMethod::Combined, annual_income, tables).unwrap();
        let deductions = Deductions::basic_only(tables.basic_deduction(TaxPeriod::Annual));
        let individual = calculate_individual_tax(
            annual_income + bonus,
            &deductions,
            TaxPeriod::Annual,
            tables,
        ).unwrap();

        prop_assert_eq!(combined.tax, individual.tax);
    }

    /// Property: both VAT directions round each quantity once from the previous one
    #[test]
    fn prop_vat_direction_consistency(
        amount in 0u64..100_000_000u64,
        rate in vat_rate(),
        includes_tax in any::<bool>(),
    ) {
        let amount = cents(amount);
        let result = calculate_vat(amount, rate, includes_tax, Decimal::ZERO).unwrap();

        if includes_tax {
            prop_assert_eq!(result.amount_without_tax, round2(amount / (Decimal::ONE + rate)));
            prop_assert_eq!(result.output_tax, round2(result.amount_without_tax * rate));
            prop_assert_eq!(result.amount_with_tax, amount);
        } else {
            prop_assert_eq!(result.output_tax, round2(amount * rate));
            prop_assert_eq!(result.amount_with_tax, round2(amount + result.output_tax));
            prop_assert_eq!(result.amount_without_tax, amount);
        }
    }

    /// Property: payable VAT is output tax less input tax
    #[test]
    fn prop_vat_payable(
        amount in 0u64..100_000_000u64,
        input_tax in 0u64..10_000_000u64,
        rate in vat_rate(),
    ) {
        let input_tax = cents(input_tax);
        let result = calculate_vat(cents(amount), rate, false, input_tax).unwrap();

        prop_assert_eq!(result.payable_tax, round2(result.output_tax - input_tax));
    }

    /// Property: profit and taxable income follow the adjustment arithmetic
    #[test]
    fn prop_corporate_profit_adjustments(
        revenue in 0u64..1_000_000_000u64,
        costs in 0u64..1_000_000_000u64,
        increase in 0u64..10_000_000u64,
        decrease in 0u64..10_000_000u64,
    ) {
        let adjustments = Adjustments {
            increase: cents(increase),
            decrease: cents(decrease),
        };
        let result = calculate_corporate_tax(
            cents(revenue),
            cents(costs),
            &adjustments,
            CompanyType::Normal,
            TaxTables::statutory(),
        ).unwrap();

        prop_assert_eq!(result.profit, round2(cents(revenue) - cents(costs)));
        prop_assert_eq!(
            result.taxable_income,
            round2(result.profit + adjustments.increase - adjustments.decrease)
        );
        prop_assert!(result.tax >= Decimal::ZERO);
    }

    /// Property: small enterprise relief is tiered at 2.5% and 5%
    #[test]
    fn prop_small_enterprise_tiering(taxable in 1u64..300_000_000u64) {
        let taxable = cents(taxable);
        let result = calculate_corporate_tax(
            taxable,
            Decimal::ZERO,
            &Adjustments::default(),
            CompanyType::Small,
            TaxTables::statutory(),
        ).unwrap();

        let expected = if taxable <= dec!(1000000) {
            round2(taxable * dec!(0.025))
        } else {
            round2(dec!(1000000) * dec!(0.025) + (taxable - dec!(1000000)) * dec!(0.05))
        };
        prop_assert_eq!(result.tax, expected);
    }

    /// Property: the equal-payment instalment is the annuity formula
    #[test]
    fn prop_mortgage_equal_payment_formula(
        principal in 100_000u64..500_000_000u64,
        rate_bp in 1u32..1500u32,
        months in 1u32..361u32,
    ) {
        let principal = cents(principal);
        let annual_rate = Decimal::from(rate_bp) / dec!(10000);
        let result = calculate_mortgage(
            principal,
            annual_rate,
            months,
            RepaymentMethod::EqualPayment,
        ).unwrap();

        let monthly_rate = annual_rate / dec!(12);
        let factor = (Decimal::ONE + monthly_rate).powu(u64::from(months));
        prop_assert_eq!(
            result.monthly_payment,
            round2(principal * monthly_rate * factor / (factor - Decimal::ONE))
        );
    }

    /// Property: schedules cover every month and repay the principal
    #[test]
    fn prop_mortgage_schedule_completeness(
        principal in 100_000u64..500_000_000u64,
        rate_bp in 0u32..1500u32,
        months in 1u32..361u32,
        equal_principal in any::<bool>(),
    ) {
        let principal = cents(principal);
        let method = if equal_principal {
            RepaymentMethod::EqualPrincipal
        } else {
            RepaymentMethod::EqualPayment
        };
        let result = calculate_mortgage(
            principal,
            Decimal::from(rate_bp) / dec!(10000),
            months,
            method,
        ).unwrap();

        prop_assert_eq!(result.schedule.len(), months as usize);
        let last = result.schedule.last().unwrap();
        prop_assert!(last.remaining_balance < Decimal::ONE);

        let repaid: Decimal = result.schedule.iter().map(|p| p.principal_portion).sum();
        prop_assert!((repaid - principal).abs() <= Decimal::ONE);
        prop_assert!(
            (result.total_payment - round2(principal + result.total_interest)).abs()
                <= Decimal::ONE
        );
    }

    /// Property: the contribution total is the sum of its rounded parts
    #[test]
    fn prop_social_insurance_total(
        salary in 0u64..10_000_000u64,
        base_limit in proptest::option::of(0u64..5_000_000u64),
    ) {
        let result = calculate_social_insurance(
            cents(salary),
            &SocialInsuranceRates::default(),
            base_limit.map(cents),
            TaxTables::statutory(),
        ).unwrap();

        prop_assert_eq!(
            result.total,
            round2(result.pension + result.medical + result.unemployment + result.housing_fund)
        );
        prop_assert!(result.base <= cents(salary));
    }

    /// Property: net pay is salary less contributions and tax
    #[test]
    fn prop_payroll_net_pay(
        salary in 0u64..10_000_000u64,
        additional in 0u64..500_000u64,
    ) {
        let salary = cents(salary);
        let payroll = calculate_payroll(
            salary,
            &SocialInsuranceRates::default(),
            None,
            cents(additional),
            TaxTables::statutory(),
        ).unwrap();

        prop_assert_eq!(
            payroll.salary_tax.after_tax,
            round2(salary - payroll.social_insurance.total - payroll.salary_tax.tax)
        );
    }

    /// Property: amounts beyond the supported limit are calculation errors, never panics
    #[test]
    fn prop_amounts_beyond_limit_are_rejected(
        excess in 1u64..u64::MAX,
        negative in any::<bool>(),
        near_max in any::<bool>(),
    ) {
        let tables = TaxTables::statutory();
        let amount = if near_max {
            Decimal::MAX - Decimal::from(excess)
        } else {
            MAX_AMOUNT + cents(excess)
        };
        let amount = if negative { -amount } else { amount };
        let is_rejected = |error: EngineError| matches!(error, EngineError::CalculationError { .. });

        let individual =
            calculate_individual_tax(amount, &Deductions::default(), TaxPeriod::Annual, tables);
        prop_assert!(individual.map_err(is_rejected).err().unwrap_or(false));

        let bonus = calculate_bonus_tax(amount, BonusMethod::Combined, MAX_AMOUNT, tables);
        prop_assert!(bonus.map_err(is_rejected).err().unwrap_or(false));

        let vat = calculate_vat(amount, dec!(0.13), negative, Decimal::ZERO);
        prop_assert!(vat.map_err(is_rejected).err().unwrap_or(false));

        let corporate = calculate_corporate_tax(
            amount,
            Decimal::ZERO,
            &Adjustments::default(),
            CompanyType::Small,
            tables,
        );
        prop_assert!(corporate.map_err(is_rejected).err().unwrap_or(false));

        let mortgage = calculate_mortgage(amount, dec!(1), 600, RepaymentMethod::EqualPrincipal);
        prop_assert!(mortgage.map_err(is_rejected).err().unwrap_or(false));

        let payroll = calculate_payroll(
            amount,
            &SocialInsuranceRates::default(),
            None,
            Decimal::ZERO,
            tables,
        );
        prop_assert!(payroll.map_err(is_rejected).err().unwrap_or(false));
    }
}
