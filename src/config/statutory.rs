//! Built-in statutory tax tables.
//!
//! These constants reproduce the published individual income tax brackets,
//! VAT rates, corporate income tax rates and employee social insurance
//! rates. `config/cn-2024/` carries the same values as YAML.

use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{Bracket, BracketTable};

use super::types::{
    CorporateRates, IndividualTaxTables, Jurisdiction, SocialInsuranceDefaults, TaxTables,
    VatRates,
};

/// Monthly basic deduction.
pub const MONTHLY_BASIC_DEDUCTION: Decimal = dec!(5000);

/// Annual basic deduction.
pub const ANNUAL_BASIC_DEDUCTION: Decimal = dec!(60000);

/// Annual individual income tax brackets for consolidated income.
pub const ANNUAL_BRACKETS: [Bracket; 7] = [
    tier(dec!(0), Some(dec!(36000)), dec!(0.03), dec!(0)),
    tier(dec!(36000), Some(dec!(144000)), dec!(0.10), dec!(2520)),
    tier(dec!(144000), Some(dec!(300000)), dec!(0.20), dec!(16920)),
    tier(dec!(300000), Some(dec!(420000)), dec!(0.25), dec!(31920)),
    tier(dec!(420000), Some(dec!(660000)), dec!(0.30), dec!(52920)),
    tier(dec!(660000), Some(dec!(960000)), dec!(0.35), dec!(85920)),
    tier(dec!(960000), None, dec!(0.45), dec!(181920)),
];

/// Monthly individual income tax brackets for salary withholding.
pub const MONTHLY_BRACKETS: [Bracket; 7] = [
    tier(dec!(0), Some(dec!(3000)), dec!(0.03), dec!(0)),
    tier(dec!(3000), Some(dec!(12000)), dec!(0.10), dec!(210)),
    tier(dec!(12000), Some(dec!(25000)), dec!(0.20), dec!(1410)),
    tier(dec!(25000), Some(dec!(35000)), dec!(0.25), dec!(2660)),
    tier(dec!(35000), Some(dec!(55000)), dec!(0.30), dec!(4410)),
    tier(dec!(55000), Some(dec!(80000)), dec!(0.35), dec!(7160)),
    tier(dec!(80000), None, dec!(0.45), dec!(15160)),
];

const fn tier(
    lower_exclusive: Decimal,
    upper_inclusive: Option<Decimal>,
    rate: Decimal,
    quick_deduction: Decimal,
) -> Bracket {
    Bracket {
        lower_exclusive,
        upper_inclusive,
        rate,
        quick_deduction,
    }
}

static STATUTORY: LazyLock<TaxTables> = LazyLock::new(|| {
    TaxTables::new(
        Jurisdiction {
            code: "CN-2024".to_string(),
            name: "PRC individual, value-added and corporate income tax".to_string(),
            version: "2024".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            source_url: "https://www.chinatax.gov.cn/".to_string(),
        },
        IndividualTaxTables {
            annual_basic_deduction: ANNUAL_BASIC_DEDUCTION,
            monthly_basic_deduction: MONTHLY_BASIC_DEDUCTION,
            annual_brackets: BracketTable::from_trusted(ANNUAL_BRACKETS.to_vec()),
            monthly_brackets: BracketTable::from_trusted(MONTHLY_BRACKETS.to_vec()),
        },
        VatRates {
            standard: dec!(0.13),
            reduced: dec!(0.09),
            services: dec!(0.06),
            small_scale: dec!(0.03),
            small_scale_reduced: dec!(0.01),
        },
        CorporateRates {
            normal: dec!(0.25),
            high_tech: dec!(0.15),
            small_tier_1_rate: dec!(0.025),
            small_tier_2_rate: dec!(0.05),
            small_tier_1_ceiling: dec!(1000000),
            small_ceiling: dec!(3000000),
        },
        SocialInsuranceDefaults {
            pension: dec!(0.08),
            medical: dec!(0.02),
            unemployment: dec!(0.005),
            housing_fund: dec!(0.12),
        },
    )
});

impl TaxTables {
    /// Returns the built-in statutory tables.
    ///
    /// The instance is created once and shared for the process lifetime.
    pub fn statutory() -> &'static TaxTables {
        &STATUTORY
    }
}
