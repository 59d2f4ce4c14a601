//! Input option records and selector enums for the calculators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether an individual income tax calculation is annual or monthly.
///
/// Selects both the bracket table and the default basic deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxPeriod {
    /// Annual consolidated income.
    Annual,
    /// Monthly salary withholding.
    Monthly,
}

impl TaxPeriod {
    /// Returns true for [`TaxPeriod::Annual`].
    pub fn is_annual(self) -> bool {
        self == TaxPeriod::Annual
    }
}

/// Deductions applied before individual income tax.
///
/// `basic` falls back to the statutory basic deduction for the period when
/// `None`; an explicit `Some(0)` means no basic deduction. The other
/// components default to zero.
///
/// # Example
///
/// ```
/// use tax_engine::models::Deductions;
/// use rust_decimal_macros::dec;
///
/// let deductions: Deductions = serde_json::from_str(r#"{"special": "1500"}"#).unwrap();
/// assert_eq!(deductions.basic, None);
/// assert_eq!(deductions.special, dec!(1500));
/// assert_eq!(deductions.additional, dec!(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    /// Basic (threshold) deduction.
    pub basic: Option<Decimal>,
    /// Special deduction: the employee's social insurance and housing fund.
    pub special: Decimal,
    /// Special additional deductions (children, housing loan interest, ...).
    pub additional: Decimal,
    /// Any other deductible amount.
    pub other: Decimal,
}

impl Deductions {
    /// Deductions consisting of an explicit basic deduction only.
    pub fn basic_only(basic: Decimal) -> Self {
        Self {
            basic: Some(basic),
            ..Self::default()
        }
    }
}

/// How a year-end bonus is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusMethod {
    /// Taxed on its own using the monthly table on bonus / 12.
    Separate,
    /// Added to annual consolidated income and taxed with it.
    Combined,
}

/// The statutory VAT rate categories.
///
/// The fraction each category maps to lives in the tax tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatRate {
    /// General taxpayer standard rate (13%).
    Standard,
    /// Reduced rate for transport, construction, agriculture (9%).
    Reduced,
    /// Modern services rate (6%).
    Services,
    /// Small-scale taxpayer levy rate (3%).
    SmallScale,
    /// Small-scale taxpayer preferential rate (1%).
    SmallScaleReduced,
}

/// Tax adjustments from accounting profit to taxable income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Amounts added back to profit.
    pub increase: Decimal,
    /// Amounts deducted from profit.
    pub decrease: Decimal,
}

impl Adjustments {
    /// Returns true if either adjustment is non-zero.
    pub fn is_adjusted(&self) -> bool {
        !self.increase.is_zero() || !self.decrease.is_zero()
    }
}

/// The corporate income tax policy a company falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    /// Standard 25% rate.
    Normal,
    /// Small low-profit enterprise with tiered relief.
    Small,
    /// Qualified high and new technology enterprise.
    Hightech,
}

/// Mortgage repayment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepaymentMethod {
    /// Fixed payment each period (French amortization).
    EqualPayment,
    /// Fixed principal portion each period, declining payments.
    EqualPrincipal,
}

/// Employee contribution rates for social insurance and housing fund.
///
/// Any rate left as `None` uses the default from the tax tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialInsuranceRates {
    /// Pension insurance rate.
    pub pension: Option<Decimal>,
    /// Medical insurance rate.
    pub medical: Option<Decimal>,
    /// Unemployment insurance rate.
    pub unemployment: Option<Decimal>,
    /// Housing provident fund rate.
    pub housing_fund: Option<Decimal>,
}
