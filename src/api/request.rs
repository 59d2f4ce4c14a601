//! Request types for the tax engine API.
//!
//! Each endpoint accepts its own JSON body. Deserialization only checks
//! shape; [`Validate`] then rejects values the calculators would accept but
//! that make no sense as user input, such as negative amounts, amounts above
//! [`MAX_AMOUNT`] or rates above 100%.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Adjustments, BonusMethod, CompanyType, Deductions, MAX_AMOUNT, RepaymentMethod,
    SocialInsuranceRates, TaxPeriod, VatRate,
};

use super::response::ApiError;

/// Longest accepted mortgage term: fifty years.
pub const MAX_MORTGAGE_MONTHS: u32 = 600;

/// Boundary validation for request bodies.
pub trait Validate {
    /// Returns a `VALIDATION_ERROR` describing the first invalid field.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Request body for `POST /individual-tax`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualTaxRequest {
    /// Gross income for the period.
    pub income: Decimal,
    /// Deductions; all default to zero, and the basic deduction to the
    /// statutory amount for the period.
    #[serde(default)]
    pub deductions: Deductions,
    /// Annual or monthly calculation.
    #[serde(default = "default_period")]
    pub period: TaxPeriod,
}

fn default_period() -> TaxPeriod {
    TaxPeriod::Annual
}

/// Request body for `POST /bonus-tax`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusTaxRequest {
    /// The bonus amount.
    pub bonus: Decimal,
    /// Separate or combined taxation.
    #[serde(default = "default_bonus_method")]
    pub method: BonusMethod,
    /// Annual consolidated income excluding the bonus.
    #[serde(default)]
    pub annual_income: Decimal,
}

fn default_bonus_method() -> BonusMethod {
    BonusMethod::Separate
}

/// Request body for `POST /bonus-tax/compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusComparisonRequest {
    /// The bonus amount.
    pub bonus: Decimal,
    /// Annual consolidated income excluding the bonus.
    #[serde(default)]
    pub annual_income: Decimal,
}

/// Request body for `POST /vat`.
///
/// The rate is given either as an explicit fraction or as a statutory
/// category; an explicit rate wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VatRequest {
    /// The amount, gross or net according to `includes_tax`.
    pub amount: Decimal,
    /// Explicit rate as a fraction.
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Statutory rate category.
    #[serde(default)]
    pub category: Option<VatRate>,
    /// Whether `amount` includes VAT.
    #[serde(default)]
    pub includes_tax: bool,
    /// Creditable input tax.
    #[serde(default)]
    pub input_tax: Decimal,
}

/// Request body for `POST /corporate-tax`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorporateTaxRequest {
    /// Operating revenue.
    pub revenue: Decimal,
    /// Operating costs.
    pub costs: Decimal,
    /// Tax adjustments to profit.
    #[serde(default)]
    pub adjustments: Adjustments,
    /// The company's tax policy.
    #[serde(default = "default_company_type")]
    pub company_type: CompanyType,
}

fn default_company_type() -> CompanyType {
    CompanyType::Normal
}

/// Request body for `POST /mortgage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageRequest {
    /// Loan principal.
    pub principal: Decimal,
    /// Nominal annual interest rate as a fraction.
    pub annual_rate: Decimal,
    /// Loan term in months.
    pub months: u32,
    /// Repayment method.
    #[serde(default = "default_repayment_method")]
    pub method: RepaymentMethod,
}

fn default_repayment_method() -> RepaymentMethod {
    RepaymentMethod::EqualPayment
}

/// Request body for `POST /social-insurance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialInsuranceRequest {
    /// Gross monthly salary.
    pub salary: Decimal,
    /// Contribution rates; unset rates use the statutory defaults.
    #[serde(default)]
    pub rates: SocialInsuranceRates,
    /// Upper limit of the contribution base; zero means no limit.
    #[serde(default)]
    pub base_limit: Option<Decimal>,
}

/// Request body for `POST /salary-tax`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryTaxRequest {
    /// Gross monthly salary.
    pub salary: Decimal,
    /// Contribution rates; unset rates use the statutory defaults.
    #[serde(default)]
    pub rates: SocialInsuranceRates,
    /// Upper limit of the contribution base; zero means no limit.
    #[serde(default)]
    pub base_limit: Option<Decimal>,
    /// Special additional deductions.
    #[serde(default)]
    pub additional_deduction: Decimal,
}

/// Accepts a monetary amount in `[0, MAX_AMOUNT]`.
fn non_negative(field: &str, value: Decimal) -> Result<(), ApiError> {
    if value < Decimal::ZERO {
        return Err(ApiError::with_details(
            "VALIDATION_ERROR",
            format!("{} must not be negative", field),
            format!("received {}", value),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(ApiError::with_details(
            "VALIDATION_ERROR",
            format!("{} must not exceed {}", field, MAX_AMOUNT),
            format!("received {}", value),
        ));
    }
    Ok(())
}

fn fraction(field: &str, value: Decimal) -> Result<(), ApiError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ApiError::with_details(
            "VALIDATION_ERROR",
            format!("{} must be between 0 and 1", field),
            format!("received {}", value),
        ));
    }
    Ok(())
}

fn contribution_rates(rates: &SocialInsuranceRates) -> Result<(), ApiError> {
    for (field, rate) in [
        ("rates.pension", rates.pension),
        ("rates.medical", rates.medical),
        ("rates.unemployment", rates.unemployment),
        ("rates.housing_fund", rates.housing_fund),
    ] {
        if let Some(rate) = rate {
            fraction(field, rate)?;
        }
    }
    Ok(())
}

impl Validate for IndividualTaxRequest {
    fn validate(&self) -> Result<(), ApiError> {
        non_negative("income", self.income)?;
        if let Some(basic) = self.deductions.basic {
            non_negative("deductions.basic", basic)?;
        }
        non_negative("deductions.special", self.deductions.special)?;
        non_negative("deductions.additional", self.deductions.additional)?;
        non_negative("deductions.other", self.deductions.other)
    }
}

impl Validate for BonusTaxRequest {
    fn validate(&self) -> Result<(), ApiError> {
        non_negative("bonus", self.bonus)?;
        non_negative("annual_income", self.annual_income)
    }
}

impl Validate for BonusComparisonRequest {
    fn validate(&self) -> Result<(), ApiError> {
        non_negative("bonus", self.bonus)?;
        non_negative("annual_income", self.annual_income)
    }
}

impl Validate for VatRequest {
    fn validate(&self) -> Result<(), ApiError> {
        non_negative("amount", self.amount)?;
        non_negative("input_tax", self.input_tax)?;
        match (self.rate, self.category) {
            (Some(rate), _) => fraction("rate", rate),
            (None, Some(_)) => Ok(()),
            (None, None) => Err(ApiError::validation_error(
                "either rate or category must be provided",
            )),
        }
    }
}

impl Validate for CorporateTaxRequest {
    fn validate(&self) -> Result<(), ApiError> {
        non_negative("revenue", self.revenue)?;
        non_negative("costs", self.costs)?;
        non_negative("adjustments.increase", self.adjustments.increase)?;
        non_negative("adjustments.decrease", self.adjustments.decrease)
    }
}

impl Validate for MortgageRequest {
    fn validate(&self) -> Result<(), ApiError> {
        non_negative("principal", self.principal)?;
        fraction("annual_rate", self.annual_rate)?;
        if self.months == 0 || self.months > MAX_MORTGAGE_MONTHS {
            return Err(ApiError::with_details(
                "VALIDATION_ERROR",
                format!("months must be between 1 and {}", MAX_MORTGAGE_MONTHS),
                format!("received {}", self.months),
            ));
        }
        Ok(())
    }
}

impl Validate for SocialInsuranceRequest {
    fn validate(&self) -> Result<(), ApiError> {
        non_negative("salary", self.salary)?;
        if let Some(limit) = self.base_limit {
            non_negative("base_limit", limit)?;
        }
        contribution_rates(&self.rates)
    }
}

impl Validate for SalaryTaxRequest {
    fn validate(&self) -> Result<(), ApiError> {
        non_negative("salary", self.salary)?;
        non_negative("additional_deduction", self.additional_deduction)?;
        if let Some(limit) = self.base_limit {
            non_negative("base_limit", limit)?;
        }
        contribution_rates(&self.rates)
    }
}
