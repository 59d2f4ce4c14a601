//! Calculation logic for the tax engine.
//!
//! This module contains the pure calculators: individual income tax, year-end
//! bonus tax, VAT, corporate income tax, mortgage amortization, and social
//! insurance with monthly salary tax. Each takes plain values plus the tax
//! tables it needs and returns a result record carrying its own step log.

mod bonus_tax;
mod bracket_resolver;
mod corporate_tax;
mod individual_tax;
mod mortgage;
mod payroll;
mod rounding;
mod vat;

pub use bonus_tax::{BonusComparison, BonusTaxResult, calculate_bonus_tax, compare_bonus_methods};
pub use bracket_resolver::resolve_bracket;
pub use corporate_tax::{CorporateTaxResult, calculate_corporate_tax};
pub use individual_tax::{IndividualTaxResult, calculate_individual_tax};
pub use mortgage::{MortgageResult, SchedulePeriod, calculate_mortgage};
pub use payroll::{
    PayrollResult, SalaryTaxResult, SocialInsuranceResult, calculate_payroll,
    calculate_salary_tax, calculate_social_insurance,
};
pub use rounding::{round_rate, round2};
pub use vat::{VatResult, calculate_vat, calculate_vat_for_category};
