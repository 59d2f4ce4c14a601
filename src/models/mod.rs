//! Core data models for the tax calculation engine.
//!
//! This module contains the value types shared by every calculator: bracket
//! tables, the calculation step log, the rounding policy, and the option records callers use to
//! describe deductions, adjustments and contribution rates.

mod bracket;
mod inputs;
mod money;
mod step;

pub use bracket::{Bracket, BracketTable};
pub use inputs::{
    Adjustments, BonusMethod, CompanyType, Deductions, RepaymentMethod, SocialInsuranceRates,
    TaxPeriod, VatRate,
};
pub(crate) use money::{check_amount, check_rate};
pub use money::{MAX_AMOUNT, MAX_RATE, round_rate, round2};
pub use step::{CalculationStep, StepLog, StepValue};
