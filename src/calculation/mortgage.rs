//! Mortgage amortization.
//!
//! Builds a month-by-month repayment schedule for the equal-payment and
//! equal-principal methods. Every period's interest is rounded to cents on
//! the remaining balance, and the final period absorbs whatever balance the
//! rounding leaves so the schedule always closes at zero.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{RepaymentMethod, StepLog, check_amount, check_rate};

use super::rounding::{money, percent_fixed, round2};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest term a schedule is built for: one hundred years.
pub const MAX_TERM_MONTHS: u32 = 1200;

/// One month of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    /// 1-based period number.
    pub index: u32,
    /// Total paid this period.
    pub payment: Decimal,
    /// Portion of the payment that repays principal.
    pub principal_portion: Decimal,
    /// Portion of the payment that is interest.
    pub interest_portion: Decimal,
    /// Principal outstanding after this period.
    pub remaining_balance: Decimal,
}

/// The result of a mortgage calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageResult {
    /// Loan principal.
    pub principal: Decimal,
    /// Nominal annual interest rate.
    pub annual_rate: Decimal,
    /// Annual rate divided by twelve.
    pub monthly_rate: Decimal,
    /// Loan term in months.
    pub months: u32,
    /// Repayment method.
    pub method: RepaymentMethod,
    /// The fixed payment for equal-payment loans, or the first month's
    /// payment for equal-principal loans.
    pub monthly_payment: Decimal,
    /// Sum of all scheduled payments.
    pub total_payment: Decimal,
    /// Sum of all interest portions.
    pub total_interest: Decimal,
    /// One entry per month.
    pub schedule: Vec<SchedulePeriod>,
    /// The ordered calculation log.
    pub steps: StepLog,
}

/// Calculates a mortgage repayment schedule.
///
/// # Equal payment
///
/// The fixed payment is `P × r × (1+r)^n / ((1+r)^n - 1)` rounded to cents,
/// where `r` is the monthly rate. A zero rate gives `P / n`.
///
/// # Equal principal
///
/// Each period repays `round2(P / n)` of principal plus interest on the
/// remaining balance, so payments fall by roughly `round2(P / n × r)` a
/// month.
///
/// # Errors
///
/// - `InvalidInput` when `months` is zero or above [`MAX_TERM_MONTHS`]
/// - `CalculationError` when the principal exceeds
///   [`MAX_AMOUNT`](crate::models::MAX_AMOUNT) or the rate exceeds
///   [`MAX_RATE`](crate::models::MAX_RATE) in magnitude, or when the
///   compounding factor or a running balance overflows
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::calculate_mortgage;
/// use tax_engine::models::RepaymentMethod;
///
/// let result =
///     calculate_mortgage(dec!(1000000), dec!(0.05), 360, RepaymentMethod::EqualPayment)
///         .unwrap();
///
/// assert_eq!(result.monthly_payment, dec!(5368.22));
/// assert_eq!(result.schedule.len(), 360);
/// assert_eq!(result.schedule[359].remaining_balance, dec!(0));
/// ```
pub fn calculate_mortgage(
    principal: Decimal,
    annual_rate: Decimal,
    months: u32,
    method: RepaymentMethod,
) -> EngineResult<MortgageResult> {
    if months == 0 {
        return Err(EngineError::InvalidInput {
            field: "months".to_string(),
            message: "loan term must be at least one month".to_string(),
        });
    }
    if months > MAX_TERM_MONTHS {
        return Err(EngineError::InvalidInput {
            field: "months".to_string(),
            message: format!("loan term of {} months exceeds {} months", months, MAX_TERM_MONTHS),
        });
    }
    let principal = check_amount("principal", principal)?;
    let annual_rate = check_rate("annual rate", annual_rate)?;

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;

    let steps = StepLog::new()
        .record("Loan principal", round2(principal), "")
        .record("Annual rate", percent_fixed(annual_rate, 2), "")
        .record("Monthly rate", percent_fixed(monthly_rate, 4), "")
        .record("Term", format!("{} months", months), "");

    let result = match method {
        RepaymentMethod::EqualPayment => {
            equal_payment(principal, annual_rate, monthly_rate, months, steps)?
        }
        RepaymentMethod::EqualPrincipal => {
            equal_principal(principal, annual_rate, monthly_rate, months, steps)?
        }
    };

    debug!(
        %principal,
        %annual_rate,
        months,
        ?method,
        monthly_payment = %result.monthly_payment,
        total_interest = %result.total_interest,
        "Built repayment schedule"
    );

    Ok(result)
}

/// Computes the fixed equal-payment instalment.
fn level_payment(principal: Decimal, monthly_rate: Decimal, months: u32) -> EngineResult<Decimal> {
    if monthly_rate.is_zero() {
        return Ok(round2(principal / Decimal::from(months)));
    }

    let overflow = || EngineError::CalculationError {
        message: format!(
            "compounding {} over {} months is out of range",
            monthly_rate, months
        ),
    };

    let factor = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(months))
        .ok_or_else(overflow)?;
    let payment = principal
        .checked_mul(monthly_rate)
        .and_then(|p| p.checked_mul(factor))
        .and_then(|p| p.checked_div(factor - Decimal::ONE))
        .ok_or_else(overflow)?;

    Ok(round2(payment))
}

fn equal_payment(
    principal: Decimal,
    annual_rate: Decimal,
    monthly_rate: Decimal,
    months: u32,
    steps: StepLog,
) -> EngineResult<MortgageResult> {
    let monthly_payment = level_payment(principal, monthly_rate, months)?;

    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = principal;
    let mut total_payment = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for index in 1..=months {
        let interest = round2(checked(balance.checked_mul(monthly_rate), "interest")?);
        let scheduled = checked(monthly_payment.checked_sub(interest), "principal portion")?;
        let principal_portion = if index == months || scheduled > balance {
            balance
        } else {
            scheduled
        };
        let payment = checked(principal_portion.checked_add(interest), "payment")?;
        balance = round2(checked(balance.checked_sub(principal_portion), "balance")?);

        total_payment = checked(total_payment.checked_add(payment), "total payment")?;
        total_interest = checked(total_interest.checked_add(interest), "total interest")?;
        schedule.push(SchedulePeriod {
            index,
            payment,
            principal_portion,
            interest_portion: interest,
            remaining_balance: balance.max(Decimal::ZERO),
        });
    }

    let total_payment = round2(total_payment);
    let total_interest = round2(total_interest);

    let steps = steps
        .record("Repayment method", "Equal payment", "")
        .record(
            "Monthly payment",
            monthly_payment,
            "principal × r × (1 + r)^n ÷ ((1 + r)^n - 1)",
        )
        .record("Total payment", total_payment, "sum of scheduled payments")
        .record(
            "Total interest",
            total_interest,
            format!("{} - {}", money(total_payment), money(principal)),
        );

    Ok(MortgageResult {
        principal: round2(principal),
        annual_rate,
        monthly_rate,
        months,
        method: RepaymentMethod::EqualPayment,
        monthly_payment,
        total_payment,
        total_interest,
        schedule,
        steps,
    })
}

fn equal_principal(
    principal: Decimal,
    annual_rate: Decimal,
    monthly_rate: Decimal,
    months: u32,
    steps: StepLog,
) -> EngineResult<MortgageResult> {
    let principal_per_month = round2(principal / Decimal::from(months));
    let monthly_decrease = round2(principal_per_month * monthly_rate);

    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;

    for index in 1..=months {
        let interest = round2(checked(balance.checked_mul(monthly_rate), "interest")?);
        let principal_portion = if index == months {
            balance
        } else {
            principal_per_month.min(balance.max(Decimal::ZERO))
        };
        let payment = checked(principal_portion.checked_add(interest), "payment")?;
        balance = round2(checked(balance.checked_sub(principal_portion), "balance")?);

        total_interest = checked(total_interest.checked_add(interest), "total interest")?;
        schedule.push(SchedulePeriod {
            index,
            payment,
            principal_portion,
            interest_portion: interest,
            remaining_balance: balance.max(Decimal::ZERO),
        });
    }

    let total_interest = round2(total_interest);
    let total_payment = round2(checked(principal.checked_add(total_interest), "total payment")?);
    let first_payment = schedule
        .first()
        .map(|period| period.payment)
        .unwrap_or_default();

    let steps = steps
        .record("Repayment method", "Equal principal", "")
        .record(
            "First month payment",
            first_payment,
            format!(
                "{} + {} × {}",
                money(principal_per_month),
                money(principal),
                percent_fixed(monthly_rate, 4)
            ),
        )
        .record(
            "Monthly decrease",
            monthly_decrease,
            format!(
                "{} × {}",
                money(principal_per_month),
                percent_fixed(monthly_rate, 4)
            ),
        )
        .record(
            "Total payment",
            total_payment,
            format!("{} + {}", money(principal), money(total_interest)),
        )
        .record("Total interest", total_interest, "sum of interest portions");

    Ok(MortgageResult {
        principal: round2(principal),
        annual_rate,
        monthly_rate,
        months,
        method: RepaymentMethod::EqualPrincipal,
        monthly_payment: first_payment,
        total_payment,
        total_interest,
        schedule,
        steps,
    })
}

/// Maps an overflowed schedule quantity to a calculation error.
fn checked(value: Option<Decimal>, quantity: &str) -> EngineResult<Decimal> {
    value.ok_or_else(|| EngineError::CalculationError {
        message: format!("{} overflowed while building the schedule", quantity),
    })
}
