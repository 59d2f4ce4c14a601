//! Calculation step log.
//!
//! Every calculator records the quantities it computes, in order, as
//! [`CalculationStep`]s. The log is a plain value: it is built by consuming
//! and returning a [`StepLog`], handed back inside the result record, and
//! never consulted for control flow.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::round2;

/// The value shown for a calculation step.
///
/// Amounts are displayed with two decimals; text values carry preformatted
/// quantities such as rates (`"10%"`) or terms (`"360 months"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepValue {
    /// A monetary amount.
    Amount(Decimal),
    /// A preformatted, non-monetary value.
    Text(String),
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepValue::Amount(amount) => write!(f, "{:.2}", round2(*amount)),
            StepValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<Decimal> for StepValue {
    fn from(amount: Decimal) -> Self {
        StepValue::Amount(amount)
    }
}

impl From<String> for StepValue {
    fn from(text: String) -> Self {
        StepValue::Text(text)
    }
}

impl From<&str> for StepValue {
    fn from(text: &str) -> Self {
        StepValue::Text(text.to_string())
    }
}

/// A single entry of the calculation log.
///
/// # Example
///
/// ```
/// use tax_engine::models::{CalculationStep, StepValue};
/// use rust_decimal_macros::dec;
///
/// let step = CalculationStep {
///     label: "Tax payable".to_string(),
///     value: StepValue::Amount(dec!(1480.00)),
///     formula: "40000.00 × 10% - 2520.00".to_string(),
/// };
/// assert_eq!(step.value.to_string(), "1480.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationStep {
    /// What the step computed.
    pub label: String,
    /// The computed value.
    pub value: StepValue,
    /// How the value was derived, empty for inputs and lookups.
    #[serde(default)]
    pub formula: String,
}

/// An append-only, ordered log of calculation steps.
///
/// Serializes as a plain array of steps.
///
/// # Example
///
/// ```
/// use tax_engine::models::StepLog;
/// use rust_decimal_macros::dec;
///
/// let log = StepLog::new()
///     .record("Income", dec!(100000), "")
///     .record("Rate", "10%", "");
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.steps()[0].label, "Income");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepLog {
    steps: Vec<CalculationStep>,
}

impl StepLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step and returns the extended log.
    #[must_use]
    pub fn record(
        mut self,
        label: impl Into<String>,
        value: impl Into<StepValue>,
        formula: impl Into<String>,
    ) -> Self {
        self.steps.push(CalculationStep {
            label: label.into(),
            value: value.into(),
            formula: formula.into(),
        });
        self
    }

    /// Returns the steps in the order they were recorded.
    pub fn steps(&self) -> &[CalculationStep] {
        &self.steps
    }

    /// Returns the number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the first step with the given label.
    pub fn find(&self, label: &str) -> Option<&CalculationStep> {
        self.steps.iter().find(|step| step.label == label)
    }

    /// Consumes the log, returning its steps.
    pub fn into_steps(self) -> Vec<CalculationStep> {
        self.steps
    }
}
