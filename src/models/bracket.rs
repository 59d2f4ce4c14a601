//! Progressive tax bracket model.
//!
//! A [`BracketTable`] is an ordered list of [`Bracket`]s covering `[0, +∞)`.
//! Tables are immutable once built and every construction path other than
//! the built-in statutory tables goes through [`BracketTable::new`], which
//! checks the structural invariants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single tier of a progressive tax table.
///
/// The tier covers amounts in `(lower_exclusive, upper_inclusive]`; the last
/// tier of a table has no upper bound.
///
/// # Example
///
/// ```
/// use tax_engine::models::Bracket;
/// use rust_decimal_macros::dec;
///
/// let bracket = Bracket {
///     lower_exclusive: dec!(36000),
///     upper_inclusive: Some(dec!(144000)),
///     rate: dec!(0.10),
///     quick_deduction: dec!(2520),
/// };
/// assert!(bracket.contains(dec!(40000)));
/// assert!(!bracket.contains(dec!(36000)));
/// assert_eq!(bracket.tax_on(dec!(40000)), dec!(1480));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// The amount above which this tier applies.
    pub lower_exclusive: Decimal,
    /// The highest amount covered by this tier, `None` for the top tier.
    #[serde(default)]
    pub upper_inclusive: Option<Decimal>,
    /// The marginal rate as a fraction (0.10 for 10%).
    pub rate: Decimal,
    /// The quick deduction subtracted from `amount * rate`.
    pub quick_deduction: Decimal,
}

impl Bracket {
    /// Returns true if `amount` falls inside this tier.
    pub fn contains(&self, amount: Decimal) -> bool {
        amount > self.lower_exclusive && self.upper_inclusive.is_none_or(|upper| amount <= upper)
    }

    /// Returns the unrounded quick-deduction tax `amount * rate - quick_deduction`.
    pub fn tax_on(&self, amount: Decimal) -> Decimal {
        amount * self.rate - self.quick_deduction
    }
}

/// An ordered, validated sequence of progressive tax brackets.
///
/// Serializes as a plain array of brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Builds a bracket table, checking its invariants.
    ///
    /// The table must:
    /// - contain at least one bracket
    /// - start at zero
    /// - be contiguous, each lower bound equal to the previous upper bound
    /// - leave only the last bracket unbounded
    /// - have strictly increasing rates
    /// - have quick deductions that keep `amount * rate - quick_deduction`
    ///   continuous at every boundary
    ///
    /// # Example
    ///
    /// ```
    /// use tax_engine::models::{Bracket, BracketTable};
    /// use rust_decimal_macros::dec;
    ///
    /// let table = BracketTable::new(vec![
    ///     Bracket {
    ///         lower_exclusive: dec!(0),
    ///         upper_inclusive: Some(dec!(3000)),
    ///         rate: dec!(0.03),
    ///         quick_deduction: dec!(0),
    ///     },
    ///     Bracket {
    ///         lower_exclusive: dec!(3000),
    ///         upper_inclusive: None,
    ///         rate: dec!(0.10),
    ///         quick_deduction: dec!(210),
    ///     },
    /// ])
    /// .unwrap();
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn new(brackets: Vec<Bracket>) -> EngineResult<Self> {
        let first = brackets.first().ok_or_else(|| invalid("table has no brackets"))?;
        if !first.lower_exclusive.is_zero() {
            return Err(invalid(format!(
                "first bracket must start at 0, found {}",
                first.lower_exclusive
            )));
        }

        for (index, pair) in brackets.windows(2).enumerate() {
            let (previous, next) = (&pair[0], &pair[1]);
            let boundary = previous.upper_inclusive.ok_or_else(|| {
                invalid(format!("bracket {} is unbounded but is not the last", index + 1))
            })?;

            if boundary <= previous.lower_exclusive {
                return Err(invalid(format!(
                    "bracket {} has upper bound {} not above its lower bound {}",
                    index + 1,
                    boundary,
                    previous.lower_exclusive
                )));
            }
            if next.lower_exclusive != boundary {
                return Err(invalid(format!(
                    "bracket {} starts at {} but the previous bracket ends at {}",
                    index + 2,
                    next.lower_exclusive,
                    boundary
                )));
            }
            if next.rate <= previous.rate {
                return Err(invalid(format!(
                    "rates must strictly increase: {} follows {}",
                    next.rate, previous.rate
                )));
            }
            if previous.tax_on(boundary) != next.tax_on(boundary) {
                return Err(invalid(format!(
                    "quick deduction {} is discontinuous at {}",
                    next.quick_deduction, boundary
                )));
            }
        }

        if let Some(upper) = brackets.last().and_then(|last| last.upper_inclusive) {
            return Err(invalid(format!(
                "last bracket must be unbounded, found upper bound {}",
                upper
            )));
        }

        Ok(Self { brackets })
    }

    /// Wraps brackets that are correct by construction.
    pub(crate) fn from_trusted(brackets: Vec<Bracket>) -> Self {
        debug_assert!(!brackets.is_empty());
        Self { brackets }
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Returns the number of brackets.
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Returns the lowest bracket.
    pub fn first(&self) -> &Bracket {
        &self.brackets[0]
    }

    /// Returns the top, unbounded bracket.
    pub fn last(&self) -> &Bracket {
        &self.brackets[self.brackets.len() - 1]
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidBracketTable {
        message: message.into(),
    }
}
