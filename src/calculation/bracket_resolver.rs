//! Progressive bracket resolution.

use rust_decimal::Decimal;

use crate::models::{Bracket, BracketTable};

/// Finds the bracket that applies to a taxable amount.
///
/// Scans the table in order and returns the first bracket with
/// `lower_exclusive < amount <= upper_inclusive`. Non-positive amounts are
/// clamped at this boundary and resolve to the lowest bracket. An amount no
/// bracket covers falls back to the top bracket; a table built through
/// [`BracketTable::new`] covers every positive amount, so that fallback is
/// unreachable for validated tables.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculation::resolve_bracket;
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::TaxPeriod;
///
/// let table = TaxTables::statutory().brackets(TaxPeriod::Annual);
///
/// let bracket = resolve_bracket(dec!(40000), table);
/// assert_eq!(bracket.rate, dec!(0.10));
/// assert_eq!(bracket.quick_deduction, dec!(2520));
///
/// // Boundaries belong to the lower bracket
/// assert_eq!(resolve_bracket(dec!(36000), table).rate, dec!(0.03));
///
/// // Non-positive amounts resolve to the lowest bracket
/// assert_eq!(resolve_bracket(dec!(-500), table).rate, dec!(0.03));
/// ```
pub fn resolve_bracket(taxable_amount: Decimal, table: &BracketTable) -> &Bracket {
    if taxable_amount <= Decimal::ZERO {
        return table.first();
    }

    table
        .brackets()
        .iter()
        .find(|bracket| bracket.contains(taxable_amount))
        .unwrap_or_else(|| table.last())
}
