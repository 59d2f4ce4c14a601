//! Application state for the tax engine API.

use std::sync::Arc;

use crate::config::TaxTables;

/// Shared application state.
///
/// Holds the tax tables every handler calculates against.
#[derive(Debug, Clone)]
pub struct AppState {
    tables: Arc<TaxTables>,
}

impl AppState {
    /// Creates a new application state around the given tables.
    pub fn new(tables: TaxTables) -> Self {
        Self {
            tables: Arc::new(tables),
        }
    }

    /// Creates application state backed by the built-in statutory tables.
    pub fn statutory() -> Self {
        Self::new(TaxTables::statutory().clone())
    }

    /// Returns the tax tables.
    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }
}
