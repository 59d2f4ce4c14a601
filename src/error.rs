//! Error types for the tax calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the conditions that can occur while loading tax tables or running a
//! calculation on degenerate input.

use thiserror::Error;

/// The main error type for the tax calculation engine.
///
/// Most calculators cannot fail and return their result directly; the ones
/// that divide by a caller-supplied quantity (VAT, mortgage) and the
/// configuration loader return this error type.
///
/// # Example
///
/// ```
/// use tax_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/individual.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/individual.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A bracket table violates one of its structural invariants.
    #[error("Invalid bracket table: {message}")]
    InvalidBracketTable {
        /// A description of the violated invariant.
        message: String,
    },

    /// A calculator input is outside the range the calculation can handle.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
