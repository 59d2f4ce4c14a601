//! Tax table configuration.
//!
//! This module provides [`TaxTables`], the immutable bracket and rate
//! configuration every calculator reads from, the built-in statutory
//! tables, and [`ConfigLoader`] for loading an equivalent table set from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use tax_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/cn-2024").unwrap();
//! println!("Loaded tables: {}", loader.jurisdiction().name);
//! ```

mod loader;
mod statutory;
mod types;

pub use loader::ConfigLoader;
pub use statutory::{
    ANNUAL_BASIC_DEDUCTION, ANNUAL_BRACKETS, MONTHLY_BASIC_DEDUCTION, MONTHLY_BRACKETS,
};
pub use types::{
    CorporateRates, IndividualTaxConfig, IndividualTaxTables, Jurisdiction,
    SocialInsuranceDefaults, TaxTables, VatRates,
};
