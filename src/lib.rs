//! Tax and Finance Calculation Engine
//!
//! This crate provides pure calculators for individual income tax, year-end
//! bonus tax, value-added tax, corporate income tax, mortgage amortization and
//! payroll net pay. Every calculator returns a plain result record together
//! with an ordered log of the intermediate quantities it computed.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
