//! HTTP API for the tax engine.
//!
//! Exposes each calculator as a JSON endpoint over axum.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BonusComparisonRequest, BonusTaxRequest, CorporateTaxRequest, IndividualTaxRequest,
    MAX_MORTGAGE_MONTHS, MortgageRequest, SalaryTaxRequest, SocialInsuranceRequest, Validate,
    VatRequest,
};
pub use response::{ApiError, ApiErrorResponse, CalculationEnvelope};
pub use state::AppState;
