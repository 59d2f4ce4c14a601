//! HTTP request handlers for the tax engine API.
//!
//! Every calculator endpoint follows the same path: parse the JSON body,
//! validate it, run the calculator against the shared tables, and wrap the
//! result in a [`CalculationEnvelope`].

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_bonus_tax, calculate_corporate_tax, calculate_individual_tax, calculate_mortgage,
    calculate_payroll, calculate_social_insurance, calculate_vat, calculate_vat_for_category,
    compare_bonus_methods,
};
use crate::config::TaxTables;
use crate::error::{EngineError, EngineResult};

use super::request::{
    BonusComparisonRequest, BonusTaxRequest, CorporateTaxRequest, IndividualTaxRequest,
    MortgageRequest, SalaryTaxRequest, SocialInsuranceRequest, Validate, VatRequest,
};
use super::response::{ApiError, ApiErrorResponse, CalculationEnvelope};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tables", get(tables_handler))
        .route("/individual-tax", post(individual_tax_handler))
        .route("/bonus-tax", post(bonus_tax_handler))
        .route("/bonus-tax/compare", post(bonus_comparison_handler))
        .route("/vat", post(vat_handler))
        .route("/corporate-tax", post(corporate_tax_handler))
        .route("/mortgage", post(mortgage_handler))
        .route("/social-insurance", post(social_insurance_handler))
        .route("/salary-tax", post(salary_tax_handler))
        .with_state(state)
}

/// Handler for GET /tables: the tables the server calculates against.
async fn tables_handler(State(state): State<AppState>) -> Json<TaxTables> {
    Json(state.tables().clone())
}

async fn individual_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<IndividualTaxRequest>, JsonRejection>,
) -> Response {
    run(&state, "individual-tax", payload, |request, tables| {
        calculate_individual_tax(
            request.income,
            &request.deductions,
            request.period,
            tables,
        )
    })
}

async fn bonus_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<BonusTaxRequest>, JsonRejection>,
) -> Response {
    run(&state, "bonus-tax", payload, |request, tables| {
        calculate_bonus_tax(
            request.bonus,
            request.method,
            request.annual_income,
            tables,
        )
    })
}

async fn bonus_comparison_handler(
    State(state): State<AppState>,
    payload: Result<Json<BonusComparisonRequest>, JsonRejection>,
) -> Response {
    run(&state, "bonus-tax/compare", payload, |request, tables| {
        compare_bonus_methods(
            request.bonus,
            request.annual_income,
            tables,
        )
    })
}

async fn vat_handler(
    State(state): State<AppState>,
    payload: Result<Json<VatRequest>, JsonRejection>,
) -> Response {
    run(&state, "vat", payload, |request, tables| {
        match (request.rate, request.category) {
            (Some(rate), _) => calculate_vat(
                request.amount,
                rate,
                request.includes_tax,
                request.input_tax,
            ),
            (None, Some(category)) => calculate_vat_for_category(
                request.amount,
                category,
                request.includes_tax,
                request.input_tax,
                tables,
            ),
            (None, None) => Err(EngineError::InvalidInput {
                field: "rate".to_string(),
                message: "either rate or category must be provided".to_string(),
            }),
        }
    })
}

async fn corporate_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<CorporateTaxRequest>, JsonRejection>,
) -> Response {
    run(&state, "corporate-tax", payload, |request, tables| {
        calculate_corporate_tax(
            request.revenue,
            request.costs,
            &request.adjustments,
            request.company_type,
            tables,
        )
    })
}

async fn mortgage_handler(
    State(state): State<AppState>,
    payload: Result<Json<MortgageRequest>, JsonRejection>,
) -> Response {
    run(&state, "mortgage", payload, |request, _| {
        calculate_mortgage(
            request.principal,
            request.annual_rate,
            request.months,
            request.method,
        )
    })
}

async fn social_insurance_handler(
    State(state): State<AppState>,
    payload: Result<Json<SocialInsuranceRequest>, JsonRejection>,
) -> Response {
    run(&state, "social-insurance", payload, |request, tables| {
        calculate_social_insurance(
            request.salary,
            &request.rates,
            request.base_limit,
            tables,
        )
    })
}

async fn salary_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalaryTaxRequest>, JsonRejection>,
) -> Response {
    run(&state, "salary-tax", payload, |request, tables| {
        calculate_payroll(
            request.salary,
            &request.rates,
            request.base_limit,
            request.additional_deduction,
            tables,
        )
    })
}

/// Parses, validates and runs one calculation, logging under a fresh
/// correlation id.
fn run<Req, Res, F>(
    state: &AppState,
    route: &'static str,
    payload: Result<Json<Req>, JsonRejection>,
    calculate: F,
) -> Response
where
    Req: Validate,
    Res: Serialize,
    F: FnOnce(Req, &TaxTables) -> EngineResult<Res>,
{
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, route, "Processing calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return ApiErrorResponse::bad_request(rejection_error(rejection, correlation_id))
                .into_response();
        }
    };

    if let Err(error) = request.validate() {
        warn!(
            correlation_id = %correlation_id,
            route,
            error = %error.message,
            "Request validation failed"
        );
        return ApiErrorResponse::bad_request(error).into_response();
    }

    let tables = state.tables();
    let start_time = Instant::now();
    match calculate(request, tables) {
        Ok(result) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            info!(
                correlation_id = %correlation_id,
                route,
                duration_us,
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(CalculationEnvelope::new(
                    result,
                    tables.jurisdiction().code.as_str(),
                    duration_us,
                )),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                route,
                error = %err,
                "Calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Maps a JSON extraction failure to an API error.
fn rejection_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}
