//! HTTP request handlers for the Shift Rostering Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::solver::solve_schedule;

use super::request::SolveRequest;
use super::response::{ApiError, ApiErrorResponse, SolveResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/solve", post(solve_handler))
        .with_state(state)
}

/// Handler for POST /solve endpoint.
///
/// Accepts a scheduling problem and returns the solved roster with its
/// diagnostics, or a structured error.
async fn solve_handler(
    State(state): State<AppState>,
    payload: Result<Json<SolveRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let run_id = Uuid::new_v4();
    info!(run_id = %run_id, "Processing solve request");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        run_id = %run_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    // Check if it's a missing field error
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        run_id = %run_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    // Convert request ids, labels, and dates into the core problem
    let (problem, prior) = match request.resolve() {
        Ok(resolved) => resolved,
        Err(err) => {
            warn!(run_id = %run_id, error = %err, "Request resolution failed");
            let api_error: ApiErrorResponse = err.into();
            return (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response();
        }
    };
    let options = request.solve_options(state.settings());
    let start_date = request.horizon.start_date;

    // The solve is a bounded blocking search; keep it off the async workers
    let solve_result = tokio::task::spawn_blocking(move || {
        solve_schedule(&problem, prior.as_ref(), &options).map(|roster| (roster, problem))
    })
    .await;

    match solve_result {
        Ok(Ok((roster, problem))) => {
            info!(
                run_id = %run_id,
                employees = problem.num_employees(),
                days = problem.num_days,
                objective = roster.diagnostics.objective,
                wall_time_ms = roster.diagnostics.wall_time_ms,
                "Solve completed successfully"
            );
            let response = SolveResponse::from_roster(run_id, roster, &problem, start_date);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            warn!(run_id = %run_id, error = %err, "Solve failed");
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
        Err(join_error) => {
            warn!(run_id = %run_id, error = %join_error, "Solve task panicked");
            let error = ApiError::new("INTERNAL_ERROR", "The solve task failed unexpectedly");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response()
        }
    }
}
