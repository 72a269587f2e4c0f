//! Response types for the Shift Rostering Engine API.
//!
//! This module defines the solve response together with the error response
//! structures and error handling for the HTTP API.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{Diagnostics, SchedulingProblem, SolvedRoster};

/// One dated, labeled assignment in a solve response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAssignment {
    /// The calendar date of the assignment.
    pub date: NaiveDate,
    /// The assigned shift-type label.
    pub shift: String,
}

/// Response body of a successful `/solve` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    /// Correlation id of the solve run.
    pub run_id: Uuid,
    /// Employee id to the dated assignment for every horizon day.
    pub schedule: BTreeMap<String, Vec<DayAssignment>>,
    /// The diagnostic report for this solve.
    pub diagnostics: Diagnostics,
}

impl SolveResponse {
    /// Maps a solved roster back onto labels and calendar dates.
    pub fn from_roster(
        run_id: Uuid,
        roster: SolvedRoster,
        problem: &SchedulingProblem,
        start_date: NaiveDate,
    ) -> Self {
        let schedule = roster
            .schedule
            .assignments
            .iter()
            .map(|(id, days)| {
                let dated = days
                    .iter()
                    .enumerate()
                    .map(|(day, &shift)| DayAssignment {
                        date: start_date + Duration::days(day as i64),
                        shift: problem.shift_types.label(shift).to_string(),
                    })
                    .collect();
                (id.clone(), dated)
            })
            .collect();
        Self {
            run_id,
            schedule,
            diagnostics: roster.diagnostics,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::InvalidProblem { .. } => (StatusCode::BAD_REQUEST, "INVALID_PROBLEM"),
            EngineError::EmployeeOutOfRange { .. }
            | EngineError::ShiftOutOfRange { .. }
            | EngineError::DayOutOfRange { .. } => {
                (StatusCode::BAD_REQUEST, "INDEX_OUT_OF_RANGE")
            }
            EngineError::ConflictingFixedAssignments { .. } => {
                (StatusCode::BAD_REQUEST, "CONFLICTING_FIXED_ASSIGNMENTS")
            }
            EngineError::NegativeDemand { .. } => (StatusCode::BAD_REQUEST, "NEGATIVE_DEMAND"),
            EngineError::InvalidRuleBounds { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_RULE_BOUNDS")
            }
            EngineError::OffShiftTransition { .. } => {
                (StatusCode::BAD_REQUEST, "OFF_SHIFT_TRANSITION")
            }
            EngineError::UnknownShift { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_SHIFT"),
            EngineError::UnknownEmployee { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_EMPLOYEE"),
            EngineError::DateOutOfRange { .. } => (StatusCode::BAD_REQUEST, "DATE_OUT_OF_RANGE"),
            EngineError::PriorAssignmentConflict { .. } => {
                (StatusCode::BAD_REQUEST, "PRIOR_ASSIGNMENT_CONFLICT")
            }
            EngineError::Infeasible { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INFEASIBLE")
            }
        };
        ApiErrorResponse {
            status,
            error: ApiError::new(code, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_infeasible_maps_to_unprocessable_entity() {
        let engine_error = EngineError::Infeasible {
            message: "no assignment satisfies the hard constraints".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "INFEASIBLE");
    }

    #[test]
    fn test_configuration_errors_map_to_bad_request() {
        let engine_error = EngineError::UnknownShift {
            label: "Twilight".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "UNKNOWN_SHIFT");
        assert!(api_error.error.message.contains("Twilight"));
    }

    #[test]
    fn test_config_file_errors_map_to_internal_error() {
        let engine_error = EngineError::ConfigNotFound {
            path: "/missing".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
