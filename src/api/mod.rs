//! HTTP API module for the Shift Rostering Engine.
//!
//! This module provides the REST API endpoint for solving a scheduling
//! problem.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BandRuleEntry, CoverageRequest, DemandEntry, EmployeeRequest, ExcessEntry,
    FairnessEntry, FixedAssignmentEntry, HorizonRequest, OptionsRequest, ShiftRequestEntry,
    SolveRequest, TransitionEntry,
};
pub use response::{ApiError, DayAssignment, SolveResponse};
pub use state::AppState;
