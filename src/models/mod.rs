//! Core data models for the Shift Rostering Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod problem;
mod request;
mod rules;
mod schedule;
mod shift_type;

pub use employee::Employee;
pub use problem::SchedulingProblem;
pub use request::{FixedAssignment, ShiftRequest};
pub use rules::{
    CoverageCalendar, FairnessPolicy, RunLengthRule, TransitionPenalty, WeeklySumRule,
};
pub use schedule::{
    CoverageGap, Diagnostics, RuleKind, Schedule, SolveStatus, SolvedRoster, Violation,
};
pub use shift_type::{OFF_SHIFT, ShiftSet};
