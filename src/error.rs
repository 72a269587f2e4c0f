//! Error types for the Shift Rostering Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while validating a scheduling
//! problem, building the optimization model, and solving it.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Shift Rostering Engine.
///
/// Configuration errors are detected while the problem is validated and the
/// model is built; the solve step is never attempted on invalid input.
/// [`EngineError::Infeasible`] is the one runtime failure: the hard
/// constraints admit no schedule within the time budget.
///
/// # Example
///
/// ```
/// use roster_engine::error::EngineError;
///
/// let error = EngineError::NegativeDemand { weekday: 2, shift: 1, demand: -3 };
/// assert_eq!(
///     error.to_string(),
///     "Negative coverage demand -3 for weekday 2, shift 1"
/// );
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

    /// The problem is structurally unusable (empty horizon, no shift types).
    #[error("Invalid scheduling problem: {message}")]
    InvalidProblem {
        /// A description of what made the problem invalid.
        message: String,
    },

    /// An employee index fell outside the declared employee list.
    #[error("Employee index {employee} out of range ({num_employees} employees) in {context}")]
    EmployeeOutOfRange {
        /// The offending employee index.
        employee: usize,
        /// The number of declared employees.
        num_employees: usize,
        /// The record that carried the index.
        context: String,
    },

    /// A shift-type index fell outside the declared shift-type list.
    #[error("Shift index {shift} out of range ({num_shifts} shift types) in {context}")]
    ShiftOutOfRange {
        /// The offending shift-type index.
        shift: usize,
        /// The number of declared shift types.
        num_shifts: usize,
        /// The record that carried the index.
        context: String,
    },

    /// A day index fell outside the scheduling horizon.
    #[error("Day index {day} out of range ({num_days} days) in {context}")]
    DayOutOfRange {
        /// The offending day index.
        day: usize,
        /// The number of days in the horizon.
        num_days: usize,
        /// The record that carried the index.
        context: String,
    },

    /// Two fixed assignments name different shifts for the same employee/day.
    #[error(
        "Conflicting fixed assignments for employee {employee} on day {day}: \
         shift {first} vs shift {second}"
    )]
    ConflictingFixedAssignments {
        /// The employee with the conflicting fixes.
        employee: usize,
        /// The day both fixes refer to.
        day: usize,
        /// The shift index of the first fix encountered.
        first: usize,
        /// The shift index of the conflicting fix.
        second: usize,
    },

    /// A coverage-demand cell holds a negative headcount.
    #[error("Negative coverage demand {demand} for weekday {weekday}, shift {shift}")]
    NegativeDemand {
        /// Weekday row of the offending cell (0 = Monday).
        weekday: usize,
        /// Shift-type column of the offending cell.
        shift: usize,
        /// The negative demand value.
        demand: i64,
    },

    /// A rule's six-tuple bounds or costs are malformed.
    #[error("Invalid bounds in {rule}: {message}")]
    InvalidRuleBounds {
        /// The rule that carried the bounds (e.g. "run-length rule for shift 2").
        rule: String,
        /// A description of the violation.
        message: String,
    },

    /// A transition penalty references the off shift on either side.
    #[error(
        "Transition penalty may not reference the off shift \
         (from {from_shift} to {to_shift})"
    )]
    OffShiftTransition {
        /// The penalty's from-shift index.
        from_shift: usize,
        /// The penalty's to-shift index.
        to_shift: usize,
    },

    /// A request referenced a shift label that was not declared.
    #[error("Unknown shift label: {label}")]
    UnknownShift {
        /// The label that could not be resolved.
        label: String,
    },

    /// A request referenced an employee id that was not declared.
    #[error("Unknown employee id: {id}")]
    UnknownEmployee {
        /// The id that could not be resolved.
        id: String,
    },

    /// A dated record fell outside the scheduling window.
    #[error("Date {date} outside the scheduling window starting {start} ({num_days} days)")]
    DateOutOfRange {
        /// The offending date.
        date: NaiveDate,
        /// The first day of the window.
        start: NaiveDate,
        /// The number of days in the window.
        num_days: usize,
    },

    /// A pinned prior assignment is not eligible under the current requests.
    #[error(
        "Prior assignment for employee {employee} on day {day} (shift {shift}) \
         is not eligible under the current requests"
    )]
    PriorAssignmentConflict {
        /// The employee id from the prior schedule.
        employee: String,
        /// The day of the pinned assignment.
        day: usize,
        /// The shift index of the pinned assignment.
        shift: usize,
    },

    /// The hard constraints admit no schedule within the time budget.
    #[error("Scheduling infeasible: {message}")]
    Infeasible {
        /// Whether infeasibility was proven or the search was inconclusive.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/solver.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/solver.yaml"
        );
    }

    #[test]
    fn test_conflicting_fixed_assignments_displays_context() {
        let error = EngineError::ConflictingFixedAssignments {
            employee: 3,
            day: 5,
            first: 1,
            second: 2,
        };
        assert_eq!(
            error.to_string(),
            "Conflicting fixed assignments for employee 3 on day 5: shift 1 vs shift 2"
        );
    }

    #[test]
    fn test_shift_out_of_range_displays_context() {
        let error = EngineError::ShiftOutOfRange {
            shift: 4,
            num_shifts: 3,
            context: "transition penalty".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Shift index 4 out of range (3 shift types) in transition penalty"
        );
    }

    #[test]
    fn test_date_out_of_range_displays_window() {
        let error = EngineError::DateOutOfRange {
            date: NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
            start: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            num_days: 14,
        };
        assert_eq!(
            error.to_string(),
            "Date 2025-09-20 outside the scheduling window starting 2025-09-01 (14 days)"
        );
    }

    #[test]
    fn test_infeasible_displays_message() {
        let error = EngineError::Infeasible {
            message: "no assignment satisfies the hard constraints".to_string(),
        };
        assert!(error.to_string().contains("Scheduling infeasible"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_unknown_shift() -> EngineResult<()> {
            Err(EngineError::UnknownShift {
                label: "Twilight".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_unknown_shift()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
