//! Shift requests and fixed assignments.
//!
//! This module defines the two ways intent enters a scheduling problem:
//! weighted per-day shift requests, and assignments fixed ahead of the
//! solve.

use serde::{Deserialize, Serialize};

/// A weighted request by one employee for one shift on one day.
///
/// A negative weight means the employee desires the assignment: granting it
/// subtracts from the objective. A positive weight means the employee wants
/// to avoid it: assigning it anyway adds to the objective. Requests with
/// negative weight also make the cell eligible under intent masking.
///
/// # Examples
///
/// ```
/// use roster_engine::models::ShiftRequest;
///
/// let wants_night = ShiftRequest { employee: 0, shift: 2, day: 3, weight: -2 };
/// let avoid_early = ShiftRequest { employee: 0, shift: 1, day: 4, weight: 4 };
/// assert!(wants_night.is_desired());
/// assert!(!avoid_early.is_desired());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Index of the requesting employee.
    pub employee: usize,
    /// Index of the requested shift type.
    pub shift: usize,
    /// Day index within the horizon (0-based).
    pub day: usize,
    /// Signed preference weight added to the objective when assigned.
    pub weight: i64,
}

impl ShiftRequest {
    /// Returns true if the request expresses desire (negative weight).
    pub fn is_desired(&self) -> bool {
        self.weight < 0
    }
}

/// An assignment forced to hold in every solution.
///
/// Two fixed assignments naming different shifts for the same employee and
/// day are a configuration error, reported during validation, never
/// silently resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAssignment {
    /// Index of the employee being fixed.
    pub employee: usize,
    /// Index of the shift type to assign.
    pub shift: usize,
    /// Day index within the horizon (0-based).
    pub day: usize,
}
