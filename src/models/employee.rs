//! Employee model.
//!
//! This module defines the Employee struct for representing workers in the
//! rostering system.

use serde::{Deserialize, Serialize};

/// Represents an employee available for rostering.
///
/// Employees are created by the surrounding service and referenced
/// read-only by the engine for the duration of one solve. Within a
/// [`SchedulingProblem`](crate::models::SchedulingProblem) an employee is
/// addressed by position in the employee list; the `id` travels back out in
/// the solved schedule.
///
/// # Examples
///
/// ```
/// use roster_engine::models::Employee;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     company: "acme_care".to_string(),
/// };
/// assert_eq!(employee.id, "emp_001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The company the employee belongs to. Each employee belongs to
    /// exactly one company; a solve covers one company's workforce.
    pub company: String,
}
