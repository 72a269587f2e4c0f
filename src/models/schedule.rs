//! Solved schedule and diagnostics models.
//!
//! This module contains the output side of a solve: the per-employee,
//! per-day shift assignments and the diagnostic report describing how good
//! the solution is and which soft rules it had to bend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The solved roster: employee id to per-day shift-type indices.
///
/// Every employee has exactly one shift-type index (possibly the off type)
/// for every day of the horizon.
///
/// # Example
///
/// ```
/// use roster_engine::models::Schedule;
///
/// let mut schedule = Schedule::default();
/// schedule
///     .assignments
///     .insert("emp_001".to_string(), vec![1, 1, 0]);
/// assert_eq!(schedule.shifts_for("emp_001"), Some(&[1usize, 1, 0][..]));
/// assert_eq!(schedule.count_assignments(1), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Employee id to the ordered shift-type index for each horizon day.
    pub assignments: BTreeMap<String, Vec<usize>>,
}

impl Schedule {
    /// Returns the per-day shift indices for an employee, if present.
    pub fn shifts_for(&self, employee_id: &str) -> Option<&[usize]> {
        self.assignments.get(employee_id).map(Vec::as_slice)
    }

    /// Counts how many employee-days are assigned to the given shift type.
    pub fn count_assignments(&self, shift: usize) -> usize {
        self.assignments
            .values()
            .flat_map(|days| days.iter())
            .filter(|&&s| s == shift)
            .count()
    }

    /// Counts how many employees work the given shift on the given day.
    pub fn assigned_on(&self, day: usize, shift: usize) -> usize {
        self.assignments
            .values()
            .filter(|days| days.get(day) == Some(&shift))
            .count()
    }
}

/// Outcome quality of a completed solve.
///
/// `Feasible` is the budget-exceeded warning in diagnostics form: a valid
/// schedule was returned but the search ran out of time before proving it
/// minimal. Infeasibility is not a status; it surfaces as
/// [`EngineError::Infeasible`](crate::error::EngineError::Infeasible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The objective was proven minimal.
    Optimal,
    /// A valid schedule was found but the time budget ran out before
    /// optimality could be proven.
    Feasible,
}

/// The rule family a penalty term belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Employee shift-request terms (desire granted or dislike imposed).
    Preference,
    /// Consecutive-run band penalties.
    RunLength,
    /// Weekly-total band penalties.
    WeeklySum,
    /// Day-to-day sequence penalties.
    Transition,
    /// Staffing below a coverage floor.
    CoverageShortage,
    /// Staffing above a coverage floor.
    CoverageExcess,
    /// Workload deviation from the group mean.
    Fairness,
}

/// One soft rule that fired in the returned schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The rule family that fired.
    pub rule: RuleKind,
    /// The employee concerned, if the rule is employee-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
    /// The shift-type label concerned, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
    /// The first day concerned, if the rule is day-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<usize>,
    /// Human-readable description of the violation.
    pub detail: String,
    /// The penalty this violation contributed to the objective.
    pub penalty: i64,
}

/// Shortfall against one coverage floor in the returned schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// The day the gap occurs on.
    pub day: usize,
    /// The under-staffed shift-type label.
    pub shift: String,
    /// The demanded headcount.
    pub demand: i64,
    /// The headcount actually assigned.
    pub assigned: i64,
    /// Missing heads: `demand - assigned`.
    pub shortage: i64,
}

/// Diagnostic report accompanying a solved schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Whether the objective was proven minimal.
    pub status: SolveStatus,
    /// The objective value of the returned schedule. Can be negative when
    /// granted desire requests outweigh all penalties.
    pub objective: i64,
    /// Wall-clock solve time in milliseconds.
    pub wall_time_ms: u64,
    /// Total objective contribution per rule family. The preference total
    /// can be negative.
    pub penalty_totals: BTreeMap<RuleKind, i64>,
    /// Every soft rule that fired, with actionable context.
    pub violations: Vec<Violation>,
    /// Every coverage floor left short, one entry per day/shift cell.
    pub coverage_gaps: Vec<CoverageGap>,
}

/// A solved schedule together with its diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedRoster {
    /// The per-employee, per-day assignments.
    pub schedule: Schedule,
    /// The diagnostic report for this solve.
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut schedule = Schedule::default();
        schedule
            .assignments
            .insert("emp_001".to_string(), vec![1, 0, 1]);
        schedule
            .assignments
            .insert("emp_002".to_string(), vec![0, 1, 1]);
        schedule
    }

    #[test]
    fn test_count_assignments() {
        assert_eq!(sample_schedule().count_assignments(1), 4);
        assert_eq!(sample_schedule().count_assignments(0), 2);
    }

    #[test]
    fn test_assigned_on() {
        let schedule = sample_schedule();
        assert_eq!(schedule.assigned_on(0, 1), 1);
        assert_eq!(schedule.assigned_on(2, 1), 2);
        assert_eq!(schedule.assigned_on(1, 2), 0);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SolveStatus::Optimal).unwrap(),
            "\"optimal\""
        );
        assert_eq!(
            serde_json::to_string(&SolveStatus::Feasible).unwrap(),
            "\"feasible\""
        );
    }

    #[test]
    fn test_rule_kind_usable_as_map_key() {
        let mut totals = BTreeMap::new();
        totals.insert(RuleKind::CoverageShortage, 12i64);
        totals.insert(RuleKind::Preference, -4i64);
        let json = serde_json::to_string(&totals).unwrap();
        assert!(json.contains("\"coverage_shortage\":12"));
        assert!(json.contains("\"preference\":-4"));
        let back: BTreeMap<RuleKind, i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, totals);
    }

    #[test]
    fn test_violation_omits_empty_context() {
        let violation = Violation {
            rule: RuleKind::Fairness,
            employee: Some("emp_001".to_string()),
            shift: None,
            day: None,
            detail: "workload above the group mean".to_string(),
            penalty: 6,
        };
        let json = serde_json::to_string(&violation).unwrap();
        assert!(json.contains("\"employee\":\"emp_001\""));
        assert!(!json.contains("\"shift\""));
        assert!(!json.contains("\"day\""));
    }
}
