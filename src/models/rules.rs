//! Soft and hard rule definitions.
//!
//! This module defines the constraint tuples a scheduling problem carries:
//! run-length and weekly-sum bands, transition penalties, the weekly
//! coverage calendar, and the fairness policy.

use serde::{Deserialize, Serialize};

/// Bounds on the length of maximal consecutive runs of one shift type.
///
/// Hard bounds are never violated: no solution contains a run shorter than
/// `hard_min` or longer than `hard_max`. Soft bounds are penalized: a run
/// of length `l` with `hard_min <= l < soft_min` costs
/// `min_cost * (soft_min - l)`, and a run with `soft_max < l <= hard_max`
/// costs `max_cost * (l - soft_max)`.
///
/// # Examples
///
/// ```
/// use roster_engine::models::RunLengthRule;
///
/// // Night stints must span 1..=4 days; 2..=3 is preferred.
/// let rule = RunLengthRule {
///     shift: 2,
///     hard_min: 1,
///     soft_min: 2,
///     min_cost: 20,
///     soft_max: 3,
///     hard_max: 4,
///     max_cost: 5,
/// };
/// assert_eq!(rule.shift, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLengthRule {
    /// The shift type the rule applies to (the off type is allowed: a rule
    /// on shift 0 bounds rest periods).
    pub shift: usize,
    /// Shortest run any solution may contain.
    pub hard_min: usize,
    /// Shortest run that goes unpenalized.
    pub soft_min: usize,
    /// Cost per day of deficit below `soft_min`.
    pub min_cost: i64,
    /// Longest run that goes unpenalized.
    pub soft_max: usize,
    /// Longest run any solution may contain.
    pub hard_max: usize,
    /// Cost per day of excess above `soft_max`.
    pub max_cost: i64,
}

/// Bounds on the total count of one shift type within each 7-day week.
///
/// Same six-tuple semantics as [`RunLengthRule`], applied to the weekly
/// total rather than to contiguous-run length. Violations are linear
/// shortfall/excess integers penalized per unit. Only full weeks of the
/// horizon generate constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySumRule {
    /// The shift type the rule applies to.
    pub shift: usize,
    /// Smallest weekly total any solution may contain.
    pub hard_min: usize,
    /// Smallest weekly total that goes unpenalized.
    pub soft_min: usize,
    /// Cost per unit of shortfall below `soft_min`.
    pub min_cost: i64,
    /// Largest weekly total that goes unpenalized.
    pub soft_max: usize,
    /// Largest weekly total any solution may contain.
    pub hard_max: usize,
    /// Cost per unit of excess above `soft_max`.
    pub max_cost: i64,
}

/// A discouraged or forbidden day-to-day shift sequence.
///
/// A cost of 0 forbids the transition outright; a positive cost allows it
/// but charges the objective each time an employee works `from_shift` on
/// one day and `to_shift` on the next. Neither side may be the off shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPenalty {
    /// The shift type worked on the earlier day.
    pub from_shift: usize,
    /// The shift type worked on the following day.
    pub to_shift: usize,
    /// 0 forbids the sequence; a positive cost discourages it.
    pub cost: i64,
}

/// Weekly-cyclic staffing floors with shortage and excess pricing.
///
/// `demands` holds 7 weekday rows (0 = Monday), one column per shift type.
/// The demand applying to horizon day `d` comes from row
/// `(start_weekday + d) % 7`. A demand of 0 generates no constraint for
/// that cell. Shortage below the floor is always charged `shortage_cost`
/// per missing head; staffing above the floor is admitted only for shift
/// types with a positive entry in `excess_costs`, charged per extra head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCalendar {
    /// Weekday of horizon day 0 (0 = Monday .. 6 = Sunday).
    pub start_weekday: usize,
    /// 7 weekday rows of per-shift-type minimum headcounts.
    pub demands: Vec<Vec<i64>>,
    /// Cost per unit of staffing below a demand floor.
    pub shortage_cost: i64,
    /// Per-shift-type cost of staffing above a demand floor; empty, or one
    /// entry per shift type, 0 meaning over-staffing is not admitted.
    #[serde(default)]
    pub excess_costs: Vec<i64>,
}

impl CoverageCalendar {
    /// Returns the weekday row (0 = Monday) applying to a horizon day.
    pub fn weekday_of(&self, day: usize) -> usize {
        (self.start_weekday + day) % 7
    }

    /// Returns the demand for a shift type on a horizon day.
    pub fn demand_on(&self, day: usize, shift: usize) -> i64 {
        self.demands[self.weekday_of(day)][shift]
    }

    /// Returns the configured excess cost for a shift type, 0 if none.
    pub fn excess_cost(&self, shift: usize) -> i64 {
        self.excess_costs.get(shift).copied().unwrap_or(0)
    }
}

/// Workload-balancing policy for one shift type.
///
/// The engine balances each employee's total count of `shift` against the
/// group mean, charging `cost` per unit of (integral, scaled) deviation.
/// The target is typically the heaviest-burden working shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessPolicy {
    /// The shift type whose per-employee totals are balanced.
    pub shift: usize,
    /// Cost per unit of scaled deviation from the group mean.
    pub cost: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar() -> CoverageCalendar {
        CoverageCalendar {
            start_weekday: 5, // Saturday
            demands: vec![vec![0, 2]; 7],
            shortage_cost: 8,
            excess_costs: vec![0, 3],
        }
    }

    #[test]
    fn test_weekday_wraps_from_start_offset() {
        let cal = calendar();
        assert_eq!(cal.weekday_of(0), 5); // Saturday
        assert_eq!(cal.weekday_of(1), 6); // Sunday
        assert_eq!(cal.weekday_of(2), 0); // Monday
        assert_eq!(cal.weekday_of(9), 0);
    }

    #[test]
    fn test_demand_lookup_is_cyclic() {
        let mut cal = calendar();
        cal.demands[6] = vec![0, 5]; // Sundays need 5
        assert_eq!(cal.demand_on(1, 1), 5);
        assert_eq!(cal.demand_on(8, 1), 5);
        assert_eq!(cal.demand_on(2, 1), 2);
    }

    #[test]
    fn test_excess_cost_defaults_to_zero() {
        let cal = CoverageCalendar {
            start_weekday: 0,
            demands: vec![vec![0, 1]; 7],
            shortage_cost: 4,
            excess_costs: Vec::new(),
        };
        assert_eq!(cal.excess_cost(1), 0);
    }

    #[test]
    fn test_rule_serde_round_trip() {
        let rule = RunLengthRule {
            shift: 1,
            hard_min: 1,
            soft_min: 2,
            min_cost: 20,
            soft_max: 3,
            hard_max: 4,
            max_cost: 5,
        };
        let json = serde_json::to_string(&rule).unwrap();
        let back: RunLengthRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
    }
}
