//! The scheduling problem aggregate.
//!
//! This module defines [`SchedulingProblem`], the point-in-time snapshot of
//! all domain data one solve operates on, together with the validation pass
//! that rejects malformed configuration before any model is built.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{
    CoverageCalendar, Employee, FairnessPolicy, FixedAssignment, OFF_SHIFT, RunLengthRule,
    ShiftRequest, ShiftSet, TransitionPenalty, WeeklySumRule,
};

/// A complete scheduling problem for one company over one horizon.
///
/// The problem is a read-only snapshot: the engine never mutates it, and
/// concurrent solves for different problems share nothing. All record
/// fields use indices into `employees` and `shift_types`; [`Self::validate`]
/// checks every index and every rule tuple before a solve is attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingProblem {
    /// The employees being rostered.
    pub employees: Vec<Employee>,
    /// The shift-type catalog; index 0 is the off type.
    pub shift_types: ShiftSet,
    /// Number of days in the horizon.
    pub num_days: usize,
    /// Weighted per-day shift requests.
    #[serde(default)]
    pub requests: Vec<ShiftRequest>,
    /// Assignments forced ahead of the solve.
    #[serde(default)]
    pub fixed_assignments: Vec<FixedAssignment>,
    /// Consecutive-run bands per shift type.
    #[serde(default)]
    pub run_length_rules: Vec<RunLengthRule>,
    /// Weekly-total bands per shift type.
    #[serde(default)]
    pub weekly_sum_rules: Vec<WeeklySumRule>,
    /// Discouraged or forbidden day-to-day sequences.
    #[serde(default)]
    pub transition_penalties: Vec<TransitionPenalty>,
    /// Weekly-cyclic staffing floors, if any.
    #[serde(default)]
    pub coverage: Option<CoverageCalendar>,
    /// Workload-balancing policy, if any.
    #[serde(default)]
    pub fairness: Option<FairnessPolicy>,
}

impl SchedulingProblem {
    /// Number of employees in the problem.
    pub fn num_employees(&self) -> usize {
        self.employees.len()
    }

    /// Number of shift types, including the off type.
    pub fn num_shifts(&self) -> usize {
        self.shift_types.len()
    }

    /// Validates every index and rule tuple in the problem.
    ///
    /// All configuration errors surface here, before any variables or
    /// constraints exist; the solve step is never attempted on invalid
    /// input. Returns the first error encountered, with enough context
    /// (employee/shift/day/rule) to act on.
    pub fn validate(&self) -> EngineResult<()> {
        if self.num_days == 0 {
            return Err(EngineError::InvalidProblem {
                message: "the scheduling horizon is empty".to_string(),
            });
        }
        if self.shift_types.is_empty() {
            return Err(EngineError::InvalidProblem {
                message: "at least the off shift type must be declared".to_string(),
            });
        }

        for request in &self.requests {
            self.check_cell(
                request.employee,
                request.shift,
                request.day,
                "shift request",
            )?;
        }

        self.validate_fixed_assignments()?;

        for rule in &self.run_length_rules {
            let context = format!("run-length rule for shift {}", rule.shift);
            self.check_shift(rule.shift, &context)?;
            check_band(
                &context,
                rule.hard_min,
                rule.soft_min,
                rule.min_cost,
                rule.soft_max,
                rule.hard_max,
                rule.max_cost,
            )?;
        }

        for rule in &self.weekly_sum_rules {
            let context = format!("weekly-sum rule for shift {}", rule.shift);
            self.check_shift(rule.shift, &context)?;
            check_band(
                &context,
                rule.hard_min,
                rule.soft_min,
                rule.min_cost,
                rule.soft_max,
                rule.hard_max,
                rule.max_cost,
            )?;
            if rule.hard_min > 7 {
                return Err(EngineError::InvalidRuleBounds {
                    rule: context,
                    message: format!("hard_min {} exceeds the week length", rule.hard_min),
                });
            }
        }

        for penalty in &self.transition_penalties {
            self.check_shift(penalty.from_shift, "transition penalty")?;
            self.check_shift(penalty.to_shift, "transition penalty")?;
            if penalty.from_shift == OFF_SHIFT || penalty.to_shift == OFF_SHIFT {
                return Err(EngineError::OffShiftTransition {
                    from_shift: penalty.from_shift,
                    to_shift: penalty.to_shift,
                });
            }
            if penalty.cost < 0 {
                return Err(EngineError::InvalidRuleBounds {
                    rule: format!(
                        "transition penalty {} -> {}",
                        penalty.from_shift, penalty.to_shift
                    ),
                    message: format!("negative cost {}", penalty.cost),
                });
            }
        }

        if let Some(coverage) = &self.coverage {
            self.validate_coverage(coverage)?;
        }

        if let Some(fairness) = &self.fairness {
            self.check_shift(fairness.shift, "fairness policy")?;
            if fairness.cost < 0 {
                return Err(EngineError::InvalidRuleBounds {
                    rule: "fairness policy".to_string(),
                    message: format!("negative cost {}", fairness.cost),
                });
            }
        }

        Ok(())
    }

    fn validate_fixed_assignments(&self) -> EngineResult<()> {
        // first fix wins the slot; any later disagreement is reported
        let mut fixed_by_cell: Vec<Option<usize>> =
            vec![None; self.num_employees() * self.num_days];
        for fix in &self.fixed_assignments {
            self.check_cell(fix.employee, fix.shift, fix.day, "fixed assignment")?;
            let slot = &mut fixed_by_cell[fix.employee * self.num_days + fix.day];
            match slot {
                Some(existing) if *existing != fix.shift => {
                    return Err(EngineError::ConflictingFixedAssignments {
                        employee: fix.employee,
                        day: fix.day,
                        first: *existing,
                        second: fix.shift,
                    });
                }
                Some(_) => {}
                None => *slot = Some(fix.shift),
            }
        }
        Ok(())
    }

    fn validate_coverage(&self, coverage: &CoverageCalendar) -> EngineResult<()> {
        if coverage.start_weekday >= 7 {
            return Err(EngineError::InvalidProblem {
                message: format!(
                    "coverage start weekday {} is not in 0..7",
                    coverage.start_weekday
                ),
            });
        }
        if coverage.demands.len() != 7 {
            return Err(EngineError::InvalidProblem {
                message: format!(
                    "coverage calendar has {} weekday rows, expected 7",
                    coverage.demands.len()
                ),
            });
        }
        for (weekday, row) in coverage.demands.iter().enumerate() {
            if row.len() != self.num_shifts() {
                return Err(EngineError::InvalidProblem {
                    message: format!(
                        "coverage row for weekday {} has {} entries, expected {}",
                        weekday,
                        row.len(),
                        self.num_shifts()
                    ),
                });
            }
            for (shift, &demand) in row.iter().enumerate() {
                if demand < 0 {
                    return Err(EngineError::NegativeDemand {
                        weekday,
                        shift,
                        demand,
                    });
                }
            }
            if row[OFF_SHIFT] != 0 {
                return Err(EngineError::InvalidProblem {
                    message: format!(
                        "the off shift cannot carry coverage demand (weekday {})",
                        weekday
                    ),
                });
            }
        }
        if coverage.shortage_cost < 0 {
            return Err(EngineError::InvalidRuleBounds {
                rule: "coverage calendar".to_string(),
                message: format!("negative shortage cost {}", coverage.shortage_cost),
            });
        }
        if !coverage.excess_costs.is_empty() && coverage.excess_costs.len() != self.num_shifts() {
            return Err(EngineError::InvalidProblem {
                message: format!(
                    "coverage excess costs have {} entries, expected {} or none",
                    coverage.excess_costs.len(),
                    self.num_shifts()
                ),
            });
        }
        for (shift, &cost) in coverage.excess_costs.iter().enumerate() {
            if cost < 0 {
                return Err(EngineError::InvalidRuleBounds {
                    rule: format!("coverage excess cost for shift {}", shift),
                    message: format!("negative cost {}", cost),
                });
            }
        }
        Ok(())
    }

    fn check_cell(
        &self,
        employee: usize,
        shift: usize,
        day: usize,
        context: &str,
    ) -> EngineResult<()> {
        if employee >= self.num_employees() {
            return Err(EngineError::EmployeeOutOfRange {
                employee,
                num_employees: self.num_employees(),
                context: context.to_string(),
            });
        }
        self.check_shift(shift, context)?;
        if day >= self.num_days {
            return Err(EngineError::DayOutOfRange {
                day,
                num_days: self.num_days,
                context: context.to_string(),
            });
        }
        Ok(())
    }

    fn check_shift(&self, shift: usize, context: &str) -> EngineResult<()> {
        if shift >= self.num_shifts() {
            return Err(EngineError::ShiftOutOfRange {
                shift,
                num_shifts: self.num_shifts(),
                context: context.to_string(),
            });
        }
        Ok(())
    }
}

fn check_band(
    context: &str,
    hard_min: usize,
    soft_min: usize,
    min_cost: i64,
    soft_max: usize,
    hard_max: usize,
    max_cost: i64,
) -> EngineResult<()> {
    if !(hard_min <= soft_min && soft_min <= soft_max && soft_max <= hard_max) {
        return Err(EngineError::InvalidRuleBounds {
            rule: context.to_string(),
            message: format!(
                "bounds must satisfy hard_min <= soft_min <= soft_max <= hard_max, \
                 got ({}, {}, {}, {})",
                hard_min, soft_min, soft_max, hard_max
            ),
        });
    }
    if min_cost < 0 || max_cost < 0 {
        return Err(EngineError::InvalidRuleBounds {
            rule: context.to_string(),
            message: format!("negative costs ({}, {})", min_cost, max_cost),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn base_problem() -> SchedulingProblem {
        SchedulingProblem {
            employees: vec![
                Employee {
                    id: "emp_001".to_string(),
                    company: "acme_care".to_string(),
                },
                Employee {
                    id: "emp_002".to_string(),
                    company: "acme_care".to_string(),
                },
            ],
            shift_types: ShiftSet::new(vec![
                "Off".to_string(),
                "Day".to_string(),
                "Night".to_string(),
            ]),
            num_days: 7,
            requests: Vec::new(),
            fixed_assignments: Vec::new(),
            run_length_rules: Vec::new(),
            weekly_sum_rules: Vec::new(),
            transition_penalties: Vec::new(),
            coverage: None,
            fairness: None,
        }
    }

    #[test]
    fn test_valid_problem_passes() {
        assert!(base_problem().validate().is_ok());
    }

    #[test]
    fn test_empty_horizon_rejected() {
        let mut problem = base_problem();
        problem.num_days = 0;
        assert!(matches!(
            problem.validate(),
            Err(EngineError::InvalidProblem { .. })
        ));
    }

    #[test]
    fn test_request_with_bad_employee_rejected() {
        let mut problem = base_problem();
        problem.requests.push(ShiftRequest {
            employee: 9,
            shift: 1,
            day: 0,
            weight: -1,
        });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::EmployeeOutOfRange { employee: 9, .. })
        ));
    }

    #[test]
    fn test_request_with_bad_day_rejected() {
        let mut problem = base_problem();
        problem.requests.push(ShiftRequest {
            employee: 0,
            shift: 1,
            day: 7,
            weight: -1,
        });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::DayOutOfRange { day: 7, .. })
        ));
    }

    #[test]
    fn test_conflicting_fixes_rejected() {
        let mut problem = base_problem();
        problem.fixed_assignments.push(FixedAssignment {
            employee: 0,
            shift: 1,
            day: 2,
        });
        problem.fixed_assignments.push(FixedAssignment {
            employee: 0,
            shift: 2,
            day: 2,
        });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::ConflictingFixedAssignments {
                employee: 0,
                day: 2,
                first: 1,
                second: 2,
            })
        ));
    }

    #[test]
    fn test_duplicate_identical_fixes_allowed() {
        let mut problem = base_problem();
        let fix = FixedAssignment {
            employee: 0,
            shift: 1,
            day: 2,
        };
        problem.fixed_assignments.push(fix);
        problem.fixed_assignments.push(fix);
        assert!(problem.validate().is_ok());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut problem = base_problem();
        problem.run_length_rules.push(RunLengthRule {
            shift: 1,
            hard_min: 3,
            soft_min: 2,
            min_cost: 1,
            soft_max: 4,
            hard_max: 5,
            max_cost: 1,
        });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::InvalidRuleBounds { .. })
        ));
    }

    #[test]
    fn test_off_shift_transition_rejected() {
        let mut problem = base_problem();
        problem.transition_penalties.push(TransitionPenalty {
            from_shift: 0,
            to_shift: 1,
            cost: 4,
        });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::OffShiftTransition { .. })
        ));
    }

    #[test]
    fn test_negative_demand_rejected() {
        let mut problem = base_problem();
        let mut demands = vec![vec![0, 1, 1]; 7];
        demands[3][2] = -1;
        problem.coverage = Some(CoverageCalendar {
            start_weekday: 0,
            demands,
            shortage_cost: 5,
            excess_costs: Vec::new(),
        });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::NegativeDemand {
                weekday: 3,
                shift: 2,
                demand: -1,
            })
        ));
    }

    #[test]
    fn test_off_shift_demand_rejected() {
        let mut problem = base_problem();
        let mut demands = vec![vec![0, 1, 1]; 7];
        demands[0][0] = 1;
        problem.coverage = Some(CoverageCalendar {
            start_weekday: 0,
            demands,
            shortage_cost: 5,
            excess_costs: Vec::new(),
        });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::InvalidProblem { .. })
        ));
    }

    #[test]
    fn test_short_coverage_row_rejected() {
        let mut problem = base_problem();
        problem.coverage = Some(CoverageCalendar {
            start_weekday: 0,
            demands: vec![vec![0, 1]; 7],
            shortage_cost: 5,
            excess_costs: Vec::new(),
        });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::InvalidProblem { .. })
        ));
    }

    #[test]
    fn test_fairness_on_unknown_shift_rejected() {
        let mut problem = base_problem();
        problem.fairness = Some(FairnessPolicy { shift: 5, cost: 2 });
        assert!(matches!(
            problem.validate(),
            Err(EngineError::ShiftOutOfRange { shift: 5, .. })
        ));
    }
}
