//! Request types for the Shift Rostering Engine API.
//!
//! This module defines the JSON request structures for the `/solve`
//! endpoint and their conversion into the index-based core problem.
//! Employees arrive by id, shift types by label, and days by calendar
//! date; nothing but indices reaches the solver.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{ReschedulePolicy, SolverSettings};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CoverageCalendar, Employee, FairnessPolicy, FixedAssignment, RunLengthRule, Schedule,
    SchedulingProblem, ShiftRequest, ShiftSet, TransitionPenalty, WeeklySumRule,
};
use crate::solver::SolveOptions;

/// Request body for the `/solve` endpoint.
///
/// Contains the full point-in-time snapshot one solve operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    /// The scheduling window.
    pub horizon: HorizonRequest,
    /// The employees to roster.
    pub employees: Vec<EmployeeRequest>,
    /// Ordered shift-type labels; the first label is the off type.
    pub shift_types: Vec<String>,
    /// Weighted shift requests.
    #[serde(default)]
    pub requests: Vec<ShiftRequestEntry>,
    /// Assignments fixed ahead of the solve.
    #[serde(default)]
    pub fixed_assignments: Vec<FixedAssignmentEntry>,
    /// Consecutive-run bands.
    #[serde(default)]
    pub run_length_rules: Vec<BandRuleEntry>,
    /// Weekly-total bands.
    #[serde(default)]
    pub weekly_sum_rules: Vec<BandRuleEntry>,
    /// Discouraged or forbidden day-to-day sequences.
    #[serde(default)]
    pub transition_penalties: Vec<TransitionEntry>,
    /// Weekly staffing floors.
    #[serde(default)]
    pub coverage: Option<CoverageRequest>,
    /// Workload-balancing policy.
    #[serde(default)]
    pub fairness: Option<FairnessEntry>,
    /// A previously solved schedule for this horizon, by shift label.
    #[serde(default)]
    pub prior_schedule: Option<BTreeMap<String, Vec<String>>>,
    /// Per-request overrides of the configured solver settings.
    #[serde(default)]
    pub options: Option<OptionsRequest>,
}

/// The scheduling window of a solve request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HorizonRequest {
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Number of 7-day weeks in the window.
    pub weeks: u32,
}

impl HorizonRequest {
    /// Number of days in the window.
    pub fn num_days(&self) -> usize {
        self.weeks as usize * 7
    }
}

/// Employee information in a solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// The company the employee belongs to.
    pub company: String,
}

/// A weighted shift request in a solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRequestEntry {
    /// The requesting employee's id.
    pub employee_id: String,
    /// The requested shift-type label.
    pub shift: String,
    /// The requested date.
    pub date: NaiveDate,
    /// Signed preference weight; negative means desired.
    pub weight: i64,
}

/// A fixed assignment in a solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedAssignmentEntry {
    /// The fixed employee's id.
    pub employee_id: String,
    /// The fixed shift-type label.
    pub shift: String,
    /// The fixed date.
    pub date: NaiveDate,
}

/// A six-tuple band rule in a solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandRuleEntry {
    /// The shift-type label the band applies to.
    pub shift: String,
    /// Hard lower bound.
    pub hard_min: usize,
    /// Soft lower bound.
    pub soft_min: usize,
    /// Cost per unit below the soft lower bound.
    pub min_cost: i64,
    /// Soft upper bound.
    pub soft_max: usize,
    /// Hard upper bound.
    pub hard_max: usize,
    /// Cost per unit above the soft upper bound.
    pub max_cost: i64,
}

/// A transition penalty in a solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEntry {
    /// Label of the shift worked on the earlier day.
    pub from: String,
    /// Label of the shift worked on the following day.
    pub to: String,
    /// 0 forbids the sequence; a positive cost discourages it.
    pub cost: i64,
}

/// Coverage configuration in a solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRequest {
    /// Cost per unit of staffing below a demand floor.
    pub shortage_cost: i64,
    /// The weekday demand rows, one entry per (weekday, shift) cell.
    pub demands: Vec<DemandEntry>,
    /// Per-shift-type prices for staffing above a floor.
    #[serde(default)]
    pub excess_costs: Vec<ExcessEntry>,
}

/// One weekday demand cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandEntry {
    /// Weekday the demand applies to (0 = Monday .. 6 = Sunday).
    pub weekday: usize,
    /// The demanded shift-type label.
    pub shift: String,
    /// Minimum headcount.
    pub demand: i64,
}

/// One excess price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcessEntry {
    /// The shift-type label the price applies to.
    pub shift: String,
    /// Cost per head above the floor.
    pub cost: i64,
}

/// Fairness configuration in a solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessEntry {
    /// The shift-type label whose totals are balanced.
    pub shift: String,
    /// Cost per unit of scaled deviation.
    pub cost: i64,
}

/// Per-request overrides of the configured solver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsRequest {
    /// Overrides the configured time budget, in seconds.
    #[serde(default)]
    pub time_budget_secs: Option<u64>,
    /// Overrides the configured eligibility masking.
    #[serde(default)]
    pub restrict_to_requested: Option<bool>,
    /// Overrides the configured reschedule policy.
    #[serde(default)]
    pub reschedule: Option<ReschedulePolicy>,
}

impl SolveRequest {
    /// Converts ids, labels, and dates into the index-based core problem
    /// and the optional prior schedule.
    pub fn resolve(&self) -> EngineResult<(SchedulingProblem, Option<Schedule>)> {
        let shift_types = ShiftSet::new(self.shift_types.clone());
        let num_days = self.horizon.num_days();
        let start = self.horizon.start_date;

        let employees: Vec<Employee> = self
            .employees
            .iter()
            .map(|e| Employee {
                id: e.id.clone(),
                company: e.company.clone(),
            })
            .collect();

        let employee_index = |id: &str| -> EngineResult<usize> {
            employees
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| EngineError::UnknownEmployee { id: id.to_string() })
        };
        let shift_index = |label: &str| -> EngineResult<usize> {
            shift_types
                .resolve(label)
                .ok_or_else(|| EngineError::UnknownShift {
                    label: label.to_string(),
                })
        };
        let day_index = |date: NaiveDate| -> EngineResult<usize> {
            let offset = (date - start).num_days();
            if offset < 0 || offset as usize >= num_days {
                return Err(EngineError::DateOutOfRange {
                    date,
                    start,
                    num_days,
                });
            }
            Ok(offset as usize)
        };

        let mut requests = Vec::with_capacity(self.requests.len());
        for entry in &self.requests {
            requests.push(ShiftRequest {
                employee: employee_index(&entry.employee_id)?,
                shift: shift_index(&entry.shift)?,
                day: day_index(entry.date)?,
                weight: entry.weight,
            });
        }

        let mut fixed_assignments = Vec::with_capacity(self.fixed_assignments.len());
        for entry in &self.fixed_assignments {
            fixed_assignments.push(FixedAssignment {
                employee: employee_index(&entry.employee_id)?,
                shift: shift_index(&entry.shift)?,
                day: day_index(entry.date)?,
            });
        }

        let mut run_length_rules = Vec::with_capacity(self.run_length_rules.len());
        for entry in &self.run_length_rules {
            run_length_rules.push(RunLengthRule {
                shift: shift_index(&entry.shift)?,
                hard_min: entry.hard_min,
                soft_min: entry.soft_min,
                min_cost: entry.min_cost,
                soft_max: entry.soft_max,
                hard_max: entry.hard_max,
                max_cost: entry.max_cost,
            });
        }

        let mut weekly_sum_rules = Vec::with_capacity(self.weekly_sum_rules.len());
        for entry in &self.weekly_sum_rules {
            weekly_sum_rules.push(WeeklySumRule {
                shift: shift_index(&entry.shift)?,
                hard_min: entry.hard_min,
                soft_min: entry.soft_min,
                min_cost: entry.min_cost,
                soft_max: entry.soft_max,
                hard_max: entry.hard_max,
                max_cost: entry.max_cost,
            });
        }

        let mut transition_penalties = Vec::with_capacity(self.transition_penalties.len());
        for entry in &self.transition_penalties {
            transition_penalties.push(TransitionPenalty {
                from_shift: shift_index(&entry.from)?,
                to_shift: shift_index(&entry.to)?,
                cost: entry.cost,
            });
        }

        let coverage = match &self.coverage {
            Some(request) => Some(Self::resolve_coverage(
                request,
                &shift_types,
                start,
                &shift_index,
            )?),
            None => None,
        };

        let fairness = match &self.fairness {
            Some(entry) => Some(FairnessPolicy {
                shift: shift_index(&entry.shift)?,
                cost: entry.cost,
            }),
            None => None,
        };

        let prior = match &self.prior_schedule {
            Some(prior) => {
                let mut schedule = Schedule::default();
                for (id, labels) in prior {
                    let mut days = Vec::with_capacity(labels.len());
                    for label in labels {
                        days.push(shift_index(label)?);
                    }
                    schedule.assignments.insert(id.clone(), days);
                }
                Some(schedule)
            }
            None => None,
        };

        let problem = SchedulingProblem {
            employees,
            shift_types,
            num_days,
            requests,
            fixed_assignments,
            run_length_rules,
            weekly_sum_rules,
            transition_penalties,
            coverage,
            fairness,
        };
        Ok((problem, prior))
    }

    fn resolve_coverage(
        request: &CoverageRequest,
        shift_types: &ShiftSet,
        start: NaiveDate,
        shift_index: &dyn Fn(&str) -> EngineResult<usize>,
    ) -> EngineResult<CoverageCalendar> {
        let num_shifts = shift_types.len();
        let mut demands = vec![vec![0i64; num_shifts]; 7];
        for entry in &request.demands {
            if entry.weekday >= 7 {
                return Err(EngineError::InvalidProblem {
                    message: format!("coverage weekday {} is not in 0..7", entry.weekday),
                });
            }
            demands[entry.weekday][shift_index(&entry.shift)?] = entry.demand;
        }
        let mut excess_costs = vec![0i64; num_shifts];
        let mut any_excess = false;
        for entry in &request.excess_costs {
            excess_costs[shift_index(&entry.shift)?] = entry.cost;
            any_excess = true;
        }
        Ok(CoverageCalendar {
            start_weekday: start.weekday().num_days_from_monday() as usize,
            demands,
            shortage_cost: request.shortage_cost,
            excess_costs: if any_excess { excess_costs } else { Vec::new() },
        })
    }

    /// Derives the per-solve options from the configured settings and any
    /// overrides carried in the request.
    pub fn solve_options(&self, settings: &SolverSettings) -> SolveOptions {
        let mut options: SolveOptions = settings.into();
        if let Some(overrides) = &self.options {
            if let Some(secs) = overrides.time_budget_secs {
                options.time_budget = Duration::from_secs(secs);
            }
            if let Some(restrict) = overrides.restrict_to_requested {
                options.restrict_to_requested = restrict;
            }
            if let Some(reschedule) = overrides.reschedule {
                options.reschedule = reschedule;
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> SolveRequest {
        serde_json::from_value(serde_json::json!({
            "horizon": { "start_date": "2025-09-01", "weeks": 1 },
            "employees": [
                { "id": "emp_001", "company": "acme_care" },
                { "id": "emp_002", "company": "acme_care" }
            ],
            "shift_types": ["Off", "Day", "Night"]
        }))
        .unwrap()
    }

    #[test]
    fn test_minimal_request_resolves() {
        let (problem, prior) = base_request().resolve().unwrap();
        assert_eq!(problem.num_employees(), 2);
        assert_eq!(problem.num_shifts(), 3);
        assert_eq!(problem.num_days, 7);
        assert!(prior.is_none());
        assert!(problem.validate().is_ok());
    }

    #[test]
    fn test_dates_become_day_indices() {
        let mut request = base_request();
        request.requests.push(ShiftRequestEntry {
            employee_id: "emp_002".to_string(),
            shift: "Night".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 4).unwrap(),
            weight: -2,
        });
        let (problem, _) = request.resolve().unwrap();
        assert_eq!(
            problem.requests,
            vec![ShiftRequest {
                employee: 1,
                shift: 2,
                day: 3,
                weight: -2,
            }]
        );
    }

    #[test]
    fn test_date_outside_window_is_rejected() {
        let mut request = base_request();
        request.fixed_assignments.push(FixedAssignmentEntry {
            employee_id: "emp_001".to_string(),
            shift: "Day".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(),
        });
        assert!(matches!(
            request.resolve(),
            Err(EngineError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let mut request = base_request();
        request.transition_penalties.push(TransitionEntry {
            from: "Night".to_string(),
            to: "Twilight".to_string(),
            cost: 4,
        });
        match request.resolve() {
            Err(EngineError::UnknownShift { label }) => assert_eq!(label, "Twilight"),
            other => panic!("expected UnknownShift, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_employee_is_rejected() {
        let mut request = base_request();
        request.requests.push(ShiftRequestEntry {
            employee_id: "emp_999".to_string(),
            shift: "Day".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            weight: -1,
        });
        assert!(matches!(
            request.resolve(),
            Err(EngineError::UnknownEmployee { .. })
        ));
    }

    #[test]
    fn test_coverage_resolves_start_weekday_and_rows() {
        let mut request = base_request();
        request.coverage = Some(CoverageRequest {
            shortage_cost: 6,
            demands: vec![DemandEntry {
                weekday: 2,
                shift: "Day".to_string(),
                demand: 2,
            }],
            excess_costs: vec![ExcessEntry {
                shift: "Day".to_string(),
                cost: 1,
            }],
        });
        let (problem, _) = request.resolve().unwrap();
        let coverage = problem.coverage.unwrap();
        // 2025-09-01 is a Monday
        assert_eq!(coverage.start_weekday, 0);
        assert_eq!(coverage.demands[2], vec![0, 2, 0]);
        assert_eq!(coverage.excess_costs, vec![0, 1, 0]);
    }

    #[test]
    fn test_prior_schedule_resolves_labels() {
        let mut request = base_request();
        let mut prior = BTreeMap::new();
        prior.insert(
            "emp_001".to_string(),
            vec!["Day".to_string(), "Off".to_string()],
        );
        request.prior_schedule = Some(prior);
        let (_, prior) = request.resolve().unwrap();
        assert_eq!(
            prior.unwrap().shifts_for("emp_001"),
            Some(&[1usize, 0][..])
        );
    }

    #[test]
    fn test_options_override_settings() {
        let mut request = base_request();
        request.options = Some(OptionsRequest {
            time_budget_secs: Some(3),
            restrict_to_requested: Some(false),
            reschedule: None,
        });
        let options = request.solve_options(&SolverSettings::default());
        assert_eq!(options.time_budget, Duration::from_secs(3));
        assert!(!options.restrict_to_requested);
        assert_eq!(options.reschedule, ReschedulePolicy::Discard);
    }
}
