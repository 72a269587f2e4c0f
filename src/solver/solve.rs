//! Solve orchestrator.
//!
//! Validates the problem snapshot, folds in any prior schedule per the
//! reschedule policy, compiles every rule family onto the variable grid,
//! invokes the optimization backend under the time budget, and rebuilds
//! the solved roster together with its diagnostic report.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{ReschedulePolicy, SolverSettings};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CoverageGap, Diagnostics, FixedAssignment, OFF_SHIFT, RuleKind, Schedule, SchedulingProblem,
    ShiftRequest, SolveStatus, SolvedRoster, Violation,
};

use super::backend::{SearchStatus, SolveParams, SolverBackend};
use super::builder::{CostVar, ModelBuilder, TermLabel};
use super::bundled::BundledSolver;
use super::coverage::add_coverage_rules;
use super::fairness::add_fairness_terms;
use super::grid::VariableGrid;
use super::hard_rules::apply_assignment_structure;
use super::run_length::add_run_length_rules;
use super::transitions::add_transition_penalties;
use super::weekly_sums::add_weekly_sum_rules;

/// Per-solve options, typically derived from [`SolverSettings`].
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Wall-clock budget for the backend.
    pub time_budget: Duration,
    /// Search seed for backends with randomized strategies.
    pub seed: u64,
    /// Whether working shifts are confined to fixed or desired cells.
    pub restrict_to_requested: bool,
    /// How a prior schedule for the horizon is treated.
    pub reschedule: ReschedulePolicy,
}

impl Default for SolveOptions {
    fn default() -> Self {
        (&SolverSettings::default()).into()
    }
}

impl From<&SolverSettings> for SolveOptions {
    fn from(settings: &SolverSettings) -> Self {
        Self {
            time_budget: Duration::from_secs(settings.time_budget_secs),
            seed: settings.seed,
            restrict_to_requested: settings.restrict_to_requested,
            reschedule: settings.reschedule,
        }
    }
}

/// Solves a scheduling problem with the bundled backend.
///
/// `prior` is the previously solved schedule for the same horizon, if any;
/// how it is honored is governed by [`SolveOptions::reschedule`].
///
/// # Errors
///
/// Configuration errors surface before any search starts;
/// [`EngineError::Infeasible`] is returned when the hard constraints admit
/// no schedule within the time budget; a partial schedule is never
/// fabricated.
pub fn solve_schedule(
    problem: &SchedulingProblem,
    prior: Option<&Schedule>,
    options: &SolveOptions,
) -> EngineResult<SolvedRoster> {
    solve_schedule_with(problem, prior, options, &BundledSolver::new())
}

/// Solves a scheduling problem with a caller-supplied backend.
pub fn solve_schedule_with(
    problem: &SchedulingProblem,
    prior: Option<&Schedule>,
    options: &SolveOptions,
    backend: &dyn SolverBackend,
) -> EngineResult<SolvedRoster> {
    problem.validate()?;
    let (requests, fixes) = fold_prior(problem, prior, options)?;

    let mut builder = ModelBuilder::new();
    let grid = VariableGrid::allocate(
        builder.model_mut(),
        problem.num_employees(),
        problem.num_shifts(),
        problem.num_days,
    );

    let mask = options
        .restrict_to_requested
        .then(|| eligibility_mask(&grid, &requests, &fixes));
    apply_assignment_structure(&mut builder, &grid, &fixes, mask.as_deref());
    add_run_length_rules(&mut builder, &grid, &problem.run_length_rules);
    add_weekly_sum_rules(&mut builder, &grid, &problem.weekly_sum_rules);
    add_transition_penalties(&mut builder, &grid, &problem.transition_penalties);
    let coverage_cells = match &problem.coverage {
        Some(coverage) => add_coverage_rules(&mut builder, &grid, coverage),
        None => Vec::new(),
    };
    if let Some(fairness) = &problem.fairness {
        add_fairness_terms(&mut builder, &grid, fairness);
    }
    for request in &requests {
        let detail = if request.is_desired() {
            "granted a requested shift"
        } else {
            "assigned a shift the employee asked to avoid"
        };
        let label = TermLabel::new(RuleKind::Preference, detail)
            .with_employee(request.employee)
            .with_shift(request.shift)
            .with_day(request.day);
        builder.charge_bool(
            grid.var(request.employee, request.shift, request.day),
            request.weight,
            label,
        );
    }

    let (model, terms) = builder.finish();
    info!(
        employees = problem.num_employees(),
        days = problem.num_days,
        variables = model.num_bools(),
        constraints = model.clauses().len() + model.linears().len(),
        "compiled scheduling model"
    );

    let params = SolveParams {
        time_budget: options.time_budget,
        seed: options.seed,
    };
    let outcome = backend.solve(&model, &params);

    let status = match outcome.status {
        SearchStatus::Optimal => SolveStatus::Optimal,
        SearchStatus::Feasible => SolveStatus::Feasible,
        SearchStatus::Infeasible => {
            warn!("hard constraints admit no schedule");
            return Err(EngineError::Infeasible {
                message: "no assignment satisfies the hard constraints".to_string(),
            });
        }
        SearchStatus::Unknown => {
            warn!(budget_secs = options.time_budget.as_secs(), "search inconclusive");
            return Err(EngineError::Infeasible {
                message: format!(
                    "no feasible assignment found within the {} s time budget",
                    options.time_budget.as_secs()
                ),
            });
        }
    };
    let (Some(values), Some(objective)) = (outcome.values, outcome.objective) else {
        return Err(EngineError::Infeasible {
            message: "backend reported success without a solution".to_string(),
        });
    };

    let mut schedule = Schedule::default();
    for (employee, record) in problem.employees.iter().enumerate() {
        let days: Vec<usize> = (0..problem.num_days)
            .map(|day| {
                (0..problem.num_shifts())
                    .find(|&shift| values.bool_value(grid.var(employee, shift, day)))
                    .unwrap_or(OFF_SHIFT)
            })
            .collect();
        schedule.assignments.insert(record.id.clone(), days);
    }

    let mut penalty_totals: BTreeMap<RuleKind, i64> = BTreeMap::new();
    let mut violations = Vec::new();
    for term in &terms {
        let amount = match term.var {
            CostVar::Bool(var) => i64::from(values.bool_value(var)),
            CostVar::Int(var) => values.int_value(var),
        };
        if amount == 0 {
            continue;
        }
        let contribution = term.coeff * amount;
        *penalty_totals.entry(term.label.rule).or_insert(0) += contribution;
        if contribution > 0 {
            violations.push(Violation {
                rule: term.label.rule,
                employee: term
                    .label
                    .employee
                    .map(|e| problem.employees[e].id.clone()),
                shift: term
                    .label
                    .shift
                    .map(|s| problem.shift_types.label(s).to_string()),
                day: term.label.day,
                detail: term.label.detail.clone(),
                penalty: contribution,
            });
        }
    }

    let coverage_gaps: Vec<CoverageGap> = coverage_cells
        .iter()
        .filter_map(|cell| {
            let shortage = values.int_value(cell.shortage);
            (shortage > 0).then(|| CoverageGap {
                day: cell.day,
                shift: problem.shift_types.label(cell.shift).to_string(),
                demand: cell.demand,
                assigned: schedule.assigned_on(cell.day, cell.shift) as i64,
                shortage,
            })
        })
        .collect();

    let wall_time_ms = outcome.wall_time.as_millis() as u64;
    info!(?status, objective, wall_time_ms, "solve finished");

    Ok(SolvedRoster {
        schedule,
        diagnostics: Diagnostics {
            status,
            objective,
            wall_time_ms,
            penalty_totals,
            violations,
            coverage_gaps,
        },
    })
}

/// Merges the prior schedule into the requests/fixes per the policy.
fn fold_prior(
    problem: &SchedulingProblem,
    prior: Option<&Schedule>,
    options: &SolveOptions,
) -> EngineResult<(Vec<ShiftRequest>, Vec<FixedAssignment>)> {
    let mut requests = problem.requests.clone();
    let mut fixes = problem.fixed_assignments.clone();
    let Some(prior) = prior else {
        return Ok((requests, fixes));
    };

    match options.reschedule {
        ReschedulePolicy::Discard => {}
        ReschedulePolicy::Prefer { weight } => {
            for (employee, shift, day) in resolve_prior(problem, prior)? {
                if shift != OFF_SHIFT {
                    requests.push(ShiftRequest {
                        employee,
                        shift,
                        day,
                        weight,
                    });
                }
            }
        }
        ReschedulePolicy::Pin => {
            let mut fixed_by_cell: HashMap<(usize, usize), usize> = HashMap::new();
            for fix in &problem.fixed_assignments {
                fixed_by_cell.insert((fix.employee, fix.day), fix.shift);
            }
            for (employee, shift, day) in resolve_prior(problem, prior)? {
                match fixed_by_cell.get(&(employee, day)) {
                    Some(&fixed) if fixed != shift => {
                        return Err(EngineError::PriorAssignmentConflict {
                            employee: problem.employees[employee].id.clone(),
                            day,
                            shift,
                        });
                    }
                    Some(_) => {}
                    None => {
                        let desired = problem.requests.iter().any(|r| {
                            r.employee == employee
                                && r.shift == shift
                                && r.day == day
                                && r.is_desired()
                        });
                        if shift != OFF_SHIFT && !desired {
                            return Err(EngineError::PriorAssignmentConflict {
                                employee: problem.employees[employee].id.clone(),
                                day,
                                shift,
                            });
                        }
                        fixes.push(FixedAssignment {
                            employee,
                            shift,
                            day,
                        });
                    }
                }
            }
        }
    }
    Ok((requests, fixes))
}

/// Resolves a prior schedule's ids into grid triples, validating ranges.
fn resolve_prior(
    problem: &SchedulingProblem,
    prior: &Schedule,
) -> EngineResult<Vec<(usize, usize, usize)>> {
    let mut resolved = Vec::new();
    for (id, days) in &prior.assignments {
        let employee = problem
            .employees
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| EngineError::UnknownEmployee { id: id.clone() })?;
        for (day, &shift) in days.iter().enumerate() {
            if day >= problem.num_days {
                return Err(EngineError::DayOutOfRange {
                    day,
                    num_days: problem.num_days,
                    context: "prior schedule".to_string(),
                });
            }
            if shift >= problem.num_shifts() {
                return Err(EngineError::ShiftOutOfRange {
                    shift,
                    num_shifts: problem.num_shifts(),
                    context: "prior schedule".to_string(),
                });
            }
            resolved.push((employee, shift, day));
        }
    }
    Ok(resolved)
}

/// Marks the grid cells a working shift may occupy: fixed or desired.
fn eligibility_mask(
    grid: &VariableGrid,
    requests: &[ShiftRequest],
    fixes: &[FixedAssignment],
) -> Vec<bool> {
    let mut eligible = vec![false; grid.len()];
    for request in requests {
        if request.is_desired() && request.shift != OFF_SHIFT {
            eligible[grid.index(request.employee, request.shift, request.day)] = true;
        }
    }
    for fix in fixes {
        eligible[grid.index(fix.employee, fix.shift, fix.day)] = true;
    }
    eligible
}
