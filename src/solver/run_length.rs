//! Consecutive-run rules.
//!
//! Bounded-span encoding of the six-tuple run-length bands. Runs shorter
//! than the hard minimum and windows longer than the hard maximum are
//! forbidden by clauses; runs inside the soft band are free; runs between a
//! hard and a soft bound trip a reified violation indicator whose cost
//! grows with the distance to the soft bound. Windows are generated only
//! while they fit inside the horizon; nothing wraps around the schedule
//! boundary.

use crate::models::{RuleKind, RunLengthRule};

use super::backend::{BoolVar, Lit};
use super::builder::{ModelBuilder, TermLabel};
use super::grid::VariableGrid;

/// Compiles every run-length rule for every employee.
pub(crate) fn add_run_length_rules(
    builder: &mut ModelBuilder,
    grid: &VariableGrid,
    rules: &[RunLengthRule],
) {
    for rule in rules {
        for employee in 0..grid.num_employees() {
            let works = grid.employee_days(employee, rule.shift);
            apply_run_band(builder, &works, rule, employee);
        }
    }
}

/// Applies one rule to one employee's horizon-ordered assignment booleans.
pub(crate) fn apply_run_band(
    builder: &mut ModelBuilder,
    works: &[BoolVar],
    rule: &RunLengthRule,
    employee: usize,
) {
    let horizon = works.len();

    // runs shorter than hard_min can never occur
    for length in 1..rule.hard_min {
        if length > horizon {
            break;
        }
        for start in 0..=(horizon - length) {
            let clause = negated_bounded_span(works, start, length);
            builder.model_mut().add_clause(clause);
        }
    }

    // runs below soft_min are charged per day of deficit
    if rule.min_cost > 0 {
        for length in rule.hard_min.max(1)..rule.soft_min {
            if length > horizon {
                break;
            }
            let cost = rule.min_cost * (rule.soft_min - length) as i64;
            for start in 0..=(horizon - length) {
                let clause = negated_bounded_span(works, start, length);
                let label = TermLabel::new(
                    RuleKind::RunLength,
                    format!(
                        "run of {} days is below the preferred minimum of {}",
                        length, rule.soft_min
                    ),
                )
                .with_employee(employee)
                .with_shift(rule.shift)
                .with_day(start);
                builder.penalized_clause(clause, cost, label);
            }
        }
    }

    // runs above soft_max are charged per day of excess
    if rule.max_cost > 0 {
        for length in (rule.soft_max + 1)..=rule.hard_max {
            if length > horizon {
                break;
            }
            let cost = rule.max_cost * (length - rule.soft_max) as i64;
            for start in 0..=(horizon - length) {
                let clause = negated_bounded_span(works, start, length);
                let label = TermLabel::new(
                    RuleKind::RunLength,
                    format!(
                        "run of {} days exceeds the preferred maximum of {}",
                        length, rule.soft_max
                    ),
                )
                .with_employee(employee)
                .with_shift(rule.shift)
                .with_day(start);
                builder.penalized_clause(clause, cost, label);
            }
        }
    }

    // no window of hard_max + 1 consecutive assignments anywhere
    if horizon > rule.hard_max {
        for start in 0..(horizon - rule.hard_max) {
            let clause: Vec<Lit> = works[start..=start + rule.hard_max]
                .iter()
                .map(|var| var.is_false())
                .collect();
            builder.model_mut().add_clause(clause);
        }
    }
}

/// Clause forbidding the exact bounded span `works[start..start + length]`.
///
/// The span is bounded: the day before and the day after (when they exist)
/// must be unassigned for the clause to bite, so a maximal run of some
/// other length never triggers it.
fn negated_bounded_span(works: &[BoolVar], start: usize, length: usize) -> Vec<Lit> {
    let mut clause = Vec::with_capacity(length + 2);
    if start > 0 {
        clause.push(works[start - 1].is_true());
    }
    for var in &works[start..start + length] {
        clause.push(var.is_false());
    }
    if start + length < works.len() {
        clause.push(works[start + length].is_true());
    }
    clause
}
