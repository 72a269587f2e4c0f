//! Day-to-day transition rules.
//!
//! For every penalty, employee, and adjacent day pair: a zero-cost penalty
//! posts the hard clause forbidding the sequence; a positive cost reifies a
//! violation indicator onto the same clause, so the sequence stays allowed
//! but charged.

use crate::models::{RuleKind, TransitionPenalty};

use super::builder::{ModelBuilder, TermLabel};
use super::grid::VariableGrid;

/// Compiles every transition penalty over every adjacent day pair.
pub(crate) fn add_transition_penalties(
    builder: &mut ModelBuilder,
    grid: &VariableGrid,
    penalties: &[TransitionPenalty],
) {
    for penalty in penalties {
        for employee in 0..grid.num_employees() {
            for day in 0..grid.num_days().saturating_sub(1) {
                let clause = vec![
                    grid.var(employee, penalty.from_shift, day).is_false(),
                    grid.var(employee, penalty.to_shift, day + 1).is_false(),
                ];
                if penalty.cost == 0 {
                    builder.model_mut().add_clause(clause);
                } else {
                    let label = TermLabel::new(
                        RuleKind::Transition,
                        format!(
                            "worked shift {} into shift {} on the next day",
                            penalty.from_shift, penalty.to_shift
                        ),
                    )
                    .with_employee(employee)
                    .with_shift(penalty.from_shift)
                    .with_day(day);
                    builder.penalized_clause(clause, penalty.cost, label);
                }
            }
        }
    }
}
