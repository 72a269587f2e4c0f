//! Workload fairness.
//!
//! Balances each employee's total count of the designated shift type
//! against the group mean without introducing division: with n employees,
//! `deviation_e = |n * total_e - sum of all totals|` stays integral and is
//! charged per unit, which is equivalent to penalizing absolute deviation
//! from the arithmetic mean.

use crate::models::{FairnessPolicy, RuleKind};

use super::backend::{LinearExpr, Relation};
use super::builder::{ModelBuilder, TermLabel};
use super::grid::VariableGrid;

/// Compiles one scaled-deviation integer per employee.
pub(crate) fn add_fairness_terms(
    builder: &mut ModelBuilder,
    grid: &VariableGrid,
    policy: &FairnessPolicy,
) {
    let num_employees = grid.num_employees();
    if policy.cost == 0 || num_employees < 2 {
        return;
    }
    let scale = num_employees as i64;

    for employee in 0..num_employees {
        let model = builder.model_mut();
        let deviation = model.new_int(0, scale * grid.num_days() as i64);

        // deviation >= +(n * total_e - sum of totals)
        // deviation >= -(n * total_e - sum of totals)
        for sign in [1i64, -1] {
            let mut expr = LinearExpr::new();
            for other in 0..num_employees {
                let coeff = if other == employee { scale - 1 } else { -1 };
                for day in 0..grid.num_days() {
                    expr.add_bool(grid.var(other, policy.shift, day), sign * coeff);
                }
            }
            expr.add_int(deviation, -1);
            model.add_linear(expr, Relation::AtMost, 0);
        }

        builder.charge_int(
            deviation,
            policy.cost,
            TermLabel::new(
                RuleKind::Fairness,
                "workload deviates from the group mean".to_string(),
            )
            .with_employee(employee)
            .with_shift(policy.shift),
        );
    }
}
