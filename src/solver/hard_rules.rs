//! Structural hard rules.
//!
//! Exactly-one-shift-per-day, fixed assignments, and eligibility masking.
//! Exactly-one is the sole structural constraint of the model: it
//! guarantees every employee a defined status (possibly off) on every day.
//! Masking forces every working-shift variable that was neither fixed nor
//! desired to 0, bounding the combinatorial space by expressed intent.

use crate::models::{FixedAssignment, OFF_SHIFT};

use super::builder::ModelBuilder;
use super::grid::VariableGrid;

/// Applies exactly-one, fixes, and the optional eligibility mask.
///
/// `eligible` is indexed like the grid arena and is `None` when masking is
/// disabled; fixed cells are part of the eligible set by construction, so
/// a fix is never contradicted by its own mask.
pub(crate) fn apply_assignment_structure(
    builder: &mut ModelBuilder,
    grid: &VariableGrid,
    fixes: &[FixedAssignment],
    eligible: Option<&[bool]>,
) {
    let model = builder.model_mut();

    for employee in 0..grid.num_employees() {
        for day in 0..grid.num_days() {
            model.add_exactly_one(
                (0..grid.num_shifts()).map(|shift| grid.var(employee, shift, day)),
            );
        }
    }

    for fix in fixes {
        model.fix_true(grid.var(fix.employee, fix.shift, fix.day));
    }

    if let Some(eligible) = eligible {
        for employee in 0..grid.num_employees() {
            for shift in (OFF_SHIFT + 1)..grid.num_shifts() {
                for day in 0..grid.num_days() {
                    if !eligible[grid.index(employee, shift, day)] {
                        model.fix_false(grid.var(employee, shift, day));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::backend::{SearchStatus, SolveParams, SolverBackend};
    use crate::solver::bundled::BundledSolver;

    fn solve_grid(
        fixes: &[FixedAssignment],
        eligible: Option<Vec<bool>>,
        dims: (usize, usize, usize),
    ) -> (SearchStatus, Option<Vec<Vec<usize>>>) {
        let mut builder = ModelBuilder::new();
        let grid = VariableGrid::allocate(builder.model_mut(), dims.0, dims.1, dims.2);
        apply_assignment_structure(&mut builder, &grid, fixes, eligible.as_deref());
        let (model, _) = builder.finish();
        let outcome = BundledSolver::new().solve(&model, &SolveParams::default());

        let assignments = outcome.values.map(|values| {
            (0..dims.0)
                .map(|employee| {
                    (0..dims.2)
                        .map(|day| {
                            (0..dims.1)
                                .find(|&shift| values.bool_value(grid.var(employee, shift, day)))
                                .unwrap_or(OFF_SHIFT)
                        })
                        .collect()
                })
                .collect()
        });
        (outcome.status, assignments)
    }

    #[test]
    fn test_every_day_gets_exactly_one_shift() {
        let (status, assignments) = solve_grid(&[], None, (2, 3, 4));
        assert_eq!(status, SearchStatus::Optimal);
        let assignments = assignments.unwrap();
        for days in &assignments {
            assert_eq!(days.len(), 4);
        }
    }

    #[test]
    fn test_fixed_assignment_is_honored() {
        let fixes = [FixedAssignment {
            employee: 1,
            shift: 2,
            day: 3,
        }];
        let (status, assignments) = solve_grid(&fixes, None, (2, 3, 4));
        assert_eq!(status, SearchStatus::Optimal);
        assert_eq!(assignments.unwrap()[1][3], 2);
    }

    #[test]
    fn test_masking_confines_to_eligible_cells() {
        // employee 0 may work shift 1 only on day 0; everything else is off
        let mut builder = ModelBuilder::new();
        let grid = VariableGrid::allocate(builder.model_mut(), 1, 2, 3);
        let mut eligible = vec![false; grid.len()];
        eligible[grid.index(0, 1, 0)] = true;
        drop(builder);

        let (status, assignments) = solve_grid(&[], Some(eligible), (1, 2, 3));
        assert_eq!(status, SearchStatus::Optimal);
        let days = &assignments.unwrap()[0];
        assert_eq!(days[1], OFF_SHIFT);
        assert_eq!(days[2], OFF_SHIFT);
    }

    #[test]
    fn test_fix_against_mask_is_infeasible() {
        // masking that excludes a fixed cell leaves no consistent assignment;
        // validation upstream reports this before a solve is ever attempted
        let fixes = [FixedAssignment {
            employee: 0,
            shift: 1,
            day: 0,
        }];
        let eligible = vec![false; 6];
        let (status, _) = solve_grid(&fixes, Some(eligible), (1, 2, 3));
        assert_eq!(status, SearchStatus::Infeasible);
    }
}
