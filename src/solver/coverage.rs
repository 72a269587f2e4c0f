//! Coverage rules.
//!
//! Per working shift type and day, the staffing equality against the
//! weekly-cyclic demand template: a shortage integer absorbs any deficit at
//! a per-unit cost, and an excess integer admits staffing above the floor
//! only when the shift type prices it. Cells with zero demand generate
//! nothing at all.

use crate::models::{CoverageCalendar, OFF_SHIFT, RuleKind};

use super::backend::{IntVar, LinearExpr, Relation};
use super::builder::{ModelBuilder, TermLabel};
use super::grid::VariableGrid;

/// One generated coverage cell, kept for the diagnostics report.
#[derive(Debug, Clone)]
pub(crate) struct CoverageCell {
    pub day: usize,
    pub shift: usize,
    pub demand: i64,
    pub shortage: IntVar,
}

/// Compiles the staffing equalities and returns the generated cells.
pub(crate) fn add_coverage_rules(
    builder: &mut ModelBuilder,
    grid: &VariableGrid,
    coverage: &CoverageCalendar,
) -> Vec<CoverageCell> {
    let num_employees = grid.num_employees() as i64;
    let mut cells = Vec::new();

    for shift in (OFF_SHIFT + 1)..grid.num_shifts() {
        let excess_cost = coverage.excess_cost(shift);
        for day in 0..grid.num_days() {
            let demand = coverage.demand_on(day, shift);
            if demand == 0 {
                continue;
            }

            let model = builder.model_mut();
            let shortage = model.new_int(0, demand);
            let mut staffing =
                LinearExpr::sum_of((0..grid.num_employees()).map(|e| grid.var(e, shift, day)));
            staffing.add_int(shortage, 1);

            let excess = if excess_cost > 0 && num_employees > demand {
                let excess = model.new_int(0, num_employees - demand);
                staffing.add_int(excess, -1);
                Some(excess)
            } else {
                None
            };
            model.add_linear(staffing, Relation::EqualTo, demand);

            builder.charge_int(
                shortage,
                coverage.shortage_cost,
                TermLabel::new(
                    RuleKind::CoverageShortage,
                    format!("staffing below the demand of {}", demand),
                )
                .with_shift(shift)
                .with_day(day),
            );
            if let Some(excess) = excess {
                builder.charge_int(
                    excess,
                    excess_cost,
                    TermLabel::new(
                        RuleKind::CoverageExcess,
                        format!("staffing above the demand of {}", demand),
                    )
                    .with_shift(shift)
                    .with_day(day),
                );
            }

            cells.push(CoverageCell {
                day,
                shift,
                demand,
                shortage,
            });
        }
    }
    cells
}
