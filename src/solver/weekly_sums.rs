//! Weekly-total rules.
//!
//! The six-tuple bands applied to the count of one shift type inside each
//! full 7-day week. Hard bounds live in the domain of a week-total integer
//! tied by equality to the week's booleans; soft bounds charge linear
//! shortfall/excess integers per unit. Trailing partial weeks generate
//! nothing.

use crate::models::{RuleKind, WeeklySumRule};

use super::backend::{BoolVar, LinearExpr, Relation};
use super::builder::{ModelBuilder, TermLabel};
use super::grid::VariableGrid;

/// Days per scheduling week.
const WEEK: usize = 7;

/// Compiles every weekly-sum rule for every employee and full week.
pub(crate) fn add_weekly_sum_rules(
    builder: &mut ModelBuilder,
    grid: &VariableGrid,
    rules: &[WeeklySumRule],
) {
    let num_weeks = grid.num_days() / WEEK;
    for rule in rules {
        for employee in 0..grid.num_employees() {
            for week in 0..num_weeks {
                let works: Vec<BoolVar> = (0..WEEK)
                    .map(|day| grid.var(employee, rule.shift, week * WEEK + day))
                    .collect();
                apply_weekly_band(builder, &works, rule, employee, week);
            }
        }
    }
}

/// Applies one rule to the booleans of one employee's week.
pub(crate) fn apply_weekly_band(
    builder: &mut ModelBuilder,
    works: &[BoolVar],
    rule: &WeeklySumRule,
    employee: usize,
    week: usize,
) {
    let week_len = works.len() as i64;
    let model = builder.model_mut();

    // the total's domain carries the hard bounds
    let total = model.new_int(rule.hard_min as i64, rule.hard_max as i64);
    let mut tie = LinearExpr::sum_of(works.iter().copied());
    tie.add_int(total, -1);
    model.add_linear(tie, Relation::EqualTo, 0);

    if rule.soft_min > rule.hard_min && rule.min_cost > 0 {
        let shortfall = model.new_int(0, rule.soft_min as i64);
        // shortfall >= soft_min - total
        let mut expr = LinearExpr::new();
        expr.add_int(total, 1);
        expr.add_int(shortfall, 1);
        model.add_linear(expr, Relation::AtLeast, rule.soft_min as i64);
        let label = TermLabel::new(
            RuleKind::WeeklySum,
            format!("weekly total below the preferred minimum of {}", rule.soft_min),
        )
        .with_employee(employee)
        .with_shift(rule.shift)
        .with_day(week * WEEK);
        builder.charge_int(shortfall, rule.min_cost, label);
    }

    if rule.soft_max < rule.hard_max && rule.max_cost > 0 {
        let model = builder.model_mut();
        let excess = model.new_int(0, week_len);
        // excess >= total - soft_max
        let mut expr = LinearExpr::new();
        expr.add_int(total, 1);
        expr.add_int(excess, -1);
        model.add_linear(expr, Relation::AtMost, rule.soft_max as i64);
        let label = TermLabel::new(
            RuleKind::WeeklySum,
            format!("weekly total above the preferred maximum of {}", rule.soft_max),
        )
        .with_employee(employee)
        .with_shift(rule.shift)
        .with_day(week * WEEK);
        builder.charge_int(excess, rule.max_cost, label);
    }
}
