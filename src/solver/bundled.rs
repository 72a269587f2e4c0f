//! Bundled optimization engine.
//!
//! A deterministic depth-first branch-and-bound search over the boolean
//! variables of a [`Model`]: unit propagation on clauses, bound-consistency
//! forcing on linear constraints, objective lower-bound pruning against the
//! incumbent, and leaf-time resolution of the integer variables by interval
//! tightening. Identical input and budget always reproduce the same
//! objective value; search order is a pure function of the model.

use std::time::Instant;

use super::backend::{
    LinearConstraint, LinearExpr, Model, Relation, SearchStatus, SolveOutcome, SolveParams,
    SolverBackend, VarValues,
};

/// How many search nodes pass between wall-clock deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 64;

/// The bundled deterministic branch-and-bound solver.
///
/// # Example
///
/// ```
/// use roster_engine::solver::{BundledSolver, Model, SolveParams, SolverBackend, SearchStatus};
///
/// let mut model = Model::new();
/// let a = model.new_bool();
/// let b = model.new_bool();
/// model.add_exactly_one([a, b]);
/// let mut objective = roster_engine::solver::LinearExpr::new();
/// objective.add_bool(a, 5);
/// objective.add_bool(b, 2);
/// model.set_objective(objective);
///
/// let outcome = BundledSolver::new().solve(&model, &SolveParams::default());
/// assert_eq!(outcome.status, SearchStatus::Optimal);
/// assert_eq!(outcome.objective, Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BundledSolver;

impl BundledSolver {
    /// Creates a solver with default settings.
    pub fn new() -> Self {
        Self
    }
}

impl SolverBackend for BundledSolver {
    fn solve(&self, model: &Model, params: &SolveParams) -> SolveOutcome {
        let started = Instant::now();
        let mut search = Search::new(model, started + params.time_budget);
        let status = search.run();
        SolveOutcome {
            status,
            values: search.best_values,
            objective: search.best_objective,
            wall_time: started.elapsed(),
        }
    }
}

struct Search<'a> {
    model: &'a Model,
    assignment: Vec<Option<bool>>,
    trail: Vec<usize>,
    obj_bool_coeffs: Vec<i64>,
    obj_int_coeffs: Vec<i64>,
    best_objective: Option<i64>,
    best_values: Option<VarValues>,
    deadline: Instant,
    nodes: u64,
    timed_out: bool,
}

impl<'a> Search<'a> {
    fn new(model: &'a Model, deadline: Instant) -> Self {
        let mut obj_bool_coeffs = vec![0i64; model.num_bools()];
        for &(var, coeff) in model.objective().bool_terms() {
            obj_bool_coeffs[var.index()] += coeff;
        }
        let mut obj_int_coeffs = vec![0i64; model.num_ints()];
        for &(var, coeff) in model.objective().int_terms() {
            obj_int_coeffs[var.index()] += coeff;
        }
        Self {
            model,
            assignment: vec![None; model.num_bools()],
            trail: Vec::new(),
            obj_bool_coeffs,
            obj_int_coeffs,
            best_objective: None,
            best_values: None,
            deadline,
            nodes: 0,
            timed_out: false,
        }
    }

    fn run(&mut self) -> SearchStatus {
        if self.propagate() {
            self.explore();
        }
        match (self.best_objective.is_some(), self.timed_out) {
            (true, false) => SearchStatus::Optimal,
            (true, true) => SearchStatus::Feasible,
            (false, false) => SearchStatus::Infeasible,
            (false, true) => SearchStatus::Unknown,
        }
    }

    fn explore(&mut self) {
        if self.timed_out {
            return;
        }
        self.nodes += 1;
        if self.nodes % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }
        let model = self.model;
        if let Some(best) = self.best_objective {
            let (lower, _) = self.expr_bounds(model.objective());
            if lower >= best {
                return;
            }
        }
        let Some(var) = self.assignment.iter().position(Option::is_none) else {
            self.record_leaf();
            return;
        };
        // branch toward the objective-preferred value first
        let preferred = self.obj_bool_coeffs[var] < 0;
        for value in [preferred, !preferred] {
            let mark = self.trail.len();
            self.push(var, value);
            if self.propagate() {
                self.explore();
            }
            self.undo_to(mark);
            if self.timed_out {
                return;
            }
        }
    }

    fn push(&mut self, var: usize, value: bool) {
        self.assignment[var] = Some(value);
        self.trail.push(var);
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let var = self.trail.pop().unwrap_or_default();
            self.assignment[var] = None;
        }
    }

    /// Propagates clauses and linear constraints to a fixpoint.
    ///
    /// Returns false on conflict; any literals forced along the way stay on
    /// the trail for the caller to undo.
    fn propagate(&mut self) -> bool {
        let model = self.model;
        loop {
            let mut changed = false;
            for clause in model.clauses() {
                let mut satisfied = false;
                let mut open = 0usize;
                let mut last_open = None;
                for lit in clause {
                    match self.assignment[lit.var().index()] {
                        Some(value) if value == lit.value() => {
                            satisfied = true;
                            break;
                        }
                        Some(_) => {}
                        None => {
                            open += 1;
                            last_open = Some(*lit);
                        }
                    }
                }
                if satisfied {
                    continue;
                }
                match (open, last_open) {
                    (0, _) => return false,
                    (1, Some(lit)) => {
                        self.push(lit.var().index(), lit.value());
                        changed = true;
                    }
                    _ => {}
                }
            }
            for constraint in model.linears() {
                match self.force_linear(constraint) {
                    None => return false,
                    Some(forced) => changed |= forced,
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Bound-consistency pass over one linear constraint.
    ///
    /// Returns None on conflict, otherwise whether any boolean was forced.
    fn force_linear(&mut self, constraint: &LinearConstraint) -> Option<bool> {
        let mut changed = false;
        loop {
            let (lo, hi) = self.expr_bounds(constraint.expr());
            let rhs = constraint.rhs();
            let feasible = match constraint.relation() {
                Relation::AtMost => lo <= rhs,
                Relation::AtLeast => hi >= rhs,
                Relation::EqualTo => lo <= rhs && hi >= rhs,
            };
            if !feasible {
                return None;
            }
            let check_upper = matches!(constraint.relation(), Relation::AtMost | Relation::EqualTo);
            let check_lower =
                matches!(constraint.relation(), Relation::AtLeast | Relation::EqualTo);
            let mut forced = false;
            for &(var, coeff) in constraint.expr().bool_terms() {
                if self.assignment[var.index()].is_some() {
                    continue;
                }
                // bounds of the expression with this term excluded
                let lo_rest = lo - coeff.min(0);
                let hi_rest = hi - coeff.max(0);
                let possible = |value: bool| {
                    let contribution = if value { coeff } else { 0 };
                    let upper_ok = !check_upper || lo_rest + contribution <= rhs;
                    let lower_ok = !check_lower || hi_rest + contribution >= rhs;
                    upper_ok && lower_ok
                };
                match (possible(false), possible(true)) {
                    (false, false) => return None,
                    (true, false) => {
                        self.push(var.index(), false);
                        forced = true;
                    }
                    (false, true) => {
                        self.push(var.index(), true);
                        forced = true;
                    }
                    (true, true) => {}
                }
                if forced {
                    break;
                }
            }
            if !forced {
                return Some(changed);
            }
            changed = true;
        }
    }

    /// Minimum and maximum value of an expression under the current partial
    /// assignment, with integer variables at their declared bounds.
    fn expr_bounds(&self, expr: &LinearExpr) -> (i64, i64) {
        let mut lo = expr.constant();
        let mut hi = expr.constant();
        for &(var, coeff) in expr.bool_terms() {
            match self.assignment[var.index()] {
                Some(true) => {
                    lo += coeff;
                    hi += coeff;
                }
                Some(false) => {}
                None => {
                    lo += coeff.min(0);
                    hi += coeff.max(0);
                }
            }
        }
        for &(var, coeff) in expr.int_terms() {
            let (dom_lo, dom_hi) = self.model.int_bounds()[var.index()];
            if coeff >= 0 {
                lo += coeff * dom_lo;
                hi += coeff * dom_hi;
            } else {
                lo += coeff * dom_hi;
                hi += coeff * dom_lo;
            }
        }
        (lo, hi)
    }

    /// All booleans are assigned: resolve the integers and record the leaf
    /// if it beats the incumbent.
    fn record_leaf(&mut self) {
        let Some(ints) = self.resolve_ints() else {
            return;
        };
        let mut objective = self.model.objective().constant();
        for &(var, coeff) in self.model.objective().bool_terms() {
            if self.assignment[var.index()] == Some(true) {
                objective += coeff;
            }
        }
        for &(var, coeff) in self.model.objective().int_terms() {
            objective += coeff * ints[var.index()];
        }
        if self.best_objective.is_none_or(|best| objective < best) {
            self.best_objective = Some(objective);
            self.best_values = Some(VarValues {
                bools: self
                    .assignment
                    .iter()
                    .map(|value| value.unwrap_or(false))
                    .collect(),
                ints,
            });
        }
    }

    /// Determines integer values for the complete boolean assignment:
    /// interval tightening to a fixpoint, then each variable takes its
    /// cost-preferred bound, re-tightening after each choice.
    fn resolve_ints(&self) -> Option<Vec<i64>> {
        let model = self.model;
        let mut domains: Vec<(i64, i64)> = model.int_bounds().to_vec();
        if !self.tighten(&mut domains) {
            return None;
        }
        for index in 0..domains.len() {
            let value = if self.obj_int_coeffs[index] >= 0 {
                domains[index].0
            } else {
                domains[index].1
            };
            domains[index] = (value, value);
            if !self.tighten(&mut domains) {
                return None;
            }
        }
        let values: Vec<i64> = domains.iter().map(|&(lo, _)| lo).collect();
        for constraint in model.linears() {
            if constraint.expr().int_terms().is_empty() {
                continue;
            }
            let total = self.exact_value(constraint.expr(), &values);
            let holds = match constraint.relation() {
                Relation::EqualTo => total == constraint.rhs(),
                Relation::AtMost => total <= constraint.rhs(),
                Relation::AtLeast => total >= constraint.rhs(),
            };
            if !holds {
                return None;
            }
        }
        Some(values)
    }

    fn tighten(&self, domains: &mut [(i64, i64)]) -> bool {
        let model = self.model;
        loop {
            let mut changed = false;
            for constraint in model.linears() {
                let int_terms = constraint.expr().int_terms();
                if int_terms.is_empty() {
                    continue;
                }
                let mut fixed = constraint.expr().constant();
                for &(var, coeff) in constraint.expr().bool_terms() {
                    if self.assignment[var.index()] == Some(true) {
                        fixed += coeff;
                    }
                }
                for (position, &(var, coeff)) in int_terms.iter().enumerate() {
                    let mut others_lo = 0i64;
                    let mut others_hi = 0i64;
                    for (other, &(other_var, other_coeff)) in int_terms.iter().enumerate() {
                        if other == position {
                            continue;
                        }
                        let (dom_lo, dom_hi) = domains[other_var.index()];
                        if other_coeff >= 0 {
                            others_lo += other_coeff * dom_lo;
                            others_hi += other_coeff * dom_hi;
                        } else {
                            others_lo += other_coeff * dom_hi;
                            others_hi += other_coeff * dom_lo;
                        }
                    }
                    // support-based bounds on coeff * var
                    let mut term_lo = i64::MIN;
                    let mut term_hi = i64::MAX;
                    match constraint.relation() {
                        Relation::AtMost => {
                            term_hi = constraint.rhs() - fixed - others_lo;
                        }
                        Relation::AtLeast => {
                            term_lo = constraint.rhs() - fixed - others_hi;
                        }
                        Relation::EqualTo => {
                            term_hi = constraint.rhs() - fixed - others_lo;
                            term_lo = constraint.rhs() - fixed - others_hi;
                        }
                    }
                    let (mut dom_lo, mut dom_hi) = domains[var.index()];
                    if term_hi != i64::MAX {
                        if coeff > 0 {
                            dom_hi = dom_hi.min(div_floor(term_hi, coeff));
                        } else {
                            dom_lo = dom_lo.max(div_ceil(term_hi, coeff));
                        }
                    }
                    if term_lo != i64::MIN {
                        if coeff > 0 {
                            dom_lo = dom_lo.max(div_ceil(term_lo, coeff));
                        } else {
                            dom_hi = dom_hi.min(div_floor(term_lo, coeff));
                        }
                    }
                    if dom_lo > dom_hi {
                        return false;
                    }
                    if (dom_lo, dom_hi) != domains[var.index()] {
                        domains[var.index()] = (dom_lo, dom_hi);
                        changed = true;
                    }
                }
            }
            if !changed {
                return true;
            }
        }
    }

    fn exact_value(&self, expr: &LinearExpr, ints: &[i64]) -> i64 {
        let mut total = expr.constant();
        for &(var, coeff) in expr.bool_terms() {
            if self.assignment[var.index()] == Some(true) {
                total += coeff;
            }
        }
        for &(var, coeff) in expr.int_terms() {
            total += coeff * ints[var.index()];
        }
        total
    }
}

fn div_floor(a: i64, b: i64) -> i64 {
    let quotient = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        quotient - 1
    } else {
        quotient
    }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    let quotient = a / b;
    if a % b != 0 && (a < 0) == (b < 0) {
        quotient + 1
    } else {
        quotient
    }
}
