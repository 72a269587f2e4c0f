//! Objective composer.
//!
//! Wraps the backend [`Model`] and collects every weighted penalty term the
//! rule compilers produce, labeled with its rule family and
//! employee/shift/day context so the diagnostic report can be rebuilt from
//! the solved values. Also hosts the one shared implementation of the
//! recurring "violation indicator reified onto a clause" pattern.

use crate::models::RuleKind;

use super::backend::{BoolVar, IntVar, LinearExpr, Lit, Model};

/// Context attached to one objective term for diagnostics.
#[derive(Debug, Clone)]
pub(crate) struct TermLabel {
    /// The rule family the term belongs to.
    pub rule: RuleKind,
    /// Employee index, when the term is employee-scoped.
    pub employee: Option<usize>,
    /// Shift-type index, when the term is shift-scoped.
    pub shift: Option<usize>,
    /// First day concerned, when the term is day-scoped.
    pub day: Option<usize>,
    /// Human-readable description of what firing means.
    pub detail: String,
}

impl TermLabel {
    /// A label with no employee/shift/day context yet.
    pub fn new(rule: RuleKind, detail: impl Into<String>) -> Self {
        Self {
            rule,
            employee: None,
            shift: None,
            day: None,
            detail: detail.into(),
        }
    }

    pub fn with_employee(mut self, employee: usize) -> Self {
        self.employee = Some(employee);
        self
    }

    pub fn with_shift(mut self, shift: usize) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn with_day(mut self, day: usize) -> Self {
        self.day = Some(day);
        self
    }
}

/// The variable a penalty term charges.
#[derive(Debug, Clone, Copy)]
pub(crate) enum CostVar {
    /// A boolean indicator: charged fully when true.
    Bool(BoolVar),
    /// An integer amount: charged per unit.
    Int(IntVar),
}

/// One labeled, weighted objective term.
#[derive(Debug, Clone)]
pub(crate) struct PenaltyTerm {
    pub var: CostVar,
    pub coeff: i64,
    pub label: TermLabel,
}

/// Accumulates a model and its labeled objective terms.
#[derive(Debug, Default)]
pub(crate) struct ModelBuilder {
    model: Model,
    terms: Vec<PenaltyTerm>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Registers a weighted boolean objective term.
    pub fn charge_bool(&mut self, var: BoolVar, coeff: i64, label: TermLabel) {
        if coeff != 0 {
            self.terms.push(PenaltyTerm {
                var: CostVar::Bool(var),
                coeff,
                label,
            });
        }
    }

    /// Registers a per-unit integer objective term.
    pub fn charge_int(&mut self, var: IntVar, coeff: i64, label: TermLabel) {
        if coeff != 0 {
            self.terms.push(PenaltyTerm {
                var: CostVar::Int(var),
                coeff,
                label,
            });
        }
    }

    /// Reifies a violation indicator onto a clause and charges it.
    ///
    /// The indicator is appended to the clause, so whenever every other
    /// literal is falsified the indicator must hold and its cost is paid;
    /// the same pattern serves run-length spans and transitions.
    pub fn penalized_clause(&mut self, mut clause: Vec<Lit>, cost: i64, label: TermLabel) {
        let indicator = self.model.new_bool();
        clause.push(indicator.is_true());
        self.model.add_clause(clause);
        self.charge_bool(indicator, cost, label);
    }

    /// Assembles the objective from the registered terms and returns the
    /// finished model alongside them.
    pub fn finish(mut self) -> (Model, Vec<PenaltyTerm>) {
        let mut objective = LinearExpr::new();
        for term in &self.terms {
            match term.var {
                CostVar::Bool(var) => objective.add_bool(var, term.coeff),
                CostVar::Int(var) => objective.add_int(var, term.coeff),
            }
        }
        self.model.set_objective(objective);
        (self.model, self.terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::backend::{SearchStatus, SolveParams, SolverBackend};
    use crate::solver::bundled::BundledSolver;

    fn label(detail: &str) -> TermLabel {
        TermLabel {
            rule: RuleKind::Transition,
            employee: Some(0),
            shift: None,
            day: None,
            detail: detail.to_string(),
        }
    }

    #[test]
    fn test_zero_cost_terms_are_not_registered() {
        let mut builder = ModelBuilder::new();
        let var = builder.model_mut().new_bool();
        builder.charge_bool(var, 0, label("free"));
        let (_, terms) = builder.finish();
        assert!(terms.is_empty());
    }

    #[test]
    fn test_penalized_clause_charges_only_when_fired() {
        let mut builder = ModelBuilder::new();
        let a = builder.model_mut().new_bool();
        let b = builder.model_mut().new_bool();
        builder.model_mut().fix_true(a);
        builder.model_mut().fix_true(b);
        builder.penalized_clause(vec![a.is_false(), b.is_false()], 9, label("a then b"));
        let (model, terms) = builder.finish();
        assert_eq!(terms.len(), 1);

        let outcome = BundledSolver::new().solve(&model, &SolveParams::default());
        assert_eq!(outcome.status, SearchStatus::Optimal);
        assert_eq!(outcome.objective, Some(9));
    }

    #[test]
    fn test_penalized_clause_is_free_when_avoidable() {
        let mut builder = ModelBuilder::new();
        let a = builder.model_mut().new_bool();
        let b = builder.model_mut().new_bool();
        builder.model_mut().fix_true(a);
        builder.penalized_clause(vec![a.is_false(), b.is_false()], 9, label("a then b"));
        let (model, _) = builder.finish();

        let outcome = BundledSolver::new().solve(&model, &SolveParams::default());
        assert_eq!(outcome.objective, Some(0));
    }
}
