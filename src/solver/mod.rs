//! The shift-scheduling optimization core.
//!
//! Domain data flows one way through this module: the variable grid is
//! allocated, each rule family appends its variables, constraints, and
//! labeled objective terms, the composed objective is handed to the
//! optimization backend under a time budget, and the solved values are
//! read back into a schedule plus a diagnostic report. Model construction
//! is deterministic and every solve owns its own grid and model.

mod backend;
mod builder;
mod bundled;
mod coverage;
mod fairness;
mod grid;
mod hard_rules;
mod run_length;
mod solve;
mod transitions;
mod weekly_sums;

pub use backend::{
    BoolVar, DEFAULT_TIME_BUDGET, IntVar, LinearConstraint, LinearExpr, Lit, Model, Relation,
    SearchStatus, SolveOutcome, SolveParams, SolverBackend, VarValues,
};
pub use bundled::BundledSolver;
pub use grid::VariableGrid;
pub use solve::{SolveOptions, solve_schedule, solve_schedule_with};
