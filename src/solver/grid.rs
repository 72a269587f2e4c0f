//! Decision variable grid.
//!
//! One boolean "is-assigned" variable per (employee, shift-type, day)
//! triple, allocated densely as an index-addressed flat arena: O(1) lookup,
//! no per-cell allocation, and no two triples ever alias one variable.

use super::backend::{BoolVar, Model};

/// The dense `work[employee, shift, day]` variable arena for one solve.
///
/// Every solve owns its own grid; variables never leak across solves.
#[derive(Debug)]
pub struct VariableGrid {
    num_employees: usize,
    num_shifts: usize,
    num_days: usize,
    vars: Vec<BoolVar>,
}

impl VariableGrid {
    /// Allocates one boolean per triple, in employee-major order.
    pub fn allocate(
        model: &mut Model,
        num_employees: usize,
        num_shifts: usize,
        num_days: usize,
    ) -> Self {
        let mut vars = Vec::with_capacity(num_employees * num_shifts * num_days);
        for _ in 0..num_employees * num_shifts * num_days {
            vars.push(model.new_bool());
        }
        Self {
            num_employees,
            num_shifts,
            num_days,
            vars,
        }
    }

    /// The variable deciding whether `employee` works `shift` on `day`.
    pub fn var(&self, employee: usize, shift: usize, day: usize) -> BoolVar {
        self.vars[self.index(employee, shift, day)]
    }

    /// The horizon-ordered variables of one employee for one shift type.
    pub fn employee_days(&self, employee: usize, shift: usize) -> Vec<BoolVar> {
        (0..self.num_days)
            .map(|day| self.var(employee, shift, day))
            .collect()
    }

    /// Flat arena index of a triple; also used for eligibility masks.
    pub fn index(&self, employee: usize, shift: usize, day: usize) -> usize {
        debug_assert!(employee < self.num_employees);
        debug_assert!(shift < self.num_shifts);
        debug_assert!(day < self.num_days);
        (employee * self.num_shifts + shift) * self.num_days + day
    }

    /// Number of employees the grid spans.
    pub fn num_employees(&self) -> usize {
        self.num_employees
    }

    /// Number of shift types the grid spans.
    pub fn num_shifts(&self) -> usize {
        self.num_shifts
    }

    /// Number of days the grid spans.
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Total number of cells in the arena.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True when the grid spans no cells at all.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
