//! Configuration for the Shift Rostering Engine.
//!
//! This module provides the solver settings loaded from a YAML file.

mod loader;
mod types;

pub use loader::load_settings;
pub use types::{ReschedulePolicy, SolverSettings};
