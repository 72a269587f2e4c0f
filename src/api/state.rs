//! Application state for the Shift Rostering Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::SolverSettings;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// such as the loaded solver settings.
#[derive(Clone)]
pub struct AppState {
    /// The loaded solver settings.
    settings: Arc<SolverSettings>,
}

impl AppState {
    /// Creates a new application state with the given solver settings.
    pub fn new(settings: SolverSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Returns a reference to the solver settings.
    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }
}
