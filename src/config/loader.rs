//! Configuration loading functionality.
//!
//! This module reads the YAML solver settings from disk.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::SolverSettings;

/// Loads solver settings from a YAML file.
///
/// # Arguments
///
/// * `path` - Path to the settings file (e.g. "./config/solver.yaml")
///
/// # Returns
///
/// Returns the parsed [`SolverSettings`] on success, or an error if the
/// file is missing or contains invalid YAML.
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::load_settings;
///
/// let settings = load_settings("./config/solver.yaml")?;
/// assert!(settings.time_budget_secs > 0);
/// # Ok::<(), roster_engine::error::EngineError>(())
/// ```
pub fn load_settings<P: AsRef<Path>>(path: P) -> EngineResult<SolverSettings> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}
