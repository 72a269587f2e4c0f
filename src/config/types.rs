//! Configuration types for the rostering engine.
//!
//! This module contains the strongly-typed settings structure that is
//! deserialized from the YAML configuration file.

use serde::{Deserialize, Serialize};

/// How a new solve treats a previously solved schedule for the horizon.
///
/// Carried as configuration rather than assumed: reruns may ignore prior
/// output, lean toward keeping it, or keep it outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ReschedulePolicy {
    /// Ignore the prior schedule entirely.
    #[default]
    Discard,
    /// Turn each prior assignment into a desire request with this weight.
    Prefer {
        /// Weight injected per kept assignment; negative favors keeping it.
        #[serde(default = "default_prefer_weight")]
        weight: i64,
    },
    /// Turn each prior assignment into a fixed assignment. A pinned working
    /// shift that is neither requested nor explicitly fixed conflicts with
    /// eligibility masking and is rejected before solve.
    Pin,
}

fn default_prefer_weight() -> i64 {
    -2
}

/// Solver settings loaded from `config/solver.yaml`.
///
/// Every field has a default, so a partial (or empty) file works.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SolverSettings {
    /// Wall-clock budget for one solve, in seconds.
    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: u64,
    /// Search seed for backends with randomized strategies.
    #[serde(default)]
    pub seed: u64,
    /// Whether working shifts are confined to fixed or desired cells.
    #[serde(default = "default_true")]
    pub restrict_to_requested: bool,
    /// How a rerun treats a previously solved schedule.
    #[serde(default)]
    pub reschedule: ReschedulePolicy,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_budget_secs: default_time_budget_secs(),
            seed: 0,
            restrict_to_requested: true,
            reschedule: ReschedulePolicy::default(),
        }
    }
}

fn default_time_budget_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_an_empty_document() {
        let settings: SolverSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, SolverSettings::default());
        assert_eq!(settings.time_budget_secs, 10);
        assert!(settings.restrict_to_requested);
        assert_eq!(settings.reschedule, ReschedulePolicy::Discard);
    }

    #[test]
    fn test_parse_full_document() {
        let yaml = "\
time_budget_secs: 3
seed: 42
restrict_to_requested: false
reschedule:
  mode: prefer
  weight: -5
";
        let settings: SolverSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.time_budget_secs, 3);
        assert_eq!(settings.seed, 42);
        assert!(!settings.restrict_to_requested);
        assert_eq!(settings.reschedule, ReschedulePolicy::Prefer { weight: -5 });
    }

    #[test]
    fn test_prefer_weight_defaults_when_omitted() {
        let yaml = "reschedule:\n  mode: prefer\n";
        let settings: SolverSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.reschedule, ReschedulePolicy::Prefer { weight: -2 });
    }

    #[test]
    fn test_pin_mode_parses() {
        let yaml = "reschedule:\n  mode: pin\n";
        let settings: SolverSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.reschedule, ReschedulePolicy::Pin);
    }
}
