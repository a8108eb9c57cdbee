//! Solver configuration.
//!
//! Controls the time budget, objective weights, and objective mode.
//! Configuration can be built in code or loaded from TOML:
//!
//! ```
//! use u_shift::config::{ObjectiveMode, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     time_limit_seconds = 5
//!     objective_mode = "lexicographic"
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(5));
//! assert_eq!(config.objective_mode, ObjectiveMode::Lexicographic);
//! assert_eq!(config.understaff_weight, 1000);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SLOT_COUNT;

/// Largest accepted `understaff_weight`.
///
/// With needs capped at [`crate::validation::MAX_NEED`] this keeps every
/// objective value inside the solver's 32-bit integer domains.
pub const MAX_UNDERSTAFF_WEIGHT: i64 = 10_000;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How the two objective terms are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    /// One pass over `understaff_weight·Σu + fairness_weight·t`.
    #[default]
    Weighted,
    /// Two passes: minimize Σu, fix it, then minimize `t`.
    Lexicographic,
}

/// Main solver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Wall-clock budget per solve pass.
    pub time_limit_seconds: u64,
    /// Objective coefficient of each unit of understaffing.
    pub understaff_weight: i64,
    /// Objective coefficient of the fairness ceiling.
    pub fairness_weight: i64,
    /// Weighted sum or two-pass lexicographic.
    pub objective_mode: ObjectiveMode,
    /// Upper bound of every understaffing variable.
    /// `None` uses each slot's own need, which keeps the model feasible.
    pub understaff_upper_bound: Option<u32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 10,
            understaff_weight: 1000,
            fairness_weight: 10,
            objective_mode: ObjectiveMode::Weighted,
            understaff_upper_bound: None,
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML,
    /// or fails [`SolverConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the time budget.
    pub fn with_time_limit_seconds(mut self, seconds: u64) -> Self {
        self.time_limit_seconds = seconds;
        self
    }

    /// Sets the objective weights.
    pub fn with_weights(mut self, understaff: i64, fairness: i64) -> Self {
        self.understaff_weight = understaff;
        self.fairness_weight = fairness;
        self
    }

    /// Sets the objective mode.
    pub fn with_objective_mode(mut self, mode: ObjectiveMode) -> Self {
        self.objective_mode = mode;
        self
    }

    /// Caps every understaffing variable.
    pub fn with_understaff_upper_bound(mut self, bound: u32) -> Self {
        self.understaff_upper_bound = Some(bound);
        self
    }

    /// Time budget as a `Duration`.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_seconds)
    }

    /// Checks the configuration for internal consistency.
    ///
    /// One unit of understaffing must outweigh the full fairness range
    /// (`fairness_weight × 14`), otherwise the solver could trade coverage
    /// for a flatter workload.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_seconds == 0 {
            return Err(ConfigError::Invalid(
                "time_limit_seconds must be positive".into(),
            ));
        }
        if self.understaff_weight <= 0 || self.fairness_weight < 0 {
            return Err(ConfigError::Invalid(format!(
                "understaff_weight must be positive and fairness_weight non-negative \
                 (understaff {}, fairness {})",
                self.understaff_weight, self.fairness_weight
            )));
        }
        if self.understaff_weight > MAX_UNDERSTAFF_WEIGHT {
            return Err(ConfigError::Invalid(format!(
                "understaff_weight {} exceeds {}",
                self.understaff_weight, MAX_UNDERSTAFF_WEIGHT
            )));
        }
        let fairness_range = self.fairness_weight.saturating_mul(SLOT_COUNT as i64);
        if self.understaff_weight <= fairness_range {
            return Err(ConfigError::Invalid(format!(
                "understaff_weight {} must exceed fairness_weight × {} = {}",
                self.understaff_weight, SLOT_COUNT, fairness_range
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SolverConfig::default();
        assert_eq!(c.time_limit(), Duration::from_secs(10));
        assert_eq!(c.understaff_weight, 1000);
        assert_eq!(c.fairness_weight, 10);
        assert_eq!(c.objective_mode, ObjectiveMode::Weighted);
        assert_eq!(c.understaff_upper_bound, None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let c = SolverConfig::from_toml_str(
            r#"
            time_limit_seconds = 3
            understaff_weight = 500
            fairness_weight = 1
            objective_mode = "lexicographic"
            understaff_upper_bound = 2
            "#,
        )
        .unwrap();
        assert_eq!(c.time_limit_seconds, 3);
        assert_eq!(c.understaff_weight, 500);
        assert_eq!(c.fairness_weight, 1);
        assert_eq!(c.objective_mode, ObjectiveMode::Lexicographic);
        assert_eq!(c.understaff_upper_bound, Some(2));
    }

    #[test]
    fn test_weight_priority_enforced() {
        // 10 × 14 = 140: a 140:10 split would let fairness outbid one unit of coverage.
        let bad = SolverConfig::new().with_weights(140, 10);
        assert!(matches!(bad.validate(), Err(ConfigError::Invalid(_))));

        let ok = SolverConfig::new().with_weights(141, 10);
        assert!(ok.validate().is_ok());

        let err = SolverConfig::from_toml_str("understaff_weight = 100").unwrap_err();
        assert!(err.to_string().contains("must exceed"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(SolverConfig::new().with_time_limit_seconds(0).validate().is_err());
        assert!(SolverConfig::new().with_weights(0, 0).validate().is_err());
        assert!(SolverConfig::new().with_weights(1000, -1).validate().is_err());
    }

    #[test]
    fn test_zero_fairness_weight_allowed() {
        assert!(SolverConfig::new().with_weights(1, 0).validate().is_ok());
        let err = SolverConfig::new().with_weights(0, 0).validate().unwrap_err();
        assert!(err.to_string().contains("fairness_weight non-negative"));
    }

    #[test]
    fn test_understaff_weight_ceiling() {
        let huge = SolverConfig::new().with_weights(i64::MAX / 2, 10);
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid(_))));
        assert!(SolverConfig::new()
            .with_weights(MAX_UNDERSTAFF_WEIGHT, 10)
            .validate()
            .is_ok());
        assert!(SolverConfig::new()
            .with_weights(MAX_UNDERSTAFF_WEIGHT + 1, 10)
            .validate()
            .is_err());
    }

    #[test]
    fn test_toml_syntax_error() {
        let err = SolverConfig::from_toml_str("time_limit_seconds = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SolverConfig::load("/nonexistent/u-shift/solver.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
