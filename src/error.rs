//! Crate error type.
//!
//! Only structural problems are errors. A solve that ends without a usable
//! assignment (infeasible or unknown) is reported as `Ok(None)` by
//! [`crate::solve_schedule`].

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::validation::ValidationError;

/// Errors surfaced before the solver runs.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The request failed validation.
    #[error("invalid rostering request: {0}")]
    InvalidInput(ValidationErrors),

    /// The solver configuration is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Every validation problem found in a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// The individual problems.
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ScheduleError::InvalidInput(ValidationErrors(errors))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;
