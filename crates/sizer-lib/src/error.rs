//! Error kinds for a planning run
//!
//! Every error aborts the current run; nothing is retried because planning
//! is a deterministic function of its inputs.

use thiserror::Error;

/// Errors raised by the sizing model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The caller supplied a value the model cannot plan for
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The performance profile violates one of its invariants
    #[error("invalid performance profile: {0}")]
    Configuration(String),
}

impl PlanError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Short label used in logs, metrics and HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::InvalidInput(_) => "invalid_input",
            PlanError::Configuration(_) => "configuration",
        }
    }
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;
