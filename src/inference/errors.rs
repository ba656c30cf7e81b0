//! Inference error and warning types
//!
//! Error codes:
//! - ECORISK_CONFIG_ERROR (FATAL)
//! - ECORISK_UNKNOWN_VARIABLE (REJECT)
//! - ECORISK_INVALID_TYPE (REJECT)
//! - ECORISK_OUT_OF_RANGE (REJECT)
//!
//! Input errors are raised before any computation happens. Numerical
//! degeneracies are never errors: they surface as `InferenceWarning`s and
//! the affected output defaults to 0.0.

use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, Severity};

/// Errors surfaced to callers of the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown input variable '{name}'")]
    UnknownVariable { name: String },

    #[error("invalid type for '{variable}': expected a finite number, got {found}")]
    InvalidType { variable: String, found: String },

    #[error("out-of-range value for '{variable}': {value} is outside [{min}, {max}]")]
    OutOfRange {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl EngineError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Config(e) => e.code(),
            EngineError::UnknownVariable { .. } => "ECORISK_UNKNOWN_VARIABLE",
            EngineError::InvalidType { .. } => "ECORISK_INVALID_TYPE",
            EngineError::OutOfRange { .. } => "ECORISK_OUT_OF_RANGE",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            EngineError::Config(_) => Severity::Fatal,
            _ => Severity::Reject,
        }
    }

    /// The offending input field, for input errors
    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::Config(_) => None,
            EngineError::UnknownVariable { name } => Some(name),
            EngineError::InvalidType { variable, .. } => Some(variable),
            EngineError::OutOfRange { variable, .. } => Some(variable),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Non-fatal inference degradation for one output variable
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InferenceWarning {
    #[error("no rule fired for output '{output}'")]
    NoRuleFired { output: String },

    #[error("output '{output}' has no aggregated result")]
    OutputMissing { output: String },

    #[error("defuzzification of '{output}' produced a non-finite value")]
    NonFiniteResult { output: String },

    #[error("rule {rule}: clause '{variable} IS {set}' could not be resolved")]
    UnresolvedClause {
        rule: usize,
        variable: String,
        set: String,
    },
}

impl InferenceWarning {
    /// The output the warning applies to, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            InferenceWarning::NoRuleFired { output }
            | InferenceWarning::OutputMissing { output }
            | InferenceWarning::NonFiniteResult { output } => Some(output),
            InferenceWarning::UnresolvedClause { .. } => None,
        }
    }
}
