//! Configuration error types
//!
//! Every error raised while building the engine is a `ConfigError`.
//! Configuration errors are FATAL: no partially built engine is ever usable.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Severity levels shared by all surfaced engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The call is rejected, the engine stays usable
    Reject,
    /// Engine construction is aborted
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Reject => "REJECT",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Side of a rule a clause belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSide {
    Antecedent,
    Consequent,
}

impl fmt::Display for RuleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSide::Antecedent => write!(f, "if"),
            RuleSide::Consequent => write!(f, "then"),
        }
    }
}

/// Malformed or inconsistent variable, rule, band or engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration '{}': {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("variable '{variable}': unknown type '{kind}' (expected 'input' or 'output')")]
    UnknownVariableKind { variable: String, kind: String },

    #[error("variable '{variable}': invalid range: {reason}")]
    InvalidRange { variable: String, reason: String },

    #[error("variable '{variable}': set '{set}': {reason}")]
    InvalidPoints {
        variable: String,
        set: String,
        reason: String,
    },

    #[error("variable '{variable}' defines no fuzzy sets")]
    NoSets { variable: String },

    #[error("rule {rule}: '{side}' clause list is empty")]
    EmptyClauses { rule: usize, side: RuleSide },

    #[error("rule {rule}: unknown {side} variable '{variable}'")]
    UnknownRuleVariable {
        rule: usize,
        side: RuleSide,
        variable: String,
    },

    #[error("rule {rule}: variable '{variable}' has no set '{set}'")]
    UnknownRuleSet {
        rule: usize,
        variable: String,
        set: String,
    },

    #[error("rule base is empty: at least one rule is required")]
    NoRules,

    #[error("invalid bands '{name}': {reason}")]
    InvalidBands { name: String, reason: String },

    #[error("output variable '{name}' is not defined in the catalog")]
    MissingOutput { name: String },

    #[error("invalid engine settings: {reason}")]
    InvalidSettings { reason: String },
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        "ECORISK_CONFIG_ERROR"
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConfigError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn points(
        variable: impl Into<String>,
        set: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidPoints {
            variable: variable.into(),
            set: set.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn bands(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidBands {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
