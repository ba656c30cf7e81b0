//! CLI-specific error types

use std::fmt;
use std::io;

use crate::batch::BatchError;
use crate::config::ConfigError;
use crate::inference::EngineError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration could not be loaded
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Inputs rejected by the engine
    Rejected(&'static str),
    /// Batch processing failed
    BatchFailed(&'static str),
    /// The rule base has rules no input can fire
    DeadRules,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ECORISK_CONFIG_ERROR",
            Self::IoError => "ECORISK_CLI_IO_ERROR",
            Self::Rejected(code) => code,
            Self::BatchFailed(code) => code,
            Self::DeadRules => "ECORISK_DEAD_RULES",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn dead_rules(rules: &[usize]) -> Self {
        let list = rules
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            CliErrorCode::DeadRules,
            format!("rules no admissible input can fire: {}", list),
        )
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::ConfigError, e.to_string())
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Config(config) => config.into(),
            other => Self::new(CliErrorCode::Rejected(other.code()), other.to_string()),
        }
    }
}

impl From<BatchError> for CliError {
    fn from(e: BatchError) -> Self {
        Self::new(CliErrorCode::BatchFailed(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_keeps_code() {
        let err: CliError = EngineError::UnknownVariable { name: "bogus_var".into() }.into();
        assert_eq!(err.code_str(), "ECORISK_UNKNOWN_VARIABLE");
        assert!(err.message().contains("bogus_var"));
    }

    #[test]
    fn test_config_error_code() {
        let err: CliError = ConfigError::NoRules.into();
        assert_eq!(err.code_str(), "ECORISK_CONFIG_ERROR");
    }

    #[test]
    fn test_dead_rules_lists_indices() {
        let err = CliError::dead_rules(&[2, 7]);
        assert_eq!(err.to_string(), "ECORISK_DEAD_RULES: rules no admissible input can fire: 2, 7");
    }
}
