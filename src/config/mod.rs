//! Engine configuration
//!
//! The engine is built once from an `EngineConfig` JSON file which points at
//! the variable, rule and band definitions. Relative paths resolve against
//! the directory holding the configuration file.
//!
//! ```json
//! {
//!   "variables_path": "variables.json",
//!   "rules_path": "rules.json",
//!   "bands_path": "bands.json",
//!   "risk_output": "risque",
//!   "action_output": "action",
//!   "input_bounds": [0, 100],
//!   "universe_step": 1.0,
//!   "log": { "target": "file", "path": "logs/fuzzy_system.log" }
//! }
//! ```

mod errors;
mod keys;

pub use errors::{ConfigError, ConfigResult, RuleSide, Severity};
pub(crate) use keys::unique_keys;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::inference::InputBounds;

/// Where evaluation records go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// JSON lines on stderr
    Stderr,
    /// Append-only JSON lines file
    File,
    /// Records are dropped
    Off,
}

/// Logging section of the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_target")]
    pub target: LogTarget,

    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            target: default_log_target(),
            path: default_log_path(),
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Linguistic variable definitions
    #[serde(default = "default_variables_path")]
    pub variables_path: PathBuf,

    /// Ordered rule definitions
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    /// Action (and optional risk) threshold bands
    #[serde(default = "default_bands_path")]
    pub bands_path: PathBuf,

    /// Output variable holding the ecological risk
    #[serde(default = "default_risk_output")]
    pub risk_output: String,

    /// Output variable holding the recommended action
    #[serde(default = "default_action_output")]
    pub action_output: String,

    /// Inclusive bounds every crisp input must fall in
    #[serde(default = "default_input_bounds")]
    pub input_bounds: [f64; 2],

    /// Sampling step of every universe of discourse
    #[serde(default = "default_universe_step")]
    pub universe_step: f64,

    #[serde(default)]
    pub log: LogSettings,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_variables_path() -> PathBuf {
    PathBuf::from("variables.json")
}
fn default_rules_path() -> PathBuf {
    PathBuf::from("rules.json")
}
fn default_bands_path() -> PathBuf {
    PathBuf::from("bands.json")
}
fn default_risk_output() -> String {
    "risque".to_string()
}
fn default_action_output() -> String {
    "action".to_string()
}
fn default_input_bounds() -> [f64; 2] {
    [0.0, 100.0]
}
fn default_universe_step() -> f64 {
    1.0
}
fn default_log_target() -> LogTarget {
    LogTarget::File
}
fn default_log_path() -> PathBuf {
    PathBuf::from("logs").join("fuzzy_system.log")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variables_path: default_variables_path(),
            rules_path: default_rules_path(),
            bands_path: default_bands_path(),
            risk_output: default_risk_output(),
            action_output: default_action_output(),
            input_bounds: default_input_bounds(),
            universe_step: default_universe_step(),
            log: LogSettings::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let mut config: EngineConfig = read_json(path)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.validate()?;
        Ok(config)
    }

    /// Default configuration rooted at `base_dir`
    pub fn in_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Validate scalar settings
    pub fn validate(&self) -> ConfigResult<()> {
        let [min, max] = self.input_bounds;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ConfigError::InvalidSettings {
                reason: format!("input_bounds [{}, {}] must be finite with min < max", min, max),
            });
        }

        if !self.universe_step.is_finite() || self.universe_step <= 0.0 {
            return Err(ConfigError::InvalidSettings {
                reason: format!("universe_step must be > 0, got {}", self.universe_step),
            });
        }

        if self.risk_output.is_empty() || self.action_output.is_empty() {
            return Err(ConfigError::InvalidSettings {
                reason: "risk_output and action_output must be non-empty".into(),
            });
        }

        Ok(())
    }

    /// Directory relative paths resolve against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a configured path against the configuration directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn variables_file(&self) -> PathBuf {
        self.resolve(&self.variables_path)
    }

    pub fn rules_file(&self) -> PathBuf {
        self.resolve(&self.rules_path)
    }

    pub fn bands_file(&self) -> PathBuf {
        self.resolve(&self.bands_path)
    }

    pub fn log_file(&self) -> PathBuf {
        self.resolve(&self.log.path)
    }

    pub fn bounds(&self) -> InputBounds {
        InputBounds::new(self.input_bounds[0], self.input_bounds[1])
    }
}

/// Read and deserialize a JSON configuration file
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content)
        .map_err(|e| ConfigError::malformed(path, format!("invalid JSON: {}", e)))
}
