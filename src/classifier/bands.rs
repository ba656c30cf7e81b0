//! Ordered threshold bands

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{read_json, ConfigError, ConfigResult};

/// One band as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub label: String,
    /// Inclusive upper bound
    pub upper: f64,
}

/// Band list as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandsDef {
    /// Inclusive lower bound of the first band
    pub lower: f64,
    pub bands: Vec<Band>,
}

/// Band configuration file
///
/// ```json
/// { "action": { "lower": 0, "bands": [{"label": "Surveillance", "upper": 25}] },
///   "risk":   { "lower": 0, "bands": [{"label": "Faible", "upper": 33}] } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BandsFile {
    pub action: BandsDef,
    #[serde(default)]
    pub risk: Option<BandsDef>,
}

impl BandsFile {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        read_json(path)
    }
}

/// Maps a crisp value to the label of its band.
///
/// Bands partition `[lower, last upper]` without gaps. A value equal to a
/// band's upper bound belongs to that band (the lower one); values outside
/// the range are clamped first. Pure, never fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandClassifier {
    name: String,
    lower: f64,
    bands: Vec<Band>,
}

impl BandClassifier {
    pub fn from_def(name: impl Into<String>, def: &BandsDef) -> ConfigResult<Self> {
        let name = name.into();

        if !def.lower.is_finite() {
            return Err(ConfigError::bands(&name, "lower bound must be finite"));
        }
        if def.bands.is_empty() {
            return Err(ConfigError::bands(&name, "at least one band is required"));
        }

        let mut previous = def.lower;
        for (i, band) in def.bands.iter().enumerate() {
            if band.label.trim().is_empty() {
                return Err(ConfigError::bands(&name, format!("band {} has an empty label", i)));
            }
            if !band.upper.is_finite() || band.upper <= previous {
                return Err(ConfigError::bands(
                    &name,
                    format!(
                        "band '{}' upper bound {} must be greater than {}",
                        band.label, band.upper, previous
                    ),
                ));
            }
            previous = band.upper;
        }

        Ok(Self {
            name,
            lower: def.lower,
            bands: def.bands.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound of the final band
    pub fn upper(&self) -> f64 {
        self.bands.last().map(|b| b.upper).unwrap_or(self.lower)
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Label of the first band whose upper bound is >= the clamped value
    pub fn classify(&self, value: f64) -> &str {
        let clamped = if value.is_nan() {
            self.lower
        } else {
            value.clamp(self.lower, self.upper())
        };

        self.bands
            .iter()
            .find(|band| clamped <= band.upper)
            .or_else(|| self.bands.last())
            .map(|band| band.label.as_str())
            .unwrap_or_default()
    }

    /// Label assigned when inference produced nothing (value 0.0)
    pub fn default_label(&self) -> &str {
        self.classify(0.0)
    }
}
