//! Variable catalog loading
//!
//! Definitions are read from a JSON object keyed by variable name:
//!
//! ```json
//! { "pollution_air": { "type": "input", "range": [0, 100],
//!                      "sets": { "faible": [0, 0, 50], "eleve": [50, 100, 100] } } }
//! ```
//!
//! Loading validates every definition and materializes each universe and
//! each set's sampled profile. The resulting catalog is read-only.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::config::{read_json, unique_keys, ConfigError, ConfigResult};

use super::membership::Triangular;
use super::variable::{FuzzySet, LinguisticVariable, Universe, VariableKind, MAX_UNIVERSE_POINTS};

/// Raw definition of one variable as written in configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VariableDef {
    #[serde(rename = "type")]
    pub kind: String,
    pub range: Vec<f64>,
    #[serde(deserialize_with = "unique_keys")]
    pub sets: BTreeMap<String, Vec<f64>>,
}

/// All raw variable definitions, keyed by unique variable name
#[derive(Debug, Clone, Default)]
pub struct VariableDefinitions(pub BTreeMap<String, VariableDef>);

impl<'de> Deserialize<'de> for VariableDefinitions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        unique_keys(deserializer).map(VariableDefinitions)
    }
}

/// Immutable catalog of input and output linguistic variables
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    inputs: BTreeMap<String, LinguisticVariable>,
    outputs: BTreeMap<String, LinguisticVariable>,
}

impl VariableCatalog {
    /// Loads and validates variable definitions from a JSON file.
    pub fn load(path: &Path, step: f64) -> ConfigResult<Self> {
        let definitions: VariableDefinitions = read_json(path)?;
        Self::from_definitions(&definitions, step)
    }

    /// Parses and validates variable definitions from a JSON string.
    pub fn from_json(json: &str, step: f64) -> ConfigResult<Self> {
        let definitions: VariableDefinitions = serde_json::from_str(json)
            .map_err(|e| ConfigError::malformed("<inline variables>", e.to_string()))?;
        Self::from_definitions(&definitions, step)
    }

    /// Builds the catalog, sampling every universe every `step`.
    pub fn from_definitions(definitions: &VariableDefinitions, step: f64) -> ConfigResult<Self> {
        let mut inputs = BTreeMap::new();
        let mut outputs = BTreeMap::new();

        for (name, def) in &definitions.0 {
            let variable = build_variable(name, def, step)?;
            match variable.kind() {
                VariableKind::Input => inputs.insert(name.clone(), variable),
                VariableKind::Output => outputs.insert(name.clone(), variable),
            };
        }

        Ok(Self { inputs, outputs })
    }

    pub fn input(&self, name: &str) -> Option<&LinguisticVariable> {
        self.inputs.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&LinguisticVariable> {
        self.outputs.get(name)
    }

    /// Input variables in name order
    pub fn inputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.inputs.values()
    }

    /// Output variables in name order
    pub fn outputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.outputs.values()
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}

fn build_variable(name: &str, def: &VariableDef, step: f64) -> ConfigResult<LinguisticVariable> {
    let kind = VariableKind::parse(&def.kind).ok_or_else(|| ConfigError::UnknownVariableKind {
        variable: name.to_string(),
        kind: def.kind.clone(),
    })?;

    let (start, end) = match def.range.as_slice() {
        [start, end] => (*start, *end),
        other => {
            return Err(ConfigError::InvalidRange {
                variable: name.to_string(),
                reason: format!("expected [start, end], got {} values", other.len()),
            })
        }
    };

    let universe = Universe::sample(start, end, step).ok_or_else(|| ConfigError::InvalidRange {
        variable: name.to_string(),
        reason: format!(
            "[{}, {}] must be finite with start < end and a whole number of {} steps, \
             at most {} points",
            start, end, step, MAX_UNIVERSE_POINTS
        ),
    })?;

    if def.sets.is_empty() {
        return Err(ConfigError::NoSets {
            variable: name.to_string(),
        });
    }

    let mut sets = BTreeMap::new();
    for (set_name, points) in &def.sets {
        let function = build_function(name, set_name, points, &universe)?;
        sets.insert(set_name.clone(), FuzzySet::new(set_name, function, &universe));
    }

    Ok(LinguisticVariable::new(name, kind, universe, sets))
}

fn build_function(
    variable: &str,
    set: &str,
    points: &[f64],
    universe: &Universe,
) -> ConfigResult<Triangular> {
    let (a, b, c) = match points {
        [a, b, c] => (*a, *b, *c),
        other => {
            return Err(ConfigError::points(
                variable,
                set,
                format!("expected exactly 3 points, got {}", other.len()),
            ))
        }
    };

    let function = Triangular::new(a, b, c).ok_or_else(|| {
        ConfigError::points(
            variable,
            set,
            format!("points [{}, {}, {}] must be finite and non-decreasing", a, b, c),
        )
    })?;

    if !universe.contains(a) || !universe.contains(c) {
        return Err(ConfigError::points(
            variable,
            set,
            format!(
                "points [{}, {}, {}] fall outside the universe [{}, {}]",
                a,
                b,
                c,
                universe.start(),
                universe.end()
            ),
        ));
    }

    Ok(function)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "pollution_air": {"type": "input", "range": [0, 100],
            "sets": {"faible": [0, 0, 50], "moyen": [20, 50, 80], "eleve": [50, 100, 100]}},
        "risque": {"type": "output", "range": [0, 100],
            "sets": {"faible": [0, 0, 40], "eleve": [60, 100, 100]}}
    }"#;

    #[test]
    fn test_load_splits_inputs_and_outputs() {
        let catalog = VariableCatalog::from_json(SAMPLE, 1.0).unwrap();

        assert_eq!(catalog.input_count(), 1);
        assert_eq!(catalog.output_count(), 1);
        assert!(catalog.input("pollution_air").is_some());
        assert!(catalog.output("risque").is_some());
        assert!(catalog.input("risque").is_none());

        let risque = catalog.output("risque").unwrap();
        assert_eq!(risque.universe().len(), 101);
        assert!(risque.has_set("eleve"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("variables.json");
        fs::write(&path, SAMPLE).unwrap();

        let catalog = VariableCatalog::load(&path, 1.0).unwrap();
        assert_eq!(catalog.input_count(), 1);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"{"x": {"type": "antecedent", "range": [0, 10], "sets": {"a": [0, 0, 10]}}}"#;
        let err = VariableCatalog::from_json(json, 1.0).unwrap_err();
        match err {
            ConfigError::UnknownVariableKind { variable, kind } => {
                assert_eq!(variable, "x");
                assert_eq!(kind, "antecedent");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_wrong_point_count_rejected() {
        let json = r#"{"x": {"type": "input", "range": [0, 10], "sets": {"a": [0, 10]}}}"#;
        let err = VariableCatalog::from_json(json, 1.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPoints { ref set, .. } if set == "a"));
    }

    #[test]
    fn test_decreasing_points_rejected() {
        let json = r#"{"x": {"type": "input", "range": [0, 10], "sets": {"a": [5, 2, 10]}}}"#;
        assert!(matches!(
            VariableCatalog::from_json(json, 1.0),
            Err(ConfigError::InvalidPoints { .. })
        ));
    }

    #[test]
    fn test_points_outside_universe_rejected() {
        let json = r#"{"x": {"type": "input", "range": [0, 10], "sets": {"a": [-1, 0, 5]}}}"#;
        let err = VariableCatalog::from_json(json, 1.0).unwrap_err();
        assert!(err.to_string().contains("outside the universe"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let json = r#"{"x": {"type": "input", "range": [10, 0], "sets": {"a": [0, 5, 10]}}}"#;
        assert!(matches!(
            VariableCatalog::from_json(json, 1.0),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_oversized_universe_rejected() {
        let json = r#"{"x": {"type": "input", "range": [0, 1e12], "sets": {"a": [0, 0, 10]}}}"#;
        let err = VariableCatalog::from_json(json, 1.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { ref variable, .. } if variable == "x"));
    }

    #[test]
    fn test_duplicate_set_names_rejected() {
        let json = r#"{"x": {"type": "input", "range": [0, 10],
            "sets": {"a": [0, 0, 5], "a": [5, 10, 10]}}}"#;
        let err = VariableCatalog::from_json(json, 1.0).unwrap_err();
        assert!(err.to_string().contains("duplicate key 'a'"));
    }

    #[test]
    fn test_duplicate_variable_names_rejected() {
        let json = r#"{
            "x": {"type": "input", "range": [0, 10], "sets": {"a": [0, 0, 5]}},
            "x": {"type": "output", "range": [0, 10], "sets": {"a": [0, 0, 5]}}
        }"#;
        assert!(VariableCatalog::from_json(json, 1.0).is_err());
    }

    #[test]
    fn test_variable_without_sets_rejected() {
        let json = r#"{"x": {"type": "input", "range": [0, 10], "sets": {}}}"#;
        assert!(matches!(
            VariableCatalog::from_json(json, 1.0),
            Err(ConfigError::NoSets { .. })
        ));
    }
}
