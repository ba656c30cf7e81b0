//! Input validation
//!
//! Every supplied key must name a known input variable, carry a finite
//! number and lie within the configured bounds. Validation happens before
//! any computation; inputs that are simply absent are allowed.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::VariableCatalog;

use super::errors::{EngineError, EngineResult};

/// Inclusive bounds for crisp inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputBounds {
    pub min: f64,
    pub max: f64,
}

impl InputBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for InputBounds {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// Validates crisp inputs against the catalog. Never mutates anything.
pub struct InputValidator<'a> {
    catalog: &'a VariableCatalog,
    bounds: InputBounds,
}

impl<'a> InputValidator<'a> {
    pub fn new(catalog: &'a VariableCatalog, bounds: InputBounds) -> Self {
        Self { catalog, bounds }
    }

    /// Validates a JSON object of inputs.
    ///
    /// # Errors
    ///
    /// - `UnknownVariable` for a key that is not an input variable
    /// - `InvalidType` for a non-numeric or non-finite value
    /// - `OutOfRange` for a value outside the bounds
    pub fn validate_json(&self, inputs: &Map<String, Value>) -> EngineResult<BTreeMap<String, f64>> {
        inputs
            .iter()
            .map(|(name, value)| {
                self.check_known(name)?;
                let number = value.as_f64().ok_or_else(|| {
                    EngineError::InvalidType {
                        variable: name.clone(),
                        found: json_type_name(value).to_string(),
                    }
                })?;
                self.check_value(name, number)?;
                Ok((name.clone(), number))
            })
            .collect()
    }

    /// Validates already-typed inputs.
    pub fn validate_values(&self, inputs: &BTreeMap<String, f64>) -> EngineResult<BTreeMap<String, f64>> {
        inputs
            .iter()
            .map(|(name, &value)| {
                self.check_known(name)?;
                self.check_value(name, value)?;
                Ok((name.clone(), value))
            })
            .collect()
    }

    fn check_known(&self, name: &str) -> EngineResult<()> {
        if self.catalog.input(name).is_none() {
            return Err(EngineError::UnknownVariable {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_value(&self, name: &str, value: f64) -> EngineResult<()> {
        if !value.is_finite() {
            return Err(EngineError::InvalidType {
                variable: name.to_string(),
                found: NON_FINITE.to_string(),
            });
        }

        if !self.bounds.contains(value) {
            return Err(EngineError::OutOfRange {
                variable: name.to_string(),
                value,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }

        Ok(())
    }
}

/// Reported type of NaN and infinite values
const NON_FINITE: &str = "non-finite number";

/// JSON type name for error messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> VariableCatalog {
        VariableCatalog::from_json(
            r#"{
                "pollution_air": {"type": "input", "range": [0, 100], "sets": {"eleve": [50, 100, 100]}},
                "risque": {"type": "output", "range": [0, 100], "sets": {"eleve": [60, 100, 100]}}
            }"#,
            1.0,
        )
        .unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_inputs() {
        let catalog = catalog();
        let validator = InputValidator::new(&catalog, InputBounds::default());

        let validated = validator.validate_json(&object(json!({"pollution_air": 80}))).unwrap();
        assert_eq!(validated["pollution_air"], 80.0);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let catalog = catalog();
        let validator = InputValidator::new(&catalog, InputBounds::default());

        assert!(validator.validate_json(&object(json!({"pollution_air": 0}))).is_ok());
        assert!(validator.validate_json(&object(json!({"pollution_air": 100.0}))).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let catalog = catalog();
        let validator = InputValidator::new(&catalog, InputBounds::default());

        let err = validator
            .validate_json(&object(json!({"pollution_air": 150})))
            .unwrap_err();
        assert!(matches!(err, EngineError::OutOfRange { value, .. } if value == 150.0));

        let err = validator
            .validate_json(&object(json!({"pollution_air": -0.5})))
            .unwrap_err();
        assert_eq!(err.code(), "ECORISK_OUT_OF_RANGE");
    }

    #[test]
    fn test_non_numeric() {
        let catalog = catalog();
        let validator = InputValidator::new(&catalog, InputBounds::default());

        for value in [json!("high"), json!(true), json!(null), json!([1]), json!({"v": 1})] {
            let err = validator
                .validate_json(&object(json!({"pollution_air": value.clone()})))
                .unwrap_err();
            assert_eq!(err.code(), "ECORISK_INVALID_TYPE");
            assert_eq!(err.field(), Some("pollution_air"));
            assert!(matches!(err, EngineError::InvalidType { ref found, .. } if found == json_type_name(&value)));
        }
    }

    #[test]
    fn test_unknown_variable_checked_first() {
        let catalog = catalog();
        let validator = InputValidator::new(&catalog, InputBounds::default());

        let err = validator
            .validate_json(&object(json!({"bogus_var": "x"})))
            .unwrap_err();
        assert_eq!(err.code(), "ECORISK_UNKNOWN_VARIABLE");

        // Output variables are not inputs
        let err = validator.validate_json(&object(json!({"risque": 10}))).unwrap_err();
        assert_eq!(err.code(), "ECORISK_UNKNOWN_VARIABLE");
    }

    #[test]
    fn test_non_finite_values() {
        let catalog = catalog();
        let validator = InputValidator::new(&catalog, InputBounds::default());

        let mut inputs = BTreeMap::new();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            inputs.insert("pollution_air".to_string(), value);
            match validator.validate_values(&inputs).unwrap_err() {
                EngineError::InvalidType { variable, found } => {
                    assert_eq!(variable, "pollution_air");
                    assert_eq!(found, "non-finite number");
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_empty_inputs_allowed() {
        let catalog = catalog();
        let validator = InputValidator::new(&catalog, InputBounds::default());
        assert!(validator.validate_json(&Map::new()).unwrap().is_empty());
    }
}
