//! Membership curve export
//!
//! One curve set per variable (x = universe, y = each set's degrees), for
//! any plotting front end. Reads the catalog only.

use serde::Serialize;

use crate::catalog::{LinguisticVariable, VariableCatalog, VariableKind};

/// Degrees of one fuzzy set over the universe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub set: String,
    pub degrees: Vec<f64>,
}

/// Every curve of one variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSet {
    pub variable: String,
    pub kind: VariableKind,
    pub universe: Vec<f64>,
    pub series: Vec<Curve>,
}

impl CurveSet {
    pub fn from_variable(variable: &LinguisticVariable) -> Self {
        Self {
            variable: variable.name().to_string(),
            kind: variable.kind(),
            universe: variable.universe().points().to_vec(),
            series: variable
                .sets()
                .map(|set| Curve {
                    set: set.name().to_string(),
                    degrees: set.profile().to_vec(),
                })
                .collect(),
        }
    }
}

/// Curve sets for inputs then outputs, each in name order
pub fn membership_curves(catalog: &VariableCatalog) -> Vec<CurveSet> {
    catalog
        .inputs()
        .chain(catalog.outputs())
        .map(CurveSet::from_variable)
        .collect()
}
