//! Rule definitions and resolved rules

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::unique_keys;

/// Raw rule as written in configuration: `{"if": {...}, "then": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDef {
    #[serde(rename = "if", deserialize_with = "unique_keys")]
    pub antecedent: BTreeMap<String, String>,
    #[serde(rename = "then", deserialize_with = "unique_keys")]
    pub consequent: BTreeMap<String, String>,
}

/// `variable IS set`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub variable: String,
    pub set: String,
}

impl Clause {
    pub fn new(variable: impl Into<String>, set: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            set: set.into(),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} IS {}", self.variable, self.set)
    }
}

/// A validated rule: a flat conjunction implying one or more output sets.
///
/// Every clause references a variable and set known to the catalog the
/// rule was resolved against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    index: usize,
    antecedents: Vec<Clause>,
    consequents: Vec<Clause>,
}

impl Rule {
    pub(crate) fn new(index: usize, antecedents: Vec<Clause>, consequents: Vec<Clause>) -> Self {
        Self {
            index,
            antecedents,
            consequents,
        }
    }

    /// Position in the configured rule list (0-based)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn antecedents(&self) -> &[Clause] {
        &self.antecedents
    }

    pub fn consequents(&self) -> &[Clause] {
        &self.consequents
    }

    /// Human-readable form, e.g. `IF a IS x AND b IS y THEN r IS z`
    pub fn describe(&self) -> String {
        let join = |clauses: &[Clause]| {
            clauses
                .iter()
                .map(Clause::to_string)
                .collect::<Vec<_>>()
                .join(" AND ")
        };
        format!(
            "IF {} THEN {}",
            join(&self.antecedents),
            join(&self.consequents)
        )
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {}: {}", self.index, self.describe())
    }
}
