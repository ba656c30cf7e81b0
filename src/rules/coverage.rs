//! Rule coverage analysis
//!
//! A rule is live when some admissible input combination fires it with a
//! strength above zero. Since a rule's antecedent is a conjunction over
//! distinct input variables, it is live exactly when every clause has a
//! witness value inside the input bounds with a positive degree.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{FuzzySet, LinguisticVariable, VariableCatalog};
use crate::inference::InputBounds;

use super::loader::RuleBase;
use super::types::Rule;

/// Coverage of a single rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCoverage {
    pub rule: usize,
    /// Input values firing the rule, `None` for a dead rule
    pub witness: Option<BTreeMap<String, f64>>,
}

impl RuleCoverage {
    pub fn is_dead(&self) -> bool {
        self.witness.is_none()
    }
}

/// Coverage of a whole rule base, in rule order
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub rules: Vec<RuleCoverage>,
}

impl CoverageReport {
    /// Indices of rules no admissible input can fire
    pub fn dead_rules(&self) -> Vec<usize> {
        self.rules
            .iter()
            .filter(|c| c.is_dead())
            .map(|c| c.rule)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.rules.iter().all(|c| !c.is_dead())
    }
}

/// Find a witness input combination for every rule.
pub fn analyze(catalog: &VariableCatalog, rules: &RuleBase, bounds: InputBounds) -> CoverageReport {
    CoverageReport {
        rules: rules
            .rules()
            .iter()
            .map(|rule| RuleCoverage {
                rule: rule.index(),
                witness: witness_for(catalog, rule, bounds),
            })
            .collect(),
    }
}

fn witness_for(catalog: &VariableCatalog, rule: &Rule, bounds: InputBounds) -> Option<BTreeMap<String, f64>> {
    rule.antecedents()
        .iter()
        .map(|clause| {
            let variable = catalog.input(&clause.variable)?;
            let set = variable.set(&clause.set)?;
            let value = witness_value(variable, set, bounds)?;
            Some((clause.variable.clone(), value))
        })
        .collect()
}

/// The peak when admissible, otherwise the admissible universe point with
/// the highest positive degree.
fn witness_value(variable: &LinguisticVariable, set: &FuzzySet, bounds: InputBounds) -> Option<f64> {
    let peak = set.function().peak();
    if bounds.contains(peak) {
        return Some(peak);
    }

    variable
        .universe()
        .points()
        .iter()
        .copied()
        .filter(|&x| bounds.contains(x))
        .map(|x| (x, set.degree(x)))
        .filter(|&(_, degree)| degree > 0.0)
        .fold(None, |best: Option<(f64, f64)>, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        })
        .map(|(x, _)| x)
}
