//! Evaluation sessions
//!
//! One session per call. Every intermediate value (fuzzified degrees,
//! firing strengths, aggregated profiles) lives here and nowhere else; the
//! catalog and rule base are only ever read.
//!
//! Pipeline (Mamdani):
//! 1. fuzzify each supplied input against every set of its variable
//! 2. firing strength of a rule = min over its antecedent degrees
//!    (absent inputs count as 0)
//! 3. clip each consequent set's profile at the firing strength
//! 4. aggregate clipped profiles per output by pointwise max
//! 5. defuzzify by discrete centroid; a zero-area profile yields 0.0

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Universe, VariableCatalog};
use crate::rules::{Rule, RuleBase};

use super::errors::InferenceWarning;

/// Firing strength of one rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleFiring {
    pub rule: usize,
    pub strength: f64,
}

/// Everything computed during one evaluation
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSession {
    /// Validated crisp inputs
    pub inputs: BTreeMap<String, f64>,
    /// variable -> set -> degree, for supplied inputs only
    pub degrees: BTreeMap<String, BTreeMap<String, f64>>,
    /// Firing strengths in rule order
    pub firings: Vec<RuleFiring>,
    /// Aggregated membership profile per targeted output
    pub aggregated: BTreeMap<String, Vec<f64>>,
    /// Crisp value per aggregated output
    pub outputs: BTreeMap<String, f64>,
    pub warnings: Vec<InferenceWarning>,
}

impl EvaluationSession {
    /// Run the full pipeline over validated inputs.
    pub fn run(catalog: &VariableCatalog, rules: &RuleBase, inputs: BTreeMap<String, f64>) -> Self {
        let mut session = Self {
            degrees: fuzzify(catalog, &inputs),
            inputs,
            firings: Vec::with_capacity(rules.len()),
            aggregated: BTreeMap::new(),
            outputs: BTreeMap::new(),
            warnings: Vec::new(),
        };

        for rule in rules.rules() {
            let strength = session.firing_strength(rule);
            session.firings.push(RuleFiring {
                rule: rule.index(),
                strength,
            });
            session.implicate(catalog, rule, strength);
        }

        session.defuzzify(catalog);
        session
    }

    /// Degree of `value IS set` for this call, 0 when the input is absent
    pub fn degree(&self, variable: &str, set: &str) -> f64 {
        self.degrees
            .get(variable)
            .and_then(|sets| sets.get(set))
            .copied()
            .unwrap_or(0.0)
    }

    /// Crisp value of an output, 0 when nothing was aggregated for it
    pub fn output(&self, name: &str) -> f64 {
        self.outputs.get(name).copied().unwrap_or(0.0)
    }

    fn firing_strength(&self, rule: &Rule) -> f64 {
        rule.antecedents()
            .iter()
            .map(|clause| self.degree(&clause.variable, &clause.set))
            .fold(1.0, f64::min)
    }

    /// Clip each consequent set at `strength` and max it into the aggregate.
    fn implicate(&mut self, catalog: &VariableCatalog, rule: &Rule, strength: f64) {
        for clause in rule.consequents() {
            let set = catalog
                .output(&clause.variable)
                .and_then(|variable| variable.set(&clause.set).map(|set| (variable, set)));

            let Some((variable, set)) = set else {
                self.warnings.push(InferenceWarning::UnresolvedClause {
                    rule: rule.index(),
                    variable: clause.variable.clone(),
                    set: clause.set.clone(),
                });
                continue;
            };

            let profile = self
                .aggregated
                .entry(clause.variable.clone())
                .or_insert_with(|| vec![0.0; variable.universe().len()]);

            for (aggregate, &degree) in profile.iter_mut().zip(set.profile()) {
                *aggregate = aggregate.max(degree.min(strength));
            }
        }
    }

    fn defuzzify(&mut self, catalog: &VariableCatalog) {
        for (name, profile) in &self.aggregated {
            let crisp = match catalog.output(name) {
                Some(variable) => centroid(name, variable.universe(), profile),
                None => Err(InferenceWarning::OutputMissing {
                    output: name.clone(),
                }),
            };

            let value = crisp.unwrap_or_else(|warning| {
                self.warnings.push(warning);
                0.0
            });
            self.outputs.insert(name.clone(), value);
        }
    }
}

/// Input variable -> set -> degree for every supplied input
fn fuzzify(
    catalog: &VariableCatalog,
    inputs: &BTreeMap<String, f64>,
) -> BTreeMap<String, BTreeMap<String, f64>> {
    inputs
        .iter()
        .filter_map(|(name, &value)| {
            let variable = catalog.input(name)?;
            let degrees = variable
                .fuzzify(value)
                .into_iter()
                .map(|(set, degree)| (set.to_string(), degree))
                .collect();
            Some((name.clone(), degrees))
        })
        .collect()
}

/// Discrete centroid: sum(x * mu(x)) / sum(mu(x)) over the universe.
pub fn centroid(output: &str, universe: &Universe, profile: &[f64]) -> Result<f64, InferenceWarning> {
    let (weighted, area) = universe
        .points()
        .iter()
        .zip(profile)
        .fold((0.0, 0.0), |(weighted, area), (&x, &mu)| {
            (weighted + x * mu, area + mu)
        });

    if area <= 0.0 {
        return Err(InferenceWarning::NoRuleFired {
            output: output.to_string(),
        });
    }

    let value = weighted / area;
    if !value.is_finite() {
        return Err(InferenceWarning::NonFiniteResult {
            output: output.to_string(),
        });
    }

    Ok(value)
}
