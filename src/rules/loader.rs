//! Rule base loading and reference resolution

use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::{LinguisticVariable, VariableCatalog};
use crate::config::{read_json, ConfigError, ConfigResult, RuleSide};

use super::types::{Clause, Rule, RuleDef};

/// Ordered, validated, read-only list of rules
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Loads rules from a JSON array file and resolves them against `catalog`.
    pub fn load(path: &Path, catalog: &VariableCatalog) -> ConfigResult<Self> {
        let definitions: Vec<RuleDef> = read_json(path)?;
        Self::from_definitions(&definitions, catalog)
    }

    /// Parses a JSON array of rules and resolves it against `catalog`.
    pub fn from_json(json: &str, catalog: &VariableCatalog) -> ConfigResult<Self> {
        let definitions: Vec<RuleDef> = serde_json::from_str(json)
            .map_err(|e| ConfigError::malformed("<inline rules>", e.to_string()))?;
        Self::from_definitions(&definitions, catalog)
    }

    /// Resolves every clause; input order is preserved.
    ///
    /// Fails on the first unknown variable or set, naming the rule index.
    pub fn from_definitions(definitions: &[RuleDef], catalog: &VariableCatalog) -> ConfigResult<Self> {
        if definitions.is_empty() {
            return Err(ConfigError::NoRules);
        }

        let rules = definitions
            .iter()
            .enumerate()
            .map(|(index, def)| resolve_rule(index, def, catalog))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Whether any rule concludes on `output`
    pub fn targets(&self, output: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.consequents().iter().any(|c| c.variable == output))
    }
}

fn resolve_rule(index: usize, def: &RuleDef, catalog: &VariableCatalog) -> ConfigResult<Rule> {
    let antecedents = resolve_clauses(index, RuleSide::Antecedent, &def.antecedent, |name| {
        catalog.input(name)
    })?;
    let consequents = resolve_clauses(index, RuleSide::Consequent, &def.consequent, |name| {
        catalog.output(name)
    })?;

    Ok(Rule::new(index, antecedents, consequents))
}

fn resolve_clauses<'a, F>(
    index: usize,
    side: RuleSide,
    clauses: &BTreeMap<String, String>,
    lookup: F,
) -> ConfigResult<Vec<Clause>>
where
    F: Fn(&str) -> Option<&'a LinguisticVariable>,
{
    if clauses.is_empty() {
        return Err(ConfigError::EmptyClauses { rule: index, side });
    }

    clauses
        .iter()
        .map(|(variable, set)| {
            let resolved = lookup(variable).ok_or_else(|| ConfigError::UnknownRuleVariable {
                rule: index,
                side,
                variable: variable.clone(),
            })?;

            if !resolved.has_set(set) {
                return Err(ConfigError::UnknownRuleSet {
                    rule: index,
                    variable: variable.clone(),
                    set: set.clone(),
                });
            }

            Ok(Clause::new(variable.as_str(), set.as_str()))
        })
        .collect()
}
