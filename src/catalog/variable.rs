//! Linguistic variables and their universes of discourse

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::membership::Triangular;

/// Whether a variable is fed by callers or produced by inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Input,
    Output,
}

impl VariableKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "input" => Some(VariableKind::Input),
            "output" => Some(VariableKind::Output),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Input => "input",
            VariableKind::Output => "output",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Largest number of sample points a universe may hold
pub const MAX_UNIVERSE_POINTS: usize = 1_000_000;

/// Fixed-step sampling of `[start, end]`, both ends included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Universe {
    start: f64,
    end: f64,
    step: f64,
    points: Vec<f64>,
}

impl Universe {
    /// Samples `[start, end]` every `step`.
    ///
    /// Returns `None` when the range is empty or inverted, when its length
    /// is not a whole number of steps, or when it would hold more than
    /// `MAX_UNIVERSE_POINTS` points.
    pub fn sample(start: f64, end: f64, step: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return None;
        }
        if !step.is_finite() || step <= 0.0 {
            return None;
        }

        let steps = (end - start) / step;
        let whole = steps.round();
        if (steps - whole).abs() > 1e-9 || whole >= MAX_UNIVERSE_POINTS as f64 {
            return None;
        }

        let count = whole as usize;
        let mut points: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
        points.push(end);

        Some(Self {
            start,
            end,
            step,
            points,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `x` lies within `[start, end]`
    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }

    /// `x` clamped into `[start, end]`; NaN stays NaN
    pub fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() {
            x
        } else {
            x.clamp(self.start, self.end)
        }
    }
}

/// A named fuzzy set with its membership profile sampled over the universe
#[derive(Debug, Clone, Serialize)]
pub struct FuzzySet {
    name: String,
    function: Triangular,
    profile: Vec<f64>,
}

impl FuzzySet {
    pub(crate) fn new(name: impl Into<String>, function: Triangular, universe: &Universe) -> Self {
        let profile = universe.points().iter().map(|&x| function.degree(x)).collect();
        Self {
            name: name.into(),
            function,
            profile,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> &Triangular {
        &self.function
    }

    /// Membership degree of a crisp value
    pub fn degree(&self, x: f64) -> f64 {
        self.function.degree(x)
    }

    /// Degrees at every universe point, in universe order
    pub fn profile(&self) -> &[f64] {
        &self.profile
    }
}

/// A linguistic variable: universe plus named fuzzy sets
#[derive(Debug, Clone, Serialize)]
pub struct LinguisticVariable {
    name: String,
    kind: VariableKind,
    universe: Universe,
    sets: BTreeMap<String, FuzzySet>,
}

impl LinguisticVariable {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: VariableKind,
        universe: Universe,
        sets: BTreeMap<String, FuzzySet>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            universe,
            sets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn set(&self, name: &str) -> Option<&FuzzySet> {
        self.sets.get(name)
    }

    pub fn has_set(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Sets in name order
    pub fn sets(&self) -> impl Iterator<Item = &FuzzySet> {
        self.sets.values()
    }

    /// Degree of `value` in every set of the variable.
    ///
    /// Values beyond the universe are clamped to its nearest end first.
    pub fn fuzzify(&self, value: f64) -> BTreeMap<&str, f64> {
        let value = self.universe.clamp(value);
        self.sets
            .iter()
            .map(|(name, set)| (name.as_str(), set.degree(value)))
            .collect()
    }
}
