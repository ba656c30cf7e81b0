//! Observable events

use std::fmt;

use super::logger::Level;

/// Events recorded by the engine and its hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Construction
    /// Variable catalog built
    CatalogLoaded,
    /// Rule base resolved
    RulesLoaded,
    /// Engine ready to evaluate
    EngineReady,
    /// A rule no admissible input can fire
    DeadRuleDetected,

    // Evaluation
    /// Validated inputs of one call
    EvaluationInputs,
    /// Outputs produced by one call
    EvaluationOutputs,
    /// Inputs rejected before inference
    EvaluationRejected,
    /// An output degraded to its default
    InferenceWarning,

    // Batch
    BatchBegin,
    BatchComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::RulesLoaded => "RULES_LOADED",
            Event::EngineReady => "ENGINE_READY",
            Event::DeadRuleDetected => "DEAD_RULE_DETECTED",
            Event::EvaluationInputs => "EVALUATION_INPUTS",
            Event::EvaluationOutputs => "EVALUATION_OUTPUTS",
            Event::EvaluationRejected => "EVALUATION_REJECTED",
            Event::InferenceWarning => "INFERENCE_WARNING",
            Event::BatchBegin => "BATCH_BEGIN",
            Event::BatchComplete => "BATCH_COMPLETE",
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Event::DeadRuleDetected | Event::EvaluationRejected | Event::InferenceWarning => {
                Level::Warn
            }
            _ => Level::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
