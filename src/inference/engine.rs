//! The inference engine: the single `compute(inputs) -> outputs` boundary
//!
//! The engine owns an immutable catalog, rule base and band classifiers.
//! `compute` takes `&self` and keeps all per-call state in an
//! `EvaluationSession`, so one engine can serve concurrent callers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::catalog::VariableCatalog;
use crate::classifier::{BandClassifier, BandsFile};
use crate::config::{ConfigError, ConfigResult, EngineConfig};
use crate::observability::{EvaluationRecorder, Event, NullRecorder};
use crate::rules::{self, CoverageReport, RuleBase};

use super::errors::{EngineError, EngineResult, InferenceWarning};
use super::session::EvaluationSession;
use super::validator::{InputBounds, InputValidator};

/// Names and bounds the engine evaluates with
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub risk_output: String,
    pub action_output: String,
    pub input_bounds: InputBounds,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            risk_output: "risque".to_string(),
            action_output: "action".to_string(),
            input_bounds: InputBounds::default(),
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            risk_output: config.risk_output.clone(),
            action_output: config.action_output.clone(),
            input_bounds: config.bounds(),
        }
    }
}

/// Result of one `compute` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(rename = "risque")]
    pub risk: f64,
    pub action_value: f64,
    pub action_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_label: Option<String>,
}

/// A full evaluation plus its session, for debugging
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationTrace {
    pub evaluation: Evaluation,
    pub session: EvaluationSession,
}

/// Mamdani fuzzy inference engine
pub struct InferenceEngine {
    catalog: VariableCatalog,
    rules: RuleBase,
    action_bands: BandClassifier,
    risk_bands: Option<BandClassifier>,
    settings: EngineSettings,
    recorder: Arc<dyn EvaluationRecorder>,
}

impl fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("inputs", &self.catalog.input_count())
            .field("outputs", &self.catalog.output_count())
            .field("rules", &self.rules.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl InferenceEngine {
    /// Assemble an engine from already-loaded parts.
    ///
    /// # Errors
    ///
    /// `ConfigError` when the risk or action output is not a catalog output,
    /// or when the action bands do not span the action output's universe.
    pub fn new(
        catalog: VariableCatalog,
        rules: RuleBase,
        action_bands: BandClassifier,
        settings: EngineSettings,
    ) -> ConfigResult<Self> {
        catalog
            .output(&settings.risk_output)
            .ok_or_else(|| ConfigError::MissingOutput {
                name: settings.risk_output.clone(),
            })?;
        let action = catalog
            .output(&settings.action_output)
            .ok_or_else(|| ConfigError::MissingOutput {
                name: settings.action_output.clone(),
            })?;

        let (start, end) = (action.universe().start(), action.universe().end());
        if action_bands.lower() != start || action_bands.upper() != end {
            return Err(ConfigError::bands(
                action_bands.name(),
                format!(
                    "bands span [{}, {}] but '{}' ranges over [{}, {}]",
                    action_bands.lower(),
                    action_bands.upper(),
                    action.name(),
                    start,
                    end
                ),
            ));
        }

        Ok(Self {
            catalog,
            rules,
            action_bands,
            risk_bands: None,
            settings,
            recorder: Arc::new(NullRecorder),
        })
    }

    /// Load every configured file and build the engine.
    pub fn from_config(config: &EngineConfig, recorder: Arc<dyn EvaluationRecorder>) -> ConfigResult<Self> {
        let catalog = VariableCatalog::load(&config.variables_file(), config.universe_step)?;
        recorder.record(
            Event::CatalogLoaded,
            &[
                ("inputs", &catalog.input_count().to_string()),
                ("outputs", &catalog.output_count().to_string()),
            ],
        );

        let rules = RuleBase::load(&config.rules_file(), &catalog)?;
        recorder.record(Event::RulesLoaded, &[("rules", &rules.len().to_string())]);

        let bands = BandsFile::load(&config.bands_file())?;
        let action_bands = BandClassifier::from_def("action", &bands.action)?;

        let mut engine = Self::new(catalog, rules, action_bands, EngineSettings::from_config(config))?;
        if let Some(risk) = &bands.risk {
            engine = engine.with_risk_bands(BandClassifier::from_def("risk", risk)?)?;
        }

        recorder.record(
            Event::EngineReady,
            &[
                ("action_output", &engine.settings.action_output),
                ("risk_output", &engine.settings.risk_output),
            ],
        );
        Ok(engine.with_recorder(recorder))
    }

    /// Label the risk score with `bands`, which must span the risk universe.
    pub fn with_risk_bands(mut self, bands: BandClassifier) -> ConfigResult<Self> {
        if let Some(risk) = self.catalog.output(&self.settings.risk_output) {
            let universe = risk.universe();
            if bands.lower() != universe.start() || bands.upper() != universe.end() {
                return Err(ConfigError::bands(
                    bands.name(),
                    format!(
                        "bands span [{}, {}] but '{}' ranges over [{}, {}]",
                        bands.lower(),
                        bands.upper(),
                        risk.name(),
                        universe.start(),
                        universe.end()
                    ),
                ));
            }
        }
        self.risk_bands = Some(bands);
        Ok(self)
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn EvaluationRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn action_bands(&self) -> &BandClassifier {
        &self.action_bands
    }

    pub fn risk_bands(&self) -> Option<&BandClassifier> {
        self.risk_bands.as_ref()
    }

    /// The injected recorder, for hosts reporting on the engine's behalf
    pub fn recorder(&self) -> &dyn EvaluationRecorder {
        self.recorder.as_ref()
    }

    /// Evaluate a JSON object of crisp inputs.
    ///
    /// # Errors
    ///
    /// `UnknownVariable`, `InvalidType` or `OutOfRange`, raised before any
    /// computation. Numerical degeneracies never fail the call.
    pub fn compute(&self, inputs: &Map<String, Value>) -> EngineResult<Evaluation> {
        self.trace(inputs).map(|trace| trace.evaluation)
    }

    /// Evaluate typed crisp inputs.
    pub fn compute_values(&self, inputs: &BTreeMap<String, f64>) -> EngineResult<Evaluation> {
        self.trace_values(inputs).map(|trace| trace.evaluation)
    }

    /// Evaluate and keep every intermediate value.
    pub fn trace(&self, inputs: &Map<String, Value>) -> EngineResult<EvaluationTrace> {
        let validated = self
            .validator()
            .validate_json(inputs)
            .map_err(|e| self.reject(e))?;
        Ok(self.run(validated))
    }

    pub fn trace_values(&self, inputs: &BTreeMap<String, f64>) -> EngineResult<EvaluationTrace> {
        let validated = self
            .validator()
            .validate_values(inputs)
            .map_err(|e| self.reject(e))?;
        Ok(self.run(validated))
    }

    /// Witness inputs for every rule, and the rules nothing can fire.
    pub fn coverage(&self) -> CoverageReport {
        rules::analyze(&self.catalog, &self.rules, self.settings.input_bounds)
    }

    fn validator(&self) -> InputValidator<'_> {
        InputValidator::new(&self.catalog, self.settings.input_bounds)
    }

    fn reject(&self, error: EngineError) -> EngineError {
        self.recorder.record(
            Event::EvaluationRejected,
            &[
                ("code", error.code()),
                ("field", error.field().unwrap_or_default()),
                ("reason", &error.to_string()),
            ],
        );
        error
    }

    fn run(&self, inputs: BTreeMap<String, f64>) -> EvaluationTrace {
        let evaluation_id = Uuid::new_v4().to_string();
        self.recorder.record(
            Event::EvaluationInputs,
            &[
                ("evaluation_id", &evaluation_id),
                ("inputs", &serde_json::to_string(&inputs).unwrap_or_default()),
            ],
        );

        let mut session = EvaluationSession::run(&self.catalog, &self.rules, inputs);

        let risk = self.crisp_output(&mut session, &self.settings.risk_output);
        let action_value = self.crisp_output(&mut session, &self.settings.action_output);

        for warning in &session.warnings {
            self.recorder.record(
                Event::InferenceWarning,
                &[
                    ("evaluation_id", &evaluation_id),
                    ("warning", &warning.to_string()),
                ],
            );
        }

        let evaluation = Evaluation {
            risk,
            action_value,
            action_label: self.action_bands.classify(action_value).to_string(),
            risk_label: self
                .risk_bands
                .as_ref()
                .map(|bands| bands.classify(risk).to_string()),
        };

        self.recorder.record(
            Event::EvaluationOutputs,
            &[
                ("evaluation_id", &evaluation_id),
                ("outputs", &serde_json::to_string(&evaluation).unwrap_or_default()),
            ],
        );

        EvaluationTrace { evaluation, session }
    }

    /// Crisp value of `name`, 0.0 with a warning when nothing targeted it.
    fn crisp_output(&self, session: &mut EvaluationSession, name: &str) -> f64 {
        match session.outputs.get(name) {
            Some(value) => *value,
            None => {
                session.warnings.push(InferenceWarning::OutputMissing {
                    output: name.to_string(),
                });
                0.0
            }
        }
    }
}
