//! Inference Engine subsystem
//!
//! Crisp inputs -> validation -> fuzzification -> rule evaluation ->
//! implication -> aggregation -> centroid defuzzification -> crisp outputs
//! -> action label.
//!
//! # Guarantees
//!
//! - Input errors are raised before any computation
//! - `compute` is pure over the immutable catalog and rule base
//! - Numerical degeneracies degrade to 0.0 with a warning, never an error
//! - No shared mutable state: concurrent calls need no locking

mod engine;
mod errors;
mod session;
mod validator;

pub use engine::{EngineSettings, Evaluation, EvaluationTrace, InferenceEngine};
pub use errors::{EngineError, EngineResult, InferenceWarning};
pub use session::{centroid, EvaluationSession, RuleFiring};
pub use validator::{InputBounds, InputValidator};
