//! ecorisk - a deterministic, configuration-driven fuzzy inference engine
//! for environmental risk
//!
//! Crisp indicators are fuzzified against triangular membership functions,
//! combined by a fixed rule base (min conjunction, max aggregation) and
//! defuzzified by discrete centroid into a risk score and an action score.
//! The action score is then mapped to a label by threshold bands.

pub mod batch;
pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod curves;
pub mod inference;
pub mod observability;
pub mod rules;
