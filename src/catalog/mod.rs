//! Variable Catalog subsystem
//!
//! Loads declarative linguistic variable definitions and builds the
//! in-memory representation used by the rule base, the inference engine
//! and the membership curve export.
//!
//! # Invariants
//!
//! - Set names are unique within a variable
//! - Universes are non-empty and strictly increasing
//! - Every membership degree lies in [0, 1]
//! - The catalog is never mutated after construction

mod loader;
mod membership;
mod variable;

pub use loader::{VariableCatalog, VariableDef, VariableDefinitions};
pub use membership::Triangular;
pub use variable::{FuzzySet, LinguisticVariable, Universe, VariableKind, MAX_UNIVERSE_POINTS};
