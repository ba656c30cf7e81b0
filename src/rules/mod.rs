//! Rule Base subsystem
//!
//! IF/THEN rules over the catalog's variables. Antecedents are flat
//! conjunctions of input clauses; consequents name one set per output
//! variable. Rules carry an implicit weight of 1.
//!
//! Rule order is preserved for tracing only; aggregation does not depend
//! on it.

pub mod coverage;
mod loader;
mod types;

pub use coverage::{analyze, CoverageReport, RuleCoverage};
pub use loader::RuleBase;
pub use types::{Clause, Rule, RuleDef};
