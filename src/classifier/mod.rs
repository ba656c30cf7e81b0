//! Action Classifier
//!
//! Turns the crisp action score into a discrete label through ordered,
//! externally configured threshold bands. The same band mechanism labels
//! the risk score when risk bands are configured.

mod bands;

pub use bands::{Band, BandClassifier, BandsDef, BandsFile};
