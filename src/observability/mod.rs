//! Observability subsystem
//!
//! - Structured JSON-lines logging
//! - Typed events
//! - Injectable recorders for per-evaluation audit records
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Recording failures never change an evaluation's result
//! 3. No background threads
//! 4. Deterministic field ordering

mod events;
mod logger;
mod recorder;

pub use events::Event;
pub use logger::{Level, Logger};
pub use recorder::{
    EvaluationRecorder, FileRecorder, LogRecorder, MemoryRecorder, NullRecorder, RecordedEvent,
};
