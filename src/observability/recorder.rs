//! Evaluation recorders
//!
//! The engine reports what it does through an injected recorder rather than
//! a process-wide logger; the host owns the recorder's lifecycle.
//! Recording never fails from the caller's point of view: I/O errors and
//! poisoned locks are swallowed.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};

use super::events::Event;
use super::logger::Logger;

/// Sink for structured engine events
pub trait EvaluationRecorder: Send + Sync {
    /// Record one event with its payload fields.
    fn record(&self, event: Event, payload: &[(&str, &str)]);
}

/// Writes JSON lines to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRecorder;

impl EvaluationRecorder for LogRecorder {
    fn record(&self, event: Event, payload: &[(&str, &str)]) {
        Logger::log_stderr(event.level(), event.as_str(), payload);
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl EvaluationRecorder for NullRecorder {
    fn record(&self, _event: Event, _payload: &[(&str, &str)]) {}
}

/// Append-only JSON lines file, one timestamped record per line
pub struct FileRecorder {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileRecorder {
    /// Open or create the log file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EvaluationRecorder for FileRecorder {
    fn record(&self, event: Event, payload: &[(&str, &str)]) {
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = Logger::format_line(event.level(), event.as_str(), payload, Some(&ts));

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(line.as_bytes());
            let _ = writer.flush();
        }
    }
}

/// A recorded event, as kept by `MemoryRecorder`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub event: Event,
    pub fields: BTreeMap<String, String>,
}

impl RecordedEvent {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// In-memory recorder for tests and embedding hosts
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<RecordedEvent>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RecordedEvent> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Records of one event kind, in recording order
    pub fn events(&self, event: Event) -> Vec<RecordedEvent> {
        self.records()
            .into_iter()
            .filter(|r| r.event == event)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EvaluationRecorder for MemoryRecorder {
    fn record(&self, event: Event, payload: &[(&str, &str)]) {
        let fields = payload
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        if let Ok(mut records) = self.records.lock() {
            records.push(RecordedEvent { event, fields });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_recorder_keeps_order() {
        let recorder = MemoryRecorder::new();
        recorder.record(Event::EvaluationInputs, &[("inputs", "{}")]);
        recorder.record(Event::EvaluationOutputs, &[("risque", "0")]);

        assert_eq!(recorder.len(), 2);
        let records = recorder.records();
        assert_eq!(records[0].event, Event::EvaluationInputs);
        assert_eq!(records[1].field("risque"), Some("0"));
        assert_eq!(recorder.events(Event::EvaluationOutputs).len(), 1);
    }

    #[test]
    fn test_file_recorder_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("fuzzy_system.log");

        let recorder = FileRecorder::open(&path).unwrap();
        recorder.record(Event::EvaluationInputs, &[("inputs", "{\"erosion\":10}")]);
        recorder.record(Event::InferenceWarning, &[("output", "action")]);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "EVALUATION_INPUTS");
        assert!(first["ts"].as_str().is_some());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["severity"], "WARN");
    }

    #[test]
    fn test_file_recorder_reopen_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.log");

        FileRecorder::open(&path)
            .unwrap()
            .record(Event::BatchBegin, &[]);
        FileRecorder::open(&path)
            .unwrap()
            .record(Event::BatchComplete, &[]);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_null_recorder_is_silent() {
        NullRecorder.record(Event::EngineReady, &[("rules", "20")]);
    }
}
