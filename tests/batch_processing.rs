//! CSV batch processing against the shipped configuration

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use ecorisk::batch::{self, BatchError};
use ecorisk::config::EngineConfig;
use ecorisk::inference::{EngineError, InferenceEngine};
use ecorisk::observability::{Event, MemoryRecorder};

fn shipped_engine() -> (InferenceEngine, Arc<MemoryRecorder>) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("ecorisk.json");
    let config = EngineConfig::load(&path).unwrap();
    let recorder = Arc::new(MemoryRecorder::new());
    let engine = InferenceEngine::from_config(&config, recorder.clone()).unwrap();
    (engine, recorder)
}

const HEADER: &str = "pollution_air,pollution_eau,humidite_sol,erosion,temperature,\
vegetation,biodiversite,urbanisation,deforestation,stress_hydrique";

#[test]
fn test_batch_appends_risk_and_action() {
    let (engine, recorder) = shipped_engine();
    let input = format!(
        "{}\n50,50,50,50,50,50,50,50,50,50\n95,95,5,95,48,5,5,95,95,95\n",
        HEADER
    );

    let mut output = Vec::new();
    let summary = batch::process(&engine, input.as_bytes(), &mut output).unwrap();
    assert_eq!(summary.rows, 2);

    let mut reader = csv::Reader::from_reader(output.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 12);
    assert_eq!(&headers[10], "risque");
    assert_eq!(&headers[11], "action");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    let baseline: f64 = rows[0][10].parse().unwrap();
    assert!((baseline - 50.0).abs() < 1e-9);
    assert_eq!(&rows[0][11], "Prévention");
    assert_eq!(&rows[1][11], "Urgence");
    assert_eq!(&rows[1][3], "95");

    assert_eq!(recorder.events(Event::BatchBegin).len(), 1);
    let complete = recorder.events(Event::BatchComplete);
    assert_eq!(complete[0].field("rows"), Some("2"));
}

/// Each row is evaluated on its own; empty cells are missing inputs.
#[test]
fn test_rows_are_independent() {
    let (engine, _) = shipped_engine();
    let input = "erosion,deforestation\n50,50\n,\n50,50\n";

    let mut output = Vec::new();
    batch::process(&engine, input.as_bytes(), &mut output).unwrap();

    let mut reader = csv::Reader::from_reader(output.as_slice());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][2], "0");
    assert_eq!(&rows[1][3], "Surveillance");
    assert_eq!(rows[0], rows[2]);
}

#[test]
fn test_unknown_column_names_the_column() {
    let (engine, recorder) = shipped_engine();
    let input = "erosion,bogus_var\n10,20\n";

    let err = batch::process(&engine, input.as_bytes(), Vec::new()).unwrap_err();
    match &err {
        BatchError::Header { column, .. } => assert_eq!(column, "bogus_var"),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(err.code(), "ECORISK_UNKNOWN_VARIABLE");
    assert!(recorder.events(Event::BatchBegin).is_empty());
}

#[test]
fn test_invalid_cell_names_column_and_row() {
    let (engine, _) = shipped_engine();
    let input = "erosion,vegetation\n10,20\n30,high\n";

    let err = batch::process(&engine, input.as_bytes(), Vec::new()).unwrap_err();
    match err {
        BatchError::Row {
            row,
            source: EngineError::InvalidType { ref variable, .. },
        } => {
            assert_eq!(row, 2);
            assert_eq!(variable, "vegetation");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_out_of_range_cell_fails_the_batch() {
    let (engine, _) = shipped_engine();
    let input = "erosion\n10\n140\n";

    let err = batch::process(&engine, input.as_bytes(), Vec::new()).unwrap_err();
    assert_eq!(err.code(), "ECORISK_OUT_OF_RANGE");
    assert!(err.to_string().starts_with("row 2:"));
}

#[test]
fn test_process_file_round_trip() {
    let (engine, _) = shipped_engine();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("indicateurs.csv");
    let output = dir.path().join("resultats.csv");
    fs::write(&input, "erosion, humidite_sol\n 90 , 10\n").unwrap();

    let summary = batch::process_file(&engine, &input, &output).unwrap();
    assert_eq!(summary.rows, 1);

    let written = fs::read_to_string(&output).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("erosion,humidite_sol,risque,action"));
    assert!(lines.next().unwrap().ends_with("Urgence"));
}
