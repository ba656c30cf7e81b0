//! CSV batch processing
//!
//! Each row is one independent `compute` call; no state crosses rows.
//! The output table is the input table plus `risque` and `action` (the
//! action label) columns.

mod errors;

pub use errors::{BatchError, BatchResult};

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use crate::inference::{EngineError, InferenceEngine};
use crate::observability::Event;

/// Columns appended to every output row
pub const OUTPUT_COLUMNS: [&str; 2] = ["risque", "action"];

/// Outcome of a processed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
}

/// Process a CSV table from `reader` into `writer`.
///
/// Fails fast: the first unknown column or invalid cell aborts the batch,
/// naming the column and (for cells) the 1-based row.
pub fn process<R: Read, W: Write>(
    engine: &InferenceEngine,
    reader: R,
    writer: W,
) -> BatchResult<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut writer = csv::Writer::from_writer(writer);

    let headers = reader.headers()?.clone();
    for column in headers.iter() {
        if engine.catalog().input(column).is_none() {
            return Err(BatchError::Header {
                column: column.to_string(),
                source: EngineError::UnknownVariable {
                    name: column.to_string(),
                },
            });
        }
    }

    engine.recorder().record(Event::BatchBegin, &[("columns", &headers.len().to_string())]);

    let mut output_headers = headers.clone();
    for column in OUTPUT_COLUMNS {
        output_headers.push_field(column);
    }
    writer.write_record(&output_headers)?;

    let mut rows = 0;
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;

        let inputs = parse_row(&headers, &record).map_err(|source| BatchError::Row { row, source })?;
        let evaluation = engine
            .compute_values(&inputs)
            .map_err(|source| BatchError::Row { row, source })?;

        let mut output = record.clone();
        output.push_field(&evaluation.risk.to_string());
        output.push_field(&evaluation.action_label);
        writer.write_record(&output)?;
        rows += 1;
    }

    writer.flush()?;
    engine.recorder().record(Event::BatchComplete, &[("rows", &rows.to_string())]);

    Ok(BatchSummary { rows })
}

/// Process `input` into `output`, both CSV files.
pub fn process_file(engine: &InferenceEngine, input: &Path, output: &Path) -> BatchResult<BatchSummary> {
    let reader = std::fs::File::open(input)?;
    let writer = std::fs::File::create(output)?;
    process(engine, reader, writer)
}

/// Empty cells are missing inputs; anything else must parse as a number.
fn parse_row(
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
) -> Result<BTreeMap<String, f64>, EngineError> {
    let mut inputs = BTreeMap::new();
    for (column, cell) in headers.iter().zip(record.iter()) {
        if cell.is_empty() {
            continue;
        }
        let value = cell.parse::<f64>().map_err(|_| EngineError::InvalidType {
            variable: column.to_string(),
            found: "string".to_string(),
        })?;
        inputs.insert(column.to_string(), value);
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_skips_empty_cells() {
        let headers = csv::StringRecord::from(vec!["erosion", "vegetation"]);
        let record = csv::StringRecord::from(vec!["12.5", ""]);

        let inputs = parse_row(&headers, &record).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs["erosion"], 12.5);
    }

    #[test]
    fn test_parse_row_rejects_text() {
        let headers = csv::StringRecord::from(vec!["erosion"]);
        let record = csv::StringRecord::from(vec!["high"]);

        let err = parse_row(&headers, &record).unwrap_err();
        assert_eq!(err.code(), "ECORISK_INVALID_TYPE");
        assert_eq!(err.field(), Some("erosion"));
        match err {
            EngineError::InvalidType { found, .. } => assert_eq!(found, "string"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
