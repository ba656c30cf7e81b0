//! CLI command implementations
//!
//! Every command boots the same way: load the configuration, open the
//! configured recorder, build the engine. Nothing is shared between runs.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::batch;
use crate::config::{EngineConfig, LogTarget};
use crate::curves::membership_curves;
use crate::inference::InferenceEngine;
use crate::observability::{
    Event, EvaluationRecorder, FileRecorder, Level, LogRecorder, Logger, NullRecorder,
};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_error, write_response};

/// Run the CLI with parsed arguments
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a specific command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Evaluate { config, trace } => evaluate(&config, trace),
        Command::Stream { config } => stream(&config),
        Command::Batch {
            config,
            input,
            output,
        } => run_batch(&config, &input, &output),
        Command::Curves { config } => curves(&config),
        Command::Rules { config } => rules(&config),
        Command::Check { config } => check(&config),
    }
}

/// Evaluate a single JSON object from stdin
pub fn evaluate(config_path: &Path, trace: bool) -> CliResult<()> {
    let engine = boot(config_path)?;
    let request = read_request()?;

    let mut stdout = io::stdout();
    respond(&engine, &request, trace, &mut stdout)
}

/// Evaluate one JSON object per stdin line until EOF.
///
/// A malformed or rejected line produces an error envelope; the stream
/// continues with the next line.
pub fn stream(config_path: &Path) -> CliResult<()> {
    let engine = boot(config_path)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    serve_lines(&engine, stdin.lock(), &mut stdout)
}

/// Evaluate every row of a CSV file
pub fn run_batch(config_path: &Path, input: &Path, output: &Path) -> CliResult<()> {
    let engine = boot(config_path)?;
    let summary = batch::process_file(&engine, input, output)?;

    write_response(
        &mut io::stdout(),
        json!({
            "rows": summary.rows,
            "output": output.display().to_string(),
        }),
    )
}

/// Print the membership curves of every variable
pub fn curves(config_path: &Path) -> CliResult<()> {
    let engine = boot(config_path)?;
    let data = serde_json::to_value(membership_curves(engine.catalog()))?;
    write_response(&mut io::stdout(), data)
}

/// List the configured rules
pub fn rules(config_path: &Path) -> CliResult<()> {
    let engine = boot(config_path)?;
    let data: Vec<Value> = engine
        .rules()
        .rules()
        .iter()
        .map(|rule| {
            json!({
                "index": rule.index(),
                "rule": rule.describe(),
            })
        })
        .collect();

    write_response(&mut io::stdout(), Value::Array(data))
}

/// Validate the configuration and fail if any rule can never fire
pub fn check(config_path: &Path) -> CliResult<()> {
    let engine = boot(config_path)?;
    let report = engine.coverage();

    for index in report.dead_rules() {
        let described = engine
            .rules()
            .get(index)
            .map(|rule| rule.describe())
            .unwrap_or_default();
        engine.recorder().record(
            Event::DeadRuleDetected,
            &[("index", &index.to_string()), ("rule", &described)],
        );
    }

    let dead = report.dead_rules();
    if !dead.is_empty() {
        return Err(CliError::dead_rules(&dead));
    }

    write_response(
        &mut io::stdout(),
        json!({
            "inputs": engine.catalog().input_count(),
            "outputs": engine.catalog().output_count(),
            "rules": engine.rules().len(),
            "dead_rules": dead,
        }),
    )
}

/// Answer one request, writing an ok or error envelope
pub(crate) fn respond<W: Write>(
    engine: &InferenceEngine,
    request: &Map<String, Value>,
    trace: bool,
    out: &mut W,
) -> CliResult<()> {
    let result = if trace {
        engine.trace(request).map(serde_json::to_value)
    } else {
        engine.compute(request).map(serde_json::to_value)
    };

    match result {
        Ok(data) => write_response(out, data?),
        Err(e) => write_error(out, e.code(), &e.to_string()),
    }
}

pub(crate) fn serve_lines<R: BufRead, W: Write>(
    engine: &InferenceEngine,
    reader: R,
    out: &mut W,
) -> CliResult<()> {
    for request in read_requests(reader) {
        match request {
            Ok(request) => respond(engine, &request, false, out)?,
            Err(e) => write_error(out, e.code_str(), e.message())?,
        }
    }
    Ok(())
}

/// Load the configuration and build the engine with its recorder
fn boot(config_path: &Path) -> CliResult<InferenceEngine> {
    let config = EngineConfig::load(config_path)?;
    let recorder = open_recorder(&config);
    Ok(InferenceEngine::from_config(&config, recorder)?)
}

/// Build the recorder the configuration asks for.
///
/// A log file that cannot be opened degrades to stderr logging.
fn open_recorder(config: &EngineConfig) -> Arc<dyn EvaluationRecorder> {
    let path = match config.log.target {
        LogTarget::Off => return Arc::new(NullRecorder),
        LogTarget::Stderr => return Arc::new(LogRecorder),
        LogTarget::File => config.log_file(),
    };

    match FileRecorder::open(&path) {
        Ok(recorder) => Arc::new(recorder),
        Err(e) => {
            Logger::log_stderr(
                Level::Warn,
                "LOG_FILE_UNAVAILABLE",
                &[
                    ("path", &path.display().to_string()),
                    ("reason", &e.to_string()),
                ],
            );
            Arc::new(LogRecorder)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, rules: &str) -> std::path::PathBuf {
        fs::write(
            dir.join("variables.json"),
            r#"{
                "erosion": {"type": "input", "range": [0, 100],
                    "sets": {"faible": [0, 0, 50], "eleve": [50, 100, 100]}},
                "risque": {"type": "output", "range": [0, 100],
                    "sets": {"faible": [0, 0, 50], "eleve": [50, 100, 100]}},
                "action": {"type": "output", "range": [0, 100],
                    "sets": {"bas": [0, 0, 50], "haut": [50, 100, 100]}}
            }"#,
        )
        .unwrap();
        fs::write(dir.join("rules.json"), rules).unwrap();
        fs::write(
            dir.join("bands.json"),
            r#"{"action": {"lower": 0, "bands": [
                {"label": "Surveillance", "upper": 50},
                {"label": "Urgence", "upper": 100}]}}"#,
        )
        .unwrap();
        let path = dir.join("ecorisk.json");
        fs::write(&path, r#"{"log": {"target": "off"}}"#).unwrap();
        path
    }

    const RULES: &str = r#"[
        {"if": {"erosion": "eleve"}, "then": {"risque": "eleve", "action": "haut"}},
        {"if": {"erosion": "faible"}, "then": {"risque": "faible", "action": "bas"}}
    ]"#;

    #[test]
    fn test_serve_lines_continues_after_errors() {
        let dir = TempDir::new().unwrap();
        let engine = boot(&write_config(dir.path(), RULES)).unwrap();

        let input = "{\"erosion\": 100}\n{\"erosion\": 150}\n[]\n{\"erosion\": 0}\n";
        let mut out = Vec::new();
        serve_lines(&engine, input.as_bytes(), &mut out).unwrap();

        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[0]["data"]["action_label"], "Urgence");
        assert_eq!(lines[1]["code"], "ECORISK_OUT_OF_RANGE");
        assert_eq!(lines[2]["status"], "error");
        assert_eq!(lines[3]["data"]["action_label"], "Surveillance");
    }

    #[test]
    fn test_respond_with_trace_includes_firings() {
        let dir = TempDir::new().unwrap();
        let engine = boot(&write_config(dir.path(), RULES)).unwrap();

        let request = parse(r#"{"erosion": 75}"#);
        let mut out = Vec::new();
        respond(&engine, &request, true, &mut out).unwrap();

        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"]["session"]["firings"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_check_fails_on_dead_rule() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), RULES);
        fs::write(
            dir.path().join("ecorisk.json"),
            r#"{"log": {"target": "off"}, "input_bounds": [0, 40]}"#,
        )
        .unwrap();

        let err = check(&path).unwrap_err();
        assert_eq!(err.code_str(), "ECORISK_DEAD_RULES");
        assert!(err.message().contains('0'));
    }

    fn parse(text: &str) -> Map<String, Value> {
        match serde_json::from_str(text).unwrap() {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }
}
