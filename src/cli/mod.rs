//! CLI module for ecorisk
//!
//! Provides command-line interface for:
//! - evaluate: One-shot evaluation of a JSON object from stdin
//! - stream: Line-by-line evaluation until EOF
//! - batch: CSV in, CSV out
//! - curves, rules: Inspect the loaded configuration
//! - check: Validate configuration and detect dead rules

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, curves, evaluate, rules, run, run_batch, run_command, stream};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_request, read_request, write_error, write_response};
