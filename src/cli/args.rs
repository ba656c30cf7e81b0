//! CLI argument definitions using clap
//!
//! Commands:
//! - ecorisk evaluate --config <path> [--trace]
//! - ecorisk stream --config <path>
//! - ecorisk batch --config <path> --input <csv> --output <csv>
//! - ecorisk curves --config <path>
//! - ecorisk rules --config <path>
//! - ecorisk check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "./config/ecorisk.json";

/// ecorisk - fuzzy environmental risk evaluation
#[derive(Parser, Debug)]
#[command(name = "ecorisk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate one JSON object of indicators read from stdin
    Evaluate {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Include fuzzified degrees and rule firing strengths
        #[arg(long)]
        trace: bool,
    },

    /// Evaluate one JSON object per stdin line until EOF
    Stream {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Evaluate every row of a CSV file
    Batch {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Input CSV, one column per indicator
        #[arg(long)]
        input: PathBuf,

        /// Output CSV, input columns plus risque and action
        #[arg(long, default_value = "results.csv")]
        output: PathBuf,
    },

    /// Print membership curves of every variable as JSON
    Curves {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// List the configured rules
    Rules {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Validate the configuration and detect dead rules
    Check {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
