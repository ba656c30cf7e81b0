//! ecorisk CLI entry point
//!
//! All logic is delegated to the CLI module; this only reports failures
//! on stderr and exits non-zero.

use ecorisk::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
