//! satcov CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. On failure, prints a
//! JSON error response and exits non-zero. No other logic lives here.

use satcov::cli;

fn main() {
    if let Err(e) = cli::run() {
        // Best effort: stdout may be the thing that failed.
        if cli::write_error(e.code_str(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
