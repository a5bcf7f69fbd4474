//! Roadmapper - roadmaps as plain text

use std::process::ExitCode;

fn main() -> ExitCode {
    // run() has already reported the error in the selected output format
    match roadmapper::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
