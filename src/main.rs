//! Sheetconv - Command-line tool for converting sprite sheet metadata

use std::process::ExitCode;

use sheetconv::cli;

fn main() -> ExitCode {
    cli::run()
}
