//! Command-line interface implementation
//!
//! This module provides the CLI entry point. With no arguments the converter
//! scans the working directory and writes to `out/`.

mod convert;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::CollisionPolicy;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Sheetconv - convert .png.txt sprite sheet metadata into .flxspritesheet files
#[derive(Parser, Debug)]
#[command(name = "sheetconv")]
#[command(
    about = "Sheetconv - convert .png.txt sprite sheet metadata into .flxspritesheet files"
)]
#[command(version)]
pub struct Cli {
    /// Path fragment written before the image name in every sheet
    /// (default: /images/spritesheets/)
    #[arg(long, value_name = "FRAGMENT")]
    pub prefix: Option<String>,

    /// Directory scanned for metadata files (default: the working directory)
    #[arg(long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Output directory, deleted and recreated on every run (default: out)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Config file to use instead of searching for sheetconv.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// What to do when two inputs map to the same output file
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,

    /// List what would be converted without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print every converted file
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    convert::run_convert(&cli)
}

/// Install the env_logger backend; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    use env_logger::{Builder, Env};

    let default_level = if verbose { "info" } else { "warn" };
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}
