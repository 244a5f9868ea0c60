//! Convert command implementation

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{Cli, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::loader::{
    check_config, find_config, load_config, merge_cli_overrides, project_root, resolve_path,
    CliOverrides,
};
use crate::config::{default_config, ConfigError, SheetConfig};
use crate::convert::{ConvertContext, ConvertResult, Converter};

/// Run the conversion described by the command line.
pub fn run_convert(cli: &Cli) -> ExitCode {
    let (mut config, root) = match resolve_config(cli.config.as_deref()) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(config_exit_code(&e));
        }
    };

    let overrides = CliOverrides {
        prefix: cli.prefix.clone(),
        src: cli.src.clone(),
        out: cli.out.clone(),
        on_collision: cli.on_collision,
    };
    merge_cli_overrides(&mut config, &overrides);

    if let Err(e) = check_config(&config) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let src_dir = resolve_path(&root, &config.convert.src);
    if !src_dir.is_dir() {
        eprintln!("Error: Source directory not found: {}", src_dir.display());
        eprintln!("Specify a different path with --src");
        return ExitCode::from(EXIT_ERROR);
    }

    // Per-file lines would corrupt JSON output
    let context = ConvertContext::new(config, root).with_verbose(cli.verbose && !cli.json);
    let converter = Converter::new(context).with_dry_run(cli.dry_run);

    match converter.run() {
        Ok(result) => {
            if cli.json {
                match serde_json::to_string_pretty(&result.to_json()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: failed to serialize result: {}", e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                if cli.dry_run {
                    print_plan(&src_dir, &result);
                }
                println!("{}", result.summary());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Conversion error: {}", e);
            if let Some(path) = e.path() {
                eprintln!("  while processing {}", path.display());
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Load the explicit or discovered config and pick the project root.
///
/// Relative paths in the config resolve against the directory holding it;
/// without a config file they resolve against the working directory.
fn resolve_config(explicit: Option<&Path>) -> Result<(SheetConfig, PathBuf), ConfigError> {
    let cwd = env::current_dir()?;

    let config_path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(path) => {
            log::info!("Using config: {}", path.display());
            let config = load_config(Some(&path))?;
            let root = project_root(&path)
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(|dir| resolve_path(&cwd, dir))
                .unwrap_or(cwd);
            Ok((config, root))
        }
        None => {
            log::info!("No sheetconv.toml found, using defaults");
            Ok((default_config(), cwd))
        }
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::Parse(_) | ConfigError::Validation(_) => EXIT_INVALID_ARGS,
        _ => EXIT_ERROR,
    }
}

fn print_plan(src_dir: &Path, result: &ConvertResult) {
    println!("Dry run - would convert:");
    println!("  Source: {}", src_dir.display());
    println!("  Output: {}", result.out_dir.display());
    for entry in &result.entries {
        match &entry.image {
            Some(image) => println!(
                "    - {} -> {} (+ {})",
                entry.source.display(),
                entry.sheet.display(),
                image.display()
            ),
            None => println!("    - {} -> {}", entry.source.display(), entry.sheet.display()),
        }
    }
}
