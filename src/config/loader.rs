//! Configuration loading and discovery for `sheetconv.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{CollisionPolicy, SheetConfig, CONFIG_FILE_NAME};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse sheetconv.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override prefix fragment
    pub prefix: Option<String>,
    /// Override source directory
    pub src: Option<PathBuf>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override collision policy
    pub on_collision: Option<CollisionPolicy>,
}

/// Find sheetconv.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a sheetconv.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find sheetconv.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a sheetconv.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("art/sheetconv.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<SheetConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<SheetConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SheetConfig = toml::from_str(&contents)?;
    check_config(&config)?;
    Ok(config)
}

/// Run schema validation, folding any problems into a `ConfigError`.
pub fn check_config(config: &SheetConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Configuration used when no sheetconv.toml is found.
pub fn default_config() -> SheetConfig {
    SheetConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut SheetConfig, overrides: &CliOverrides) {
    if let Some(ref prefix) = overrides.prefix {
        config.convert.prefix = prefix.clone();
    }

    if let Some(ref src) = overrides.src {
        config.convert.src = src.clone();
    }

    if let Some(ref out) = overrides.out {
        config.convert.out = out.clone();
    }

    if let Some(policy) = overrides.on_collision {
        config.convert.on_collision = policy;
    }
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the sheetconv.toml file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// Absolute paths are returned unchanged and `.` resolves to the root itself.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if path == Path::new(".") {
        project_root.to_path_buf()
    } else {
        project_root.join(path)
    }
}
