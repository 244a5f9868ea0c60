//! Configuration schema types for `sheetconv.toml`
//!
//! Defines the structure and validation rules for converter configuration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the configuration file searched for by the loader.
pub const CONFIG_FILE_NAME: &str = "sheetconv.toml";

/// What to do when two inputs map to the same flat output file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Log a warning and let the later input overwrite the earlier one
    #[default]
    Warn,
    /// Abort the run before anything is overwritten
    Error,
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollisionPolicy::Warn => write!(f, "warn"),
            CollisionPolicy::Error => write!(f, "error"),
        }
    }
}

/// Conversion settings section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Path fragment written in front of the image name in every sheet
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Root of the tree scanned for metadata files
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Output directory, recreated on every run
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Handling of flat output name collisions
    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            src: default_src(),
            out: default_out(),
            on_collision: CollisionPolicy::default(),
        }
    }
}

fn default_prefix() -> String {
    "/images/spritesheets/".to_string()
}

fn default_src() -> PathBuf {
    PathBuf::from(".")
}

fn default_out() -> PathBuf {
    PathBuf::from("out")
}

/// File naming section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Double extension identifying metadata files
    #[serde(default = "default_metadata_suffix")]
    pub metadata_suffix: String,
    /// Extension of the image paired with each metadata file
    #[serde(default = "default_image_extension")]
    pub image_extension: String,
    /// Extension given to converted metadata files
    #[serde(default = "default_target_extension")]
    pub target_extension: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            metadata_suffix: default_metadata_suffix(),
            image_extension: default_image_extension(),
            target_extension: default_target_extension(),
        }
    }
}

fn default_metadata_suffix() -> String {
    ".png.txt".to_string()
}

fn default_image_extension() -> String {
    "png".to_string()
}

fn default_target_extension() -> String {
    "flxspritesheet".to_string()
}

impl NamingConfig {
    /// The trailing, metadata-only part of the suffix (`.txt` for `.png.txt`).
    ///
    /// Stripping it from a metadata path yields the sibling image path.
    pub fn text_extension(&self) -> &str {
        match self.metadata_suffix.rfind('.') {
            Some(idx) if idx > 0 => &self.metadata_suffix[idx..],
            _ => &self.metadata_suffix,
        }
    }
}

/// Complete `sheetconv.toml` configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Conversion settings
    #[serde(default)]
    pub convert: ConvertConfig,
    /// File naming settings
    #[serde(default)]
    pub naming: NamingConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "convert.prefix")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: '{}' {}", CONFIG_FILE_NAME, self.field, self.message)
    }
}

impl SheetConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let naming = &self.naming;

        if self.convert.prefix.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "convert.prefix".to_string(),
                message: "must be a non-empty path fragment".to_string(),
            });
        }

        if self.convert.out.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "convert.out".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        for (field, ext) in [
            ("naming.image_extension", &naming.image_extension),
            ("naming.target_extension", &naming.target_extension),
        ] {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a bare extension without dots or separators".to_string(),
                });
            }
        }

        if naming.image_extension == naming.target_extension {
            errors.push(ConfigValidationError {
                field: "naming.target_extension".to_string(),
                message: "must differ from naming.image_extension".to_string(),
            });
        }

        // ".<image_extension>.<text>" with a non-empty text extension
        let image_part = format!(".{}", naming.image_extension);
        let text_ok = naming
            .metadata_suffix
            .strip_prefix(&image_part)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|text| !text.is_empty() && !text.contains(['.', '/', '\\']));
        if !text_ok {
            errors.push(ConfigValidationError {
                field: "naming.metadata_suffix".to_string(),
                message: format!(
                    "must be '{}' followed by one more extension (e.g. '{}.txt')",
                    image_part, image_part
                ),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// The prefix fragment with `/` separators and a trailing `/`.
    pub fn normalized_prefix(&self) -> String {
        normalize_prefix(&self.convert.prefix)
    }
}

/// Normalize a prefix fragment: backslashes become `/` and a trailing `/` is
/// appended when missing.
pub fn normalize_prefix(raw: &str) -> String {
    let mut prefix = raw.trim().replace('\\', "/");
    if !prefix.is_empty() && !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}
