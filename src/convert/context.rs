//! Conversion context containing configuration and resolved paths.

use crate::config::loader::resolve_path;
use crate::config::{CollisionPolicy, NamingConfig, SheetConfig};
use std::path::{Path, PathBuf};

/// Conversion context containing configuration and paths for a run.
///
/// Relative `src` and `out` paths are resolved against the project root,
/// which is the directory holding `sheetconv.toml` or the working directory
/// when no config file was found.
#[derive(Debug, Clone)]
pub struct ConvertContext {
    /// The loaded configuration
    config: SheetConfig,
    /// Project root directory
    project_root: PathBuf,
    /// Whether to log each staged file
    verbose: bool,
}

impl ConvertContext {
    /// Create a new conversion context.
    pub fn new(config: SheetConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, verbose: false }
    }

    /// Get the naming settings.
    pub fn naming(&self) -> &NamingConfig {
        &self.config.naming
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the source directory (resolved against the project root).
    pub fn src_dir(&self) -> PathBuf {
        resolve_path(&self.project_root, &self.config.convert.src)
    }

    /// Get the output directory (resolved against the project root).
    pub fn out_dir(&self) -> PathBuf {
        resolve_path(&self.project_root, &self.config.convert.out)
    }

    /// Normalized prefix fragment.
    pub fn prefix(&self) -> String {
        self.config.normalized_prefix()
    }

    /// Collision handling policy.
    pub fn collision_policy(&self) -> CollisionPolicy {
        self.config.convert.on_collision
    }

    /// Whether verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    #[test]
    fn test_context_default_paths() {
        let ctx = ConvertContext::new(default_config(), PathBuf::from("/art"));

        assert_eq!(ctx.project_root(), Path::new("/art"));
        assert_eq!(ctx.src_dir(), PathBuf::from("/art"));
        assert_eq!(ctx.out_dir(), PathBuf::from("/art/out"));
        assert!(!ctx.is_verbose());
    }

    #[test]
    fn test_context_absolute_out() {
        let mut config = default_config();
        config.convert.out = PathBuf::from("/game/assets/images/spritesheets");
        let ctx = ConvertContext::new(config, PathBuf::from("/art"));

        assert_eq!(ctx.out_dir(), PathBuf::from("/game/assets/images/spritesheets"));
    }

    #[test]
    fn test_context_prefix_is_normalized() {
        let mut config = default_config();
        config.convert.prefix = "images\\spritesheets".to_string();
        let ctx = ConvertContext::new(config, PathBuf::from("/art"));

        assert_eq!(ctx.prefix(), "images/spritesheets/");
    }

    #[test]
    fn test_context_with_verbose() {
        let ctx = ConvertContext::new(default_config(), PathBuf::from("/art")).with_verbose(true);
        assert!(ctx.is_verbose());
        assert_eq!(ctx.collision_policy(), CollisionPolicy::Warn);
    }
}
