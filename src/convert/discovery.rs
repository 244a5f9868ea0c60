//! Metadata file discovery.
//!
//! Finds `<base>.png.txt` files under the source root and pairs each one
//! with its sibling `<base>.png`, when present.

use crate::config::NamingConfig;
use crate::convert::naming::{base_name, image_path};
use crate::convert::{ConvertContext, ConvertError};
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// A discovered metadata file and its optional image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetPair {
    /// The metadata file (`Art/hero.png.txt`)
    pub metadata: PathBuf,
    /// Base name shared by metadata and image (`hero`)
    pub base: String,
    /// The sibling image, if it exists as a file
    pub image: Option<PathBuf>,
}

/// Ordered list of pairs to convert.
#[derive(Debug, Default)]
pub struct ConvertPlan {
    pairs: Vec<SheetPair>,
}

impl ConvertPlan {
    /// Create a plan from pairs in enumeration order.
    pub fn new(pairs: Vec<SheetPair>) -> Self {
        Self { pairs }
    }

    /// Pairs in enumeration order.
    pub fn pairs(&self) -> &[SheetPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Match options used for discovery.
///
/// Hidden files and directories are skipped unless named literally.
fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    }
}

/// Build a glob pattern rooted at `dir`, escaping the directory itself.
fn rooted_pattern(dir: &Path, tail: &str) -> String {
    let escaped = Pattern::escape(&dir.to_string_lossy());
    format!("{}/{}", escaped.trim_end_matches('/'), tail)
}

/// Glob for files under `dir` matching `tail`, sorted.
///
/// Unreadable entries are logged and skipped.
pub(crate) fn glob_files(dir: &Path, tail: &str) -> Result<Vec<PathBuf>, ConvertError> {
    let pattern = rooted_pattern(dir, tail);
    let paths = glob_with(&pattern, match_options())
        .map_err(|source| ConvertError::Pattern { pattern: pattern.clone(), source })?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => log::warn!("Skipping unreadable path: {}", e),
        }
    }

    files.sort();
    Ok(files)
}

/// Discover metadata files anywhere under `src_dir`.
///
/// Files inside `exclude` (the output directory) are never returned.
pub fn discover_metadata_files(
    src_dir: &Path,
    naming: &NamingConfig,
    exclude: &Path,
) -> Result<Vec<PathBuf>, ConvertError> {
    let tail = format!("**/*{}", Pattern::escape(&naming.metadata_suffix));
    let mut files = glob_files(src_dir, &tail)?;
    files.retain(|path| !path.starts_with(exclude) && !is_hidden_below(path, src_dir));
    Ok(files)
}

/// Whether any component of `path` below `root` is a dotfile or dot-directory.
fn is_hidden_below(path: &Path, root: &Path) -> bool {
    path.strip_prefix(root)
        .map(|rel| {
            rel.components().any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
        })
        .unwrap_or(false)
}

/// Pair a metadata file with its image.
///
/// Returns `Ok(None)` when the file name does not carry the metadata suffix.
pub fn pair_metadata_file(
    metadata: &Path,
    naming: &NamingConfig,
) -> Result<Option<SheetPair>, ConvertError> {
    let file_name = metadata
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ConvertError::FileName { path: metadata.to_path_buf() })?;

    let Some(base) = base_name(file_name, &naming.metadata_suffix) else {
        return Ok(None);
    };

    let image = image_path(metadata, naming).filter(|p| p.is_file());

    Ok(Some(SheetPair { metadata: metadata.to_path_buf(), base: base.to_string(), image }))
}

/// Create a conversion plan for the context's source tree.
pub fn create_convert_plan(ctx: &ConvertContext) -> Result<ConvertPlan, ConvertError> {
    let files = discover_metadata_files(&ctx.src_dir(), ctx.naming(), &ctx.out_dir())?;

    let mut pairs = Vec::with_capacity(files.len());
    for file in files {
        if let Some(pair) = pair_metadata_file(&file, ctx.naming())? {
            pairs.push(pair);
        }
    }

    Ok(ConvertPlan::new(pairs))
}
