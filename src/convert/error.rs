//! Conversion error type.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error raised while converting a tree of sprite sheets.
///
/// Every variant names the file or directory that was being processed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// Output directory could not be removed or recreated
    #[error("Failed to reset output directory {}: {source}", path.display())]
    ResetOutput { path: PathBuf, source: io::Error },
    /// Output directory would swallow the source tree when reset
    #[error("Refusing to reset {}: it contains the source directory", path.display())]
    UnsafeOutput { path: PathBuf },
    /// Discovery pattern could not be compiled
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern { pattern: String, source: glob::PatternError },
    /// File name is not valid UTF-8 and cannot be renamed
    #[error("File name is not valid UTF-8: {}", path.display())]
    FileName { path: PathBuf },
    /// File could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    /// File contents are not valid UTF-8 text
    #[error("{} is not valid UTF-8 text", path.display())]
    Decode { path: PathBuf },
    /// File could not be copied into the output directory
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy { from: PathBuf, to: PathBuf, source: io::Error },
    /// Output file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    /// Two inputs map to the same output file
    #[error(
        "Output collision on '{output}': {} and {} both map to it",
        first.display(),
        second.display()
    )]
    Collision { output: String, first: PathBuf, second: PathBuf },
}

impl ConvertError {
    /// The file being processed when the error occurred, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConvertError::ResetOutput { path, .. }
            | ConvertError::UnsafeOutput { path }
            | ConvertError::FileName { path }
            | ConvertError::Read { path, .. }
            | ConvertError::Decode { path }
            | ConvertError::Write { path, .. } => Some(path),
            ConvertError::Copy { from, .. } => Some(from),
            ConvertError::Collision { second, .. } => Some(second),
            ConvertError::Pattern { .. } => None,
        }
    }

    /// Map a read failure, separating undecodable text from I/O errors.
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::InvalidData {
            ConvertError::Decode { path: path.to_path_buf() }
        } else {
            ConvertError::Read { path: path.to_path_buf(), source }
        }
    }
}
