//! Output naming and prefix construction.
//!
//! Base names come from a fixed-length suffix strip of the file name, never
//! from general extension parsing: `walk.cycle.png.txt` has base `walk.cycle`.

use crate::config::NamingConfig;
use std::path::{Path, PathBuf};

/// Strip the metadata suffix from a file name.
///
/// Returns `None` if the name does not end with the suffix or nothing
/// would remain.
pub fn base_name<'a>(file_name: &'a str, metadata_suffix: &str) -> Option<&'a str> {
    file_name.strip_suffix(metadata_suffix).filter(|base| !base.is_empty())
}

/// Path of the image paired with a metadata file.
///
/// Only the trailing text extension is removed, so the image is looked up in
/// the metadata file's own directory.
pub fn image_path(metadata: &Path, naming: &NamingConfig) -> Option<PathBuf> {
    let file_name = metadata.file_name()?.to_str()?;
    let image_name = file_name.strip_suffix(naming.text_extension())?;
    Some(metadata.with_file_name(image_name))
}

/// File name of a converted sheet (`hero.flxspritesheet`).
pub fn sheet_file_name(base: &str, naming: &NamingConfig) -> String {
    format!("{}.{}", base, naming.target_extension)
}

/// File name of the image referenced by a sheet (`hero.png`).
pub fn image_file_name(base: &str, naming: &NamingConfig) -> String {
    format!("{}.{}", base, naming.image_extension)
}

/// Text written in front of a sheet's contents.
///
/// The fragment is used as given; the trailing space separates the image
/// path from the original metadata.
pub fn sheet_prefix(fragment: &str, base: &str, naming: &NamingConfig) -> String {
    format!("{}{} ", fragment, image_file_name(base, naming))
}
