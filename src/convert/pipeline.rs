//! Conversion pipeline.
//!
//! A run has three steps:
//! 1. reset the output directory,
//! 2. stage every discovered metadata file (and its image) into it,
//! 3. prefix every staged sheet with the path of its image.

use crate::config::CollisionPolicy;
use crate::convert::discovery::{create_convert_plan, glob_files, SheetPair};
use crate::convert::naming::{image_file_name, sheet_file_name, sheet_prefix};
use crate::convert::{Collision, ConvertContext, ConvertError, ConvertResult, EntryResult};
use glob::Pattern;
use std::collections::HashMap;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

/// Converter for one source tree.
pub struct Converter {
    /// Conversion context
    context: ConvertContext,
    /// Whether to plan only (don't touch the filesystem)
    dry_run: bool,
}

impl Converter {
    /// Create a new converter.
    pub fn new(context: ConvertContext) -> Self {
        Self { context, dry_run: false }
    }

    /// Set dry-run mode (don't actually convert).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the conversion.
    ///
    /// Aborts on the first failure; the output directory may then be
    /// partially populated until the next successful run resets it.
    pub fn run(&self) -> Result<ConvertResult, ConvertError> {
        let start = Instant::now();
        let src_dir = self.context.src_dir();
        let out_dir = self.context.out_dir();

        if !self.dry_run {
            if resolve_on_disk(&src_dir).starts_with(resolve_on_disk(&out_dir)) {
                return Err(ConvertError::UnsafeOutput { path: out_dir });
            }
            reset_output_dir(&out_dir)?;
            log::info!("Reset output directory {}", out_dir.display());
        }

        let plan = create_convert_plan(&self.context)?;
        log::info!("Found {} metadata files under {}", plan.len(), src_dir.display());

        let mut result = ConvertResult::new(out_dir.clone());
        result.dry_run = self.dry_run;

        let mut claims = OutputClaims::new(self.context.collision_policy());
        for pair in plan.pairs() {
            let entry = self.stage_pair(pair, &out_dir, &mut claims)?;
            result.entries.push(entry);
        }
        result.collisions = claims.into_collisions();

        if !self.dry_run {
            result.sheets_written = self.prefix_sheets(&out_dir)?;
        }

        Ok(result.with_duration(start.elapsed()))
    }

    /// Copy one metadata file (renamed) and its image into the output directory.
    fn stage_pair(
        &self,
        pair: &SheetPair,
        out_dir: &Path,
        claims: &mut OutputClaims,
    ) -> Result<EntryResult, ConvertError> {
        let naming = self.context.naming();

        // Claim both names before copying anything so a collision error
        // leaves the earlier copies intact.
        let sheet_name = sheet_file_name(&pair.base, naming);
        claims.claim(&sheet_name, &pair.metadata)?;
        let image_name = match &pair.image {
            Some(image) => {
                let name = image_file_name(&pair.base, naming);
                claims.claim(&name, image)?;
                Some(name)
            }
            None => None,
        };

        let sheet = out_dir.join(&sheet_name);
        let image_out = image_name.map(|name| out_dir.join(name));

        if !self.dry_run {
            copy_preserving(&pair.metadata, &sheet)?;
            if let (Some(image), Some(dest)) = (&pair.image, &image_out) {
                copy_preserving(image, dest)?;
            }
        }

        log::debug!("{} -> {}", pair.metadata.display(), sheet.display());
        if self.context.is_verbose() {
            let image_note = match &image_out {
                Some(dest) => format!("+ {}", file_name(dest)),
                None => "no image".to_string(),
            };
            println!("  {} -> {} ({})", pair.metadata.display(), sheet_name, image_note);
        }

        Ok(EntryResult {
            base: pair.base.clone(),
            source: pair.metadata.clone(),
            sheet,
            image: image_out,
        })
    }

    /// Prefix every sheet directly inside the output directory.
    ///
    /// Returns the number of sheets rewritten.
    fn prefix_sheets(&self, out_dir: &Path) -> Result<usize, ConvertError> {
        let naming = self.context.naming();
        let fragment = self.context.prefix();
        let tail = format!("*.{}", Pattern::escape(&naming.target_extension));

        let sheets = glob_files(out_dir, &tail)?;
        for sheet in &sheets {
            let base = sheet
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| ConvertError::FileName { path: sheet.clone() })?;
            prefix_sheet(sheet, &sheet_prefix(&fragment, base, naming))?;
        }

        Ok(sheets.len())
    }
}

/// Tracks which input owns each output file name.
struct OutputClaims {
    policy: CollisionPolicy,
    owners: HashMap<String, PathBuf>,
    collisions: Vec<Collision>,
}

impl OutputClaims {
    fn new(policy: CollisionPolicy) -> Self {
        Self { policy, owners: HashMap::new(), collisions: Vec::new() }
    }

    /// Record `source` as the owner of `output`, applying the collision policy
    /// if another input already owns it.
    fn claim(&mut self, output: &str, source: &Path) -> Result<(), ConvertError> {
        let previous = self.owners.insert(output.to_string(), source.to_path_buf());
        match previous {
            Some(previous) if previous != source => match self.policy {
                CollisionPolicy::Error => Err(ConvertError::Collision {
                    output: output.to_string(),
                    first: previous,
                    second: source.to_path_buf(),
                }),
                CollisionPolicy::Warn => {
                    log::warn!(
                        "{} overwrites {} in the output directory ({} maps to the same name)",
                        source.display(),
                        output,
                        previous.display()
                    );
                    self.collisions.push(Collision {
                        output: output.to_string(),
                        replaced: previous,
                        kept: source.to_path_buf(),
                    });
                    Ok(())
                }
            },
            _ => Ok(()),
        }
    }

    fn into_collisions(self) -> Vec<Collision> {
        self.collisions
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Resolve `path` to the directory the filesystem would act on.
///
/// The longest existing prefix is canonicalized (following symlinks); `.` and
/// `..` in the remainder are folded lexically.
fn resolve_on_disk(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut rest = Vec::new();
    let mut resolved = loop {
        if let Ok(canonical) = existing.canonicalize() {
            break canonical;
        }
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                rest.push(last);
                existing = parent;
            }
            _ => {
                rest.extend(existing.components().rev());
                break PathBuf::new();
            }
        }
    };

    for component in rest.into_iter().rev() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
}

/// Delete the output directory if it exists, then recreate it empty.
pub fn reset_output_dir(out_dir: &Path) -> Result<(), ConvertError> {
    let reset_err =
        |source: io::Error| ConvertError::ResetOutput { path: out_dir.to_path_buf(), source };

    if out_dir.exists() {
        fs::remove_dir_all(out_dir).map_err(reset_err)?;
    }
    fs::create_dir_all(out_dir).map_err(reset_err)
}

/// Copy a file, keeping its permissions and access/modification times.
pub fn copy_preserving(from: &Path, to: &Path) -> Result<u64, ConvertError> {
    let copy_err = |source: io::Error| ConvertError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    // fs::copy carries the permission bits over
    let bytes = fs::copy(from, to).map_err(copy_err)?;

    let metadata = fs::metadata(from).map_err(copy_err)?;
    let mut times = FileTimes::new().set_modified(metadata.modified().map_err(copy_err)?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    // A read-only copy can still have its times set through a read handle on unix
    let dest =
        File::options().write(true).open(to).or_else(|_| File::open(to)).map_err(copy_err)?;
    dest.set_times(times).map_err(copy_err)?;

    Ok(bytes)
}

/// Prepend `prefix` to the text content of `path`.
pub fn prefix_sheet(path: &Path, prefix: &str) -> Result<(), ConvertError> {
    let content = fs::read_to_string(path).map_err(|e| ConvertError::read(path, e))?;
    fs::write(path, format!("{}{}", prefix, content))
        .map_err(|source| ConvertError::Write { path: path.to_path_buf(), source })
}
