//! Conversion result types.
//!
//! Contains types for representing the outcome of a conversion run.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Result of converting one metadata file.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResult {
    /// Shared base name
    pub base: String,
    /// Source metadata file
    pub source: PathBuf,
    /// Converted sheet in the output directory
    pub sheet: PathBuf,
    /// Copied image in the output directory, if the source had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

/// Two inputs that were written to the same output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    /// Output file name both inputs map to
    pub output: String,
    /// Input whose copy was overwritten
    pub replaced: PathBuf,
    /// Input whose copy was kept
    pub kept: PathBuf,
}

impl std::fmt::Display for Collision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} overwrote {}",
            self.output,
            self.kept.display(),
            self.replaced.display()
        )
    }
}

/// Result of a complete conversion run.
#[derive(Debug, Default, Serialize)]
pub struct ConvertResult {
    /// Output directory
    pub out_dir: PathBuf,
    /// One entry per discovered metadata file, in enumeration order
    pub entries: Vec<EntryResult>,
    /// Output name collisions, in the order they happened
    pub collisions: Vec<Collision>,
    /// Number of sheets that received a prefix
    pub sheets_written: usize,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Total run duration
    #[serde(skip)]
    pub total_duration: Duration,
}

impl ConvertResult {
    /// Create a new empty result for an output directory.
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir, ..Self::default() }
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Number of metadata files converted.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of images copied.
    pub fn image_count(&self) -> usize {
        self.entries.iter().filter(|e| e.image.is_some()).count()
    }

    /// Entries without a sibling image.
    pub fn missing_images(&self) -> Vec<&EntryResult> {
        self.entries.iter().filter(|e| e.image.is_none()).collect()
    }

    /// Whether any input overwrote another.
    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }

    /// Machine-readable form of the result.
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "duration_ms".to_string(),
                serde_json::Value::from(self.total_duration.as_millis() as u64),
            );
        }
        value
    }

    /// Format a summary of the result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        if self.dry_run {
            lines.push(format!(
                "Dry run: would convert {} sprite sheets ({} images) into {}",
                self.entry_count(),
                self.image_count(),
                self.out_dir.display()
            ));
        } else {
            lines.push(format!(
                "Converted {} sprite sheets ({} images) into {} in {:?}",
                self.entry_count(),
                self.image_count(),
                self.out_dir.display(),
                self.total_duration
            ));
        }

        let missing = self.missing_images();
        if !missing.is_empty() {
            lines.push(format!("Missing images ({}):", missing.len()));
            for entry in missing.iter().take(5) {
                lines.push(format!("  - {}", entry.source.display()));
            }
            if missing.len() > 5 {
                lines.push(format!("  ... and {} more", missing.len() - 5));
            }
        }

        if self.has_collisions() {
            lines.push(format!("Collisions ({}):", self.collisions.len()));
            for collision in &self.collisions {
                lines.push(format!("  - {}", collision));
            }
        }

        lines.join("\n")
    }
}
