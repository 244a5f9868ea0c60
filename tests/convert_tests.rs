//! Conversion integration tests.
//!
//! Runs the full reset / stage / prefix pipeline against temporary trees
//! laid out like an exported art folder.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sheetconv::config::{default_config, CollisionPolicy, SheetConfig};
use sheetconv::convert::{ConvertContext, ConvertError, ConvertResult, Converter};

// ============================================================================
// Test Utilities
// ============================================================================

/// Create a test file with content.
fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut file = File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn run_with(root: &Path, config: SheetConfig) -> Result<ConvertResult, ConvertError> {
    Converter::new(ConvertContext::new(config, root.to_path_buf())).run()
}

fn run(root: &Path) -> ConvertResult {
    run_with(root, default_config()).expect("conversion should succeed")
}

/// Snapshot of a directory: file name -> bytes.
fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (entry.file_name().to_string_lossy().into_owned(), fs::read(entry.path()).unwrap())
        })
        .collect()
}

/// A small tree with nested folders, one sheet missing its image.
fn create_art_folder(root: &Path) {
    create_test_file(root, "Characters/hero.png.txt", b"idle 0 0 32 32\nrun 32 0 32 32\n");
    create_test_file(root, "Characters/hero.png", b"\x89PNG hero");
    create_test_file(root, "Enemies/Slime/slime.png.txt", b"bounce 0 0 16 16\n");
    create_test_file(root, "Enemies/Slime/slime.png", b"\x89PNG slime");
    create_test_file(root, "Props/barrel.png.txt", b"roll 0 0 8 8\n");
    create_test_file(root, "Props/readme.txt", b"not a sheet");
    create_test_file(root, "Props/barrel_old.png", b"\x89PNG unrelated");
}

// ============================================================================
// Output contents
// ============================================================================

#[test]
fn test_example_pair() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "foo.png.txt", b"C");
    create_test_file(temp.path(), "foo.png", b"\x89PNG\r\n\x1a\nbytes");

    run(temp.path());

    let out = temp.path().join("out");
    assert_eq!(
        fs::read_to_string(out.join("foo.flxspritesheet")).unwrap(),
        "/images/spritesheets/foo.png C"
    );
    assert_eq!(
        fs::read(out.join("foo.png")).unwrap(),
        fs::read(temp.path().join("foo.png")).unwrap()
    );
}

#[test]
fn test_art_folder_is_flattened() {
    let temp = TempDir::new().unwrap();
    create_art_folder(temp.path());

    let result = run(temp.path());

    let files = snapshot(&temp.path().join("out"));
    let names: Vec<_> = files.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "barrel.flxspritesheet",
            "hero.flxspritesheet",
            "hero.png",
            "slime.flxspritesheet",
            "slime.png"
        ]
    );
    assert_eq!(
        files["hero.flxspritesheet"],
        b"/images/spritesheets/hero.png idle 0 0 32 32\nrun 32 0 32 32\n"
    );
    assert_eq!(result.entry_count(), 3);
    assert_eq!(result.image_count(), 2);
    assert_eq!(result.sheets_written, 3);
}

#[test]
fn test_missing_image_still_prefixed() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "Props/barrel.png.txt", b"roll");

    let result = run(temp.path());

    let out = temp.path().join("out");
    assert!(!out.join("barrel.png").exists());
    assert_eq!(
        fs::read_to_string(out.join("barrel.flxspritesheet")).unwrap(),
        "/images/spritesheets/barrel.png roll"
    );
    assert_eq!(result.missing_images().len(), 1);
}

#[test]
fn test_dotted_base_name() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "walk.cycle.png.txt", b"w");
    create_test_file(temp.path(), "walk.cycle.png", b"img");

    run(temp.path());

    let out = temp.path().join("out");
    assert_eq!(
        fs::read_to_string(out.join("walk.cycle.flxspritesheet")).unwrap(),
        "/images/spritesheets/walk.cycle.png w"
    );
    assert!(out.join("walk.cycle.png").exists());
}

#[test]
fn test_custom_prefix_is_normalized() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "hero.png.txt", b"x");

    let mut config = default_config();
    config.convert.prefix = "assets\\images".to_string();
    run_with(temp.path(), config).unwrap();

    assert_eq!(
        fs::read_to_string(temp.path().join("out/hero.flxspritesheet")).unwrap(),
        "assets/images/hero.png x"
    );
}

#[test]
fn test_custom_naming() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "ui/button.webp.atlas", b"up 0 0 4 4");
    create_test_file(temp.path(), "ui/button.webp", b"RIFF");

    let config: SheetConfig = toml::from_str(
        r#"
[convert]
prefix = "res://ui/"
out = "build/sheets"

[naming]
metadata_suffix = ".webp.atlas"
image_extension = "webp"
target_extension = "sheet"
"#,
    )
    .unwrap();
    run_with(temp.path(), config).unwrap();

    let out = temp.path().join("build/sheets");
    assert_eq!(
        fs::read_to_string(out.join("button.sheet")).unwrap(),
        "res://ui/button.webp up 0 0 4 4"
    );
    assert_eq!(fs::read(out.join("button.webp")).unwrap(), b"RIFF");
}

// ============================================================================
// Run lifecycle
// ============================================================================

#[test]
fn test_idempotent() {
    let temp = TempDir::new().unwrap();
    create_art_folder(temp.path());

    run(temp.path());
    let first = snapshot(&temp.path().join("out"));
    run(temp.path());
    let second = snapshot(&temp.path().join("out"));

    assert_eq!(first, second);
}

#[test]
fn test_empty_tree_creates_empty_out() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "notes.txt", b"nothing here");

    let result = run(temp.path());

    let out = temp.path().join("out");
    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    assert_eq!(result.entry_count(), 0);
}

#[test]
fn test_stale_output_removed() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "hero.png.txt", b"x");
    create_test_file(temp.path(), "out/old.flxspritesheet", b"stale");
    create_test_file(temp.path(), "out/nested/old.png", b"stale");

    run(temp.path());

    let names: Vec<_> = snapshot(&temp.path().join("out")).into_keys().collect();
    assert_eq!(names, vec!["hero.flxspritesheet".to_string()]);
}

#[test]
fn test_sources_are_untouched() {
    let temp = TempDir::new().unwrap();
    create_art_folder(temp.path());

    run(temp.path());

    assert_eq!(
        fs::read(temp.path().join("Characters/hero.png.txt")).unwrap(),
        b"idle 0 0 32 32\nrun 32 0 32 32\n"
    );
}

// ============================================================================
// Collisions
// ============================================================================

#[test]
fn test_collision_last_enumerated_wins() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "a/x.png.txt", b"A");
    create_test_file(temp.path(), "a/x.png", b"image A");
    create_test_file(temp.path(), "b/x.png.txt", b"B");
    create_test_file(temp.path(), "b/x.png", b"image B");

    let result = run(temp.path());

    let files = snapshot(&temp.path().join("out"));
    assert_eq!(files.len(), 2);
    assert_eq!(files["x.flxspritesheet"], b"/images/spritesheets/x.png B");
    assert_eq!(files["x.png"], b"image B");

    let outputs: Vec<_> = result.collisions.iter().map(|c| c.output.as_str()).collect();
    assert_eq!(outputs, vec!["x.flxspritesheet", "x.png"]);
}

#[test]
fn test_collision_error_policy() {
    let temp = TempDir::new().unwrap();
    create_test_file(temp.path(), "a/x.png.txt", b"A");
    create_test_file(temp.path(), "b/x.png.txt", b"B");

    let mut config = default_config();
    config.convert.on_collision = CollisionPolicy::Error;
    let err = run_with(temp.path(), config).unwrap_err();

    assert!(matches!(err, ConvertError::Collision { .. }));
    assert_eq!(err.path(), Some(temp.path().join("b/x.png.txt").as_path()));
}

// ============================================================================
// Dry run
// ============================================================================

#[test]
fn test_dry_run_plans_without_writing() {
    let temp = TempDir::new().unwrap();
    create_art_folder(temp.path());

    let context = ConvertContext::new(default_config(), temp.path().to_path_buf());
    let result = Converter::new(context).with_dry_run(true).run().unwrap();

    assert!(!temp.path().join("out").exists());
    assert_eq!(result.entry_count(), 3);
    assert_eq!(result.image_count(), 2);
    assert!(result.summary().contains("would convert 3 sprite sheets"));
}
