// logtriage - tests/e2e_consolidate.rs
//
// End-to-end tests for the history consolidator.
//
// These tests exercise the real filesystem: real directory listings, real
// file reads and writes, and a real .tar.gz bundle that is decoded back to
// verify its contents -- no mocks, no stubs.

use chrono::NaiveDate;
use flate2::read::GzDecoder;
use logtriage::app::consolidate;
use logtriage::config::AppConfig;
use std::fs;
use std::io::Read;
use std::path::Path;
use tar::Archive;

// =============================================================================
// Helpers
// =============================================================================

/// The fixed "today" used by every test: 2025-09-06.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 6).expect("valid date")
}

fn config_for(dir: &Path) -> AppConfig {
    AppConfig {
        history_dir: dir.to_path_buf(),
        ..AppConfig::default()
    }
}

/// Read the single entry out of a .tar.gz bundle, returning (name, content).
fn read_bundle(path: &Path) -> (String, String) {
    let file = fs::File::open(path).expect("open bundle");
    let mut archive = Archive::new(GzDecoder::new(file));
    let mut entries = archive.entries().expect("bundle entries");

    let mut entry = entries
        .next()
        .expect("bundle must contain one entry")
        .expect("readable entry");
    let name = entry
        .path()
        .expect("entry path")
        .to_string_lossy()
        .into_owned();
    let mut content = String::new();
    entry.read_to_string(&mut content).expect("entry content");
    assert!(entries.next().is_none(), "bundle must hold exactly one file");

    (name, content)
}

// =============================================================================
// Consolidation E2E
// =============================================================================

/// A full run: aged files are folded into the output in name order, the
/// bundle round-trips, the archive copy exists, and the sources are deleted
/// while everything else survives.
#[test]
fn e2e_full_consolidation_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    fs::write(root.join("debug_20250901_0007.md"), "alpha\n").expect("write");
    fs::write(root.join("notes_20250902.md"), "beta\n").expect("write");
    fs::write(root.join("fresh_20250906.md"), "too new\n").expect("write");
    fs::write(root.join("undated.md"), "no date\n").expect("write");

    let mut out = Vec::new();
    let summary = consolidate::run(&config_for(root), today(), &mut out)
        .expect("run succeeds")
        .expect("work was done");

    assert_eq!(summary.consolidated, 2);

    // Output document: sections in filename order, original section format.
    let output = fs::read_to_string(&summary.output_path).expect("read output");
    assert_eq!(
        output,
        "# debug_20250901_0007.md\n\nalpha\n\n\n---\n\n# notes_20250902.md\n\nbeta\n\n\n---\n\n"
    );
    assert_eq!(
        summary.output_path.file_name().unwrap().to_str().unwrap(),
        "consolidated_history_20250906.md"
    );

    // Bundle beside the output, decodable, holding exactly the output file.
    let tar_path = root.join("consolidated_history_20250906.tar.gz");
    assert!(tar_path.exists(), "bundle must be created beside the output");
    let (entry_name, entry_content) = read_bundle(&tar_path);
    assert_eq!(entry_name, "consolidated_history_20250906.md");
    assert_eq!(entry_content, output);

    // Archive copy.
    assert_eq!(
        summary.archive_path,
        root.join("archive").join("consolidated_history_20250906.tar.gz")
    );
    assert!(summary.archive_path.exists());

    // Consumed sources are gone; everything else stays.
    assert!(!root.join("debug_20250901_0007.md").exists());
    assert!(!root.join("notes_20250902.md").exists());
    assert!(root.join("fresh_20250906.md").exists());
    assert!(root.join("undated.md").exists());
    assert!(summary.output_path.exists(), "consolidated .md is kept");

    // Diagnostics mirror the per-step messages.
    let printed = String::from_utf8(out).expect("utf8");
    assert!(printed.contains("Consolidated 2 files into"));
    assert!(printed.contains("Created tar archive:"));
    assert!(printed.contains("Copied to archive:"));
    assert!(printed.contains("Deleted input file: debug_20250901_0007.md"));
    assert!(printed.contains("Deleted input file: notes_20250902.md"));
}

/// The age comparison is strict: a file dated exactly DAYS_OLD days ago
/// stays, one dated DAYS_OLD + 1 days ago goes.
#[test]
fn e2e_age_boundary_is_strict() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    // today = 2025-09-06, days_old = 3, cutoff = 2025-09-03
    fs::write(root.join("on_cutoff_20250903.md"), "stays\n").expect("write");
    fs::write(root.join("past_cutoff_20250902.md"), "goes\n").expect("write");

    let mut out = Vec::new();
    let summary = consolidate::run(&config_for(root), today(), &mut out)
        .expect("run succeeds")
        .expect("work was done");

    assert_eq!(summary.consolidated, 1);
    assert!(root.join("on_cutoff_20250903.md").exists());
    assert!(!root.join("past_cutoff_20250902.md").exists());
}

/// Nothing qualifies: no output, no bundle, no deletions, just the message.
#[test]
fn e2e_nothing_to_consolidate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    fs::write(root.join("fresh_20250906.md"), "too new\n").expect("write");
    fs::write(root.join("undated.md"), "no date\n").expect("write");

    let mut out = Vec::new();
    let summary = consolidate::run(&config_for(root), today(), &mut out).expect("run succeeds");

    assert!(summary.is_none());
    assert!(root.join("fresh_20250906.md").exists());
    assert!(root.join("undated.md").exists());
    assert!(!root.join("archive").exists());

    let printed = String::from_utf8(out).expect("utf8");
    assert!(printed.contains("No files older than 3 days found."));
}

/// A missing history directory is a diagnostic, not an error.
#[test]
fn e2e_missing_directory_is_reported() {
    let config = AppConfig {
        history_dir: "/nonexistent/logtriage-history".into(),
        ..AppConfig::default()
    };

    let mut out = Vec::new();
    let summary = consolidate::run(&config, today(), &mut out).expect("run succeeds");
    assert!(summary.is_none());

    let printed = String::from_utf8(out).expect("utf8");
    assert!(printed.contains("does not exist"));
}

/// Files inside the archive subdirectory are never rescanned, even when
/// their names carry qualifying dates.
#[test]
fn e2e_archive_subdirectory_not_rescanned() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    let archive = root.join("archive");
    fs::create_dir(&archive).expect("mkdir");
    fs::write(archive.join("old_20240101.md"), "archived\n").expect("write");
    fs::write(root.join("old_20250801.md"), "current\n").expect("write");

    let mut out = Vec::new();
    let summary = consolidate::run(&config_for(root), today(), &mut out)
        .expect("run succeeds")
        .expect("work was done");

    assert_eq!(summary.consolidated, 1);
    assert!(
        archive.join("old_20240101.md").exists(),
        "archived file must be untouched"
    );
}
