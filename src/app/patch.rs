// logtriage - app/patch.rs
//
// patch-fixtures flow: walk the fixture directory, rewrite each matching
// file in place when the patch changes it, report per-file modifications
// and a summary count.
//
// Per-file read/write errors are non-fatal: the file is skipped and the run
// continues with the rest of the tree.

use crate::config::AppConfig;
use crate::core::fixture;
use crate::util::error::{FixtureError, Result};
use std::fs;
use std::io::Write;

/// Outcome of a completed patch run.
#[derive(Debug)]
pub struct PatchSummary {
    /// Files that matched the fixture glob and were examined.
    pub files_scanned: usize,

    /// Files rewritten in place.
    pub files_modified: usize,
}

/// Run the patch over the configured fixture tree.
///
/// Returns `Ok(None)` when the fixture directory does not exist (the binary
/// exits nonzero for that case); otherwise the summary of the run.
pub fn run<W: Write>(config: &AppConfig, out: &mut W) -> Result<Option<PatchSummary>> {
    let dir = &config.fixture_dir;

    if !dir.is_dir() {
        writeln!(out, "Test directory not found: {}", dir.display())
            .map_err(|e| write_err(dir.clone(), e))?;
        return Ok(None);
    }

    let pattern =
        glob::Pattern::new(&config.fixture_pattern).map_err(|e| FixtureError::InvalidPattern {
            pattern: config.fixture_pattern.clone(),
            source: e,
        })?;

    tracing::info!(
        dir = %dir.display(),
        pattern = %config.fixture_pattern,
        "Fixture patch starting"
    );

    let mut summary = PatchSummary {
        files_scanned: 0,
        files_modified: 0,
    };

    let walker = walkdir::WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot access entry, skipping");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = match entry.file_name().to_str() {
            Some(n) => n,
            None => continue,
        };
        if !pattern.matches(name) {
            continue;
        }

        summary.files_scanned += 1;
        let path = entry.path();

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable file");
                continue;
            }
        };

        if let Some(patched) = fixture::patch_content(&content) {
            if let Err(e) = fs::write(path, patched) {
                tracing::warn!(file = %path.display(), error = %e, "Skipping unwritable file");
                continue;
            }
            writeln!(out, "Modified: {}", path.display())
                .map_err(|e| write_err(path.to_path_buf(), e))?;
            summary.files_modified += 1;
        }
    }

    writeln!(out, "\nTotal files modified: {}", summary.files_modified)
        .map_err(|e| write_err(dir.clone(), e))?;

    tracing::info!(
        scanned = summary.files_scanned,
        modified = summary.files_modified,
        "Fixture patch finished"
    );

    Ok(Some(summary))
}

fn write_err(path: std::path::PathBuf, source: std::io::Error) -> crate::util::error::TriageError {
    FixtureError::Io { path, source }.into()
}
