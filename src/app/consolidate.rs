// logtriage - app/consolidate.rs
//
// consolidate-history flow: list the history directory, select files whose
// embedded date is past the age threshold, concatenate them into one
// markdown file, bundle that file into a .tar.gz, copy the bundle into the
// archive subdirectory, then delete the consumed sources.
//
// Per-file read errors are non-fatal (the file is skipped); failures in the
// write/archive/copy/delete phases abort the remaining steps so sources are
// never deleted without a safely archived bundle.

use crate::config::AppConfig;
use crate::core::history;
use crate::util::constants;
use crate::util::error::{HistoryError, Result};
use chrono::NaiveDate;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Outcome of a completed consolidation run.
#[derive(Debug)]
pub struct ConsolidateSummary {
    /// Number of source files folded into the output.
    pub consolidated: usize,

    /// The consolidated markdown file (kept in place).
    pub output_path: PathBuf,

    /// The compressed bundle inside the archive directory.
    pub archive_path: PathBuf,

    /// Source files that were deleted after archiving.
    pub deleted: Vec<PathBuf>,
}

/// Run the consolidation.
///
/// `today` is injected so the age threshold and the output filename are
/// deterministic under test. Returns `Ok(None)` when there is nothing to do
/// (missing directory or no files past the threshold); diagnostics for those
/// cases go to `out`, matching the chatty style of a maintenance script.
pub fn run<W: Write>(
    config: &AppConfig,
    today: NaiveDate,
    out: &mut W,
) -> Result<Option<ConsolidateSummary>> {
    let dir = &config.history_dir;

    if !dir.is_dir() {
        writeln!(out, "Error: directory {} does not exist.", dir.display())
            .map_err(|e| write_err(dir.clone(), e))?;
        return Ok(None);
    }

    // Non-recursive listing: the archive subdirectory must never be rescanned.
    let mut names: Vec<String> = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot access directory entry, skipping");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => {
                tracing::warn!(path = %entry.path().display(), "Non-UTF-8 filename, skipping")
            }
        }
    }

    let selected = history::select_consolidatable(&names, today, config.days_old);
    if selected.is_empty() {
        writeln!(out, "No files older than {} days found.", config.days_old)
            .map_err(|e| write_err(dir.clone(), e))?;
        return Ok(None);
    }

    tracing::info!(
        candidates = names.len(),
        selected = selected.len(),
        days_old = config.days_old,
        "Consolidation starting"
    );

    // Concatenate. Unreadable files are reported and skipped; the run
    // continues with the remaining sources.
    let mut document = String::new();
    let mut consumed: Vec<PathBuf> = Vec::new();
    for name in &selected {
        let path = dir.join(name);
        match fs::read_to_string(&path) {
            Ok(content) => {
                document.push_str(&history::consolidated_section(name, &content));
                consumed.push(path);
            }
            Err(e) => {
                writeln!(out, "Error reading {name}: {e}").map_err(|e| write_err(path.clone(), e))?;
                tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable file");
            }
        }
    }

    let output_name = format!(
        "{}_{}.md",
        config.output_stem,
        today.format(constants::FILENAME_DATE_FORMAT)
    );
    let output_path = dir.join(&output_name);
    fs::write(&output_path, &document).map_err(|e| HistoryError::Io {
        path: output_path.clone(),
        operation: "write",
        source: e,
    })?;
    writeln!(
        out,
        "Consolidated {} files into {}",
        consumed.len(),
        output_path.display()
    )
    .map_err(|e| write_err(output_path.clone(), e))?;

    // Bundle the output file as <stem>_<date>.tar.gz next to it.
    let tar_path = output_path.with_extension("tar.gz");
    create_bundle(&output_path, &tar_path, &output_name)?;
    writeln!(out, "Created tar archive: {}", tar_path.display())
        .map_err(|e| write_err(tar_path.clone(), e))?;

    // Copy the bundle into the archive subdirectory.
    let archive_dir = dir.join(&config.archive_dir_name);
    fs::create_dir_all(&archive_dir).map_err(|e| HistoryError::Io {
        path: archive_dir.clone(),
        operation: "create archive directory",
        source: e,
    })?;
    let archive_path = archive_dir.join(
        tar_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("bundle.tar.gz")),
    );
    fs::copy(&tar_path, &archive_path).map_err(|e| HistoryError::Io {
        path: archive_path.clone(),
        operation: "copy to archive",
        source: e,
    })?;
    writeln!(out, "Copied to archive: {}", archive_path.display())
        .map_err(|e| write_err(archive_path.clone(), e))?;

    // Delete the consumed sources; the consolidated .md stays.
    let mut deleted = Vec::with_capacity(consumed.len());
    for path in consumed {
        fs::remove_file(&path).map_err(|e| HistoryError::Io {
            path: path.clone(),
            operation: "delete",
            source: e,
        })?;
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            writeln!(out, "Deleted input file: {name}").map_err(|e| write_err(path.clone(), e))?;
        }
        deleted.push(path);
    }

    tracing::info!(
        consolidated = deleted.len(),
        output = %output_path.display(),
        archive = %archive_path.display(),
        "Consolidation finished"
    );

    Ok(Some(ConsolidateSummary {
        consolidated: deleted.len(),
        output_path,
        archive_path,
        deleted,
    }))
}

/// Write `source` into a gzip-compressed tar at `tar_path`, stored under
/// `entry_name` (the bare filename, no directory components).
fn create_bundle(
    source: &std::path::Path,
    tar_path: &std::path::Path,
    entry_name: &str,
) -> Result<()> {
    let file = fs::File::create(tar_path).map_err(|e| HistoryError::Io {
        path: tar_path.to_path_buf(),
        operation: "create archive",
        source: e,
    })?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    builder
        .append_path_with_name(source, entry_name)
        .map_err(|e| HistoryError::Io {
            path: source.to_path_buf(),
            operation: "append to archive",
            source: e,
        })?;

    let encoder = builder.into_inner().map_err(|e| HistoryError::Io {
        path: tar_path.to_path_buf(),
        operation: "finish archive",
        source: e,
    })?;
    encoder.finish().map_err(|e| HistoryError::Io {
        path: tar_path.to_path_buf(),
        operation: "finish compression",
        source: e,
    })?;

    Ok(())
}

fn write_err(path: PathBuf, source: std::io::Error) -> crate::util::error::TriageError {
    HistoryError::Io {
        path,
        operation: "write diagnostics",
        source,
    }
    .into()
}
