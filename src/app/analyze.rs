// logtriage - app/analyze.rs
//
// analyze-errors flow: read the error log, run the pattern analysis,
// render the report to the caller's writer.

use crate::config::AppConfig;
use crate::core::report;
use crate::util::error::{ReportError, Result};
use std::io::Write;

/// Run the error-log analysis and render the report.
///
/// The report goes to `out` (stdout in the binary, a buffer in tests).
pub fn run<W: Write>(config: &AppConfig, out: &mut W) -> Result<()> {
    let path = &config.error_log;

    tracing::info!(path = %path.display(), "Analysing error log");

    let content = std::fs::read_to_string(path).map_err(|e| ReportError::Io {
        path: path.clone(),
        operation: "read",
        source: e,
    })?;
    let lines: Vec<&str> = content.lines().collect();

    let analysis = report::analyze(&content, &lines, report::BUILTIN_PATTERNS);
    report::write_report(&analysis, &lines, out).map_err(|e| ReportError::Io {
        path: path.clone(),
        operation: "report",
        source: e,
    })?;

    tracing::info!(
        lines = lines.len(),
        chunks = analysis.chunk_count,
        "Analysis finished"
    );
    Ok(())
}
