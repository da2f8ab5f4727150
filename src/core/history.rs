// logtriage - core/history.rs
//
// Filename-date parsing, age filtering, and consolidated-document assembly
// for the history consolidator.
// Core layer: pure logic, no filesystem access; app::consolidate owns I/O.

use crate::util::constants;
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// First run of 8 consecutive digits anywhere in a filename.
fn date_run_regex() -> &'static Regex {
    static DATE_RUN: OnceLock<Regex> = OnceLock::new();
    DATE_RUN.get_or_init(|| Regex::new(r"\d{8}").expect("date run: invalid regex"))
}

/// Extract the date embedded in a history filename.
///
/// The first 8-digit run is parsed as YYYYMMDD; `None` when no such run
/// exists or the digits are not a real calendar date
/// (e.g. `debug_20250902_0007.md` -> 2025-09-02, `notes_99999999.md` -> None).
pub fn date_from_filename(name: &str) -> Option<NaiveDate> {
    let run = date_run_regex().find(name)?;
    NaiveDate::parse_from_str(run.as_str(), constants::FILENAME_DATE_FORMAT).ok()
}

/// True when `date` is strictly older than `days` days before `today`.
///
/// A file dated exactly `days` days ago is NOT old enough; one dated
/// `days + 1` days ago is.
pub fn is_older_than(date: NaiveDate, today: NaiveDate, days: i64) -> bool {
    date < today - Duration::days(days)
}

/// Select the history filenames due for consolidation.
///
/// A file qualifies when it carries the history extension, embeds a parseable
/// date, and that date is strictly older than the threshold. Results are
/// sorted by name so the consolidated document has a stable section order.
pub fn select_consolidatable(names: &[String], today: NaiveDate, days: i64) -> Vec<String> {
    let mut selected: Vec<String> = names
        .iter()
        .filter(|name| {
            std::path::Path::new(name.as_str())
                .extension()
                .is_some_and(|ext| ext == constants::HISTORY_EXTENSION)
        })
        .filter(|name| {
            date_from_filename(name).is_some_and(|date| is_older_than(date, today, days))
        })
        .cloned()
        .collect();
    selected.sort_unstable();
    selected
}

/// One source file's contribution to the consolidated document: a heading
/// with the original filename, the content, and a separator rule.
pub fn consolidated_section(name: &str, content: &str) -> String {
    format!("# {name}\n\n{content}\n\n---\n\n")
}

// =============================================================================
// Tests
// =============================================================================
