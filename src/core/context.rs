// logtriage - core/context.rs
//
// Context-window computation around pattern matches in a line buffer.
// Core layer: pure logic, no I/O beyond the caller-supplied writer.

use crate::util::error::ContextError;
use regex::Regex;
use std::io::{self, Write};

// =============================================================================
// Matching
// =============================================================================

/// How a line is tested against the user's pattern.
#[derive(Debug, Clone)]
pub enum PatternMatcher {
    /// Plain substring containment.
    Substring(String),

    /// Compiled regular expression search.
    Regex(Regex),
}

impl PatternMatcher {
    /// Build a substring matcher. Never fails.
    pub fn substring(pattern: &str) -> Self {
        Self::Substring(pattern.to_string())
    }

    /// Build a regex matcher, compiling the pattern.
    pub fn regex(pattern: &str) -> Result<Self, ContextError> {
        let regex = Regex::new(pattern).map_err(|e| ContextError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })?;
        Ok(Self::Regex(regex))
    }

    /// Test a single line.
    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Substring(needle) => line.contains(needle.as_str()),
            Self::Regex(regex) => regex.is_match(line),
        }
    }
}

/// Return the 0-based indices of all lines matching the pattern.
pub fn find_match_lines(lines: &[&str], matcher: &PatternMatcher) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| matcher.is_match(line))
        .map(|(idx, _)| idx)
        .collect()
}

// =============================================================================
// Ranges
// =============================================================================

/// An inclusive range of 0-based line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

/// Build one clamped context window per match line.
///
/// Each window spans `context` lines either side of the match, clamped to
/// `[0, line_count - 1]`. Returns an empty vector for an empty file.
pub fn ranges_around(match_lines: &[usize], context: usize, line_count: usize) -> Vec<LineRange> {
    if line_count == 0 {
        return Vec::new();
    }
    match_lines
        .iter()
        .map(|&idx| LineRange {
            start: idx.saturating_sub(context),
            end: (idx + context).min(line_count - 1),
        })
        .collect()
}

/// Coalesce overlapping or adjacent ranges into a minimal covering set.
///
/// Two ranges merge when the later one starts at or before `prev.end + 1`,
/// so back-to-back windows print as one block. Idempotent: merging an
/// already-merged set returns it unchanged.
pub fn merge_ranges(ranges: &[LineRange]) -> Vec<LineRange> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_unstable();

    let mut merged = vec![sorted[0]];
    for range in &sorted[1..] {
        let last_idx = merged.len() - 1;
        let last = &mut merged[last_idx];
        if range.start <= last.end.saturating_add(1) {
            last.end = last.end.max(range.end);
        } else {
            merged.push(*range);
        }
    }
    merged
}

// =============================================================================
// Rendering
// =============================================================================

/// Print the merged ranges with 1-based line numbers and per-range headers.
pub fn write_ranges<W: Write>(
    lines: &[&str],
    ranges: &[LineRange],
    mut writer: W,
) -> io::Result<()> {
    for (idx, range) in ranges.iter().enumerate() {
        writeln!(
            writer,
            "=== Match {}: lines {}-{} ===",
            idx + 1,
            range.start + 1,
            range.end + 1
        )?;
        for i in range.start..=range.end {
            writeln!(writer, "{:6}: {}", i + 1, lines[i].trim_end())?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
