// logtriage - app/extract.rs
//
// extract-context flow: read the input file, find matching lines, merge the
// context windows, render them to the caller's writer.

use crate::core::context::{self, PatternMatcher};
use crate::util::error::{ContextError, Result};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Resolved arguments for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractArgs {
    /// Input file.
    pub file: PathBuf,

    /// Substring or regex to match.
    pub pattern: String,

    /// Context lines before and after each match.
    pub context: usize,

    /// Treat the pattern as a regular expression.
    pub use_regex: bool,
}

/// Run the extraction. Returns true when at least one match was printed.
///
/// A missing input file surfaces as `ContextError::FileNotFound`; the binary
/// maps that (and invalid patterns) to exit code 2. The file is read
/// lossily -- invalid UTF-8 sequences become replacement characters instead
/// of failing the run.
pub fn run<W: Write>(args: &ExtractArgs, out: &mut W) -> Result<bool> {
    let matcher = if args.use_regex {
        PatternMatcher::regex(&args.pattern)?
    } else {
        PatternMatcher::substring(&args.pattern)
    };

    let bytes = std::fs::read(&args.file).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ContextError::FileNotFound {
                path: args.file.clone(),
            }
        } else {
            ContextError::Io {
                path: args.file.clone(),
                source: e,
            }
        }
    })?;
    let content = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = content.lines().collect();

    let matches = context::find_match_lines(&lines, &matcher);
    let ranges = context::merge_ranges(&context::ranges_around(
        &matches,
        args.context,
        lines.len(),
    ));

    tracing::debug!(
        file = %args.file.display(),
        lines = lines.len(),
        matches = matches.len(),
        ranges = ranges.len(),
        "Extraction scan complete"
    );

    if ranges.is_empty() {
        writeln!(out, "No matches found.").map_err(|e| ContextError::Io {
            path: args.file.clone(),
            source: e,
        })?;
        return Ok(false);
    }

    context::write_ranges(&lines, &ranges, out).map_err(|e| ContextError::Io {
        path: args.file.clone(),
        source: e,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::TriageError;
    use std::fs;

    fn args(file: PathBuf) -> ExtractArgs {
        ExtractArgs {
            file,
            pattern: "[ERROR]".to_string(),
            context: 1,
            use_regex: false,
        }
    }

    #[test]
    fn test_missing_file_maps_to_file_not_found() {
        let mut buf = Vec::new();
        let result = run(&args(PathBuf::from("/nonexistent/log.txt")), &mut buf);
        assert!(matches!(
            result,
            Err(TriageError::Context(ContextError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_no_matches_message() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("log.txt");
        fs::write(&file, "all quiet\n").unwrap();

        let mut buf = Vec::new();
        let found = run(&args(file), &mut buf).unwrap();
        assert!(!found);
        assert_eq!(String::from_utf8(buf).unwrap(), "No matches found.\n");
    }

    #[test]
    fn test_matches_rendered_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("log.txt");
        fs::write(&file, "a\n[ERROR] x\nb\n").unwrap();

        let mut buf = Vec::new();
        let found = run(&args(file), &mut buf).unwrap();
        assert!(found);
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("=== Match 1: lines 1-3 ==="));
        assert!(output.contains("     2: [ERROR] x"));
    }

    #[test]
    fn test_invalid_regex_pattern_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("log.txt");
        fs::write(&file, "content\n").unwrap();

        let mut buf = Vec::new();
        let result = run(
            &ExtractArgs {
                file,
                pattern: "[unclosed".to_string(),
                context: 1,
                use_regex: true,
            },
            &mut buf,
        );
        assert!(matches!(
            result,
            Err(TriageError::Context(ContextError::InvalidRegex { .. }))
        ));
    }

    #[test]
    fn test_regex_mode_changes_match_semantics() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("log.txt");
        fs::write(&file, "code: 503\ncode: 404\n").unwrap();

        let mut buf = Vec::new();
        let found = run(
            &ExtractArgs {
                file,
                pattern: r"code:\s*5\d{2}".to_string(),
                context: 0,
                use_regex: true,
            },
            &mut buf,
        )
        .unwrap();
        assert!(found);
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("     1: code: 503"));
        assert!(!output.contains("404"));
    }
}
