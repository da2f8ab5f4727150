// logtriage - core/fixture.rs
//
// In-memory rewrite for test fixtures: every `sessionId:` member whose
// following line lacks a `threadId` gets a `threadId` member inserted
// directly after it, carrying the same value.
// Core layer: pure string transformation; app::patch owns file I/O.

use regex::Regex;
use std::sync::OnceLock;

/// Indented `sessionId:` member opening with a quote. The quoted value and
/// the trailing comma are validated manually so the closing quote is required
/// to match the opening one.
fn session_line_regex() -> &'static Regex {
    static SESSION_LINE: OnceLock<Regex> = OnceLock::new();
    SESSION_LINE.get_or_init(|| {
        Regex::new(r#"^(?P<indent>[ \t]+)sessionId: (?P<rest>['"].*)$"#)
            .expect("session line: invalid regex")
    })
}

/// Parse `<indent>sessionId: <q><value><q>,<ws>` out of a single line.
///
/// Returns the indent, the quote character, and the quoted value. The value
/// ends at the first repeat of the opening quote, which must be followed by a
/// comma and nothing but whitespace.
fn split_session_line(line: &str) -> Option<(&str, char, &str)> {
    let caps = session_line_regex().captures(line)?;
    let indent = caps.name("indent")?.as_str();
    let rest = caps.name("rest")?.as_str();

    let mut chars = rest.char_indices();
    let (_, quote) = chars.next()?;
    let close = rest[1..].find(quote)? + 1;
    let value = &rest[1..close];
    if value.is_empty() {
        return None;
    }

    let after = &rest[close + 1..];
    let mut after_chars = after.chars();
    if after_chars.next() != Some(',') {
        return None;
    }
    if !after_chars.all(char::is_whitespace) {
        return None;
    }

    Some((indent, quote, value))
}

/// Insert a `threadId` member after each `sessionId` member that lacks one.
///
/// Returns `Some(patched)` when at least one insertion happened, `None` when
/// the content is already fully patched. Idempotent: the inserted `threadId`
/// line suppresses the insertion on subsequent runs.
///
/// A `sessionId` on the file's final line without a trailing newline is left
/// alone; there is no line position to insert into.
pub fn patch_content(content: &str) -> Option<String> {
    let segments: Vec<&str> = content.split_inclusive('\n').collect();
    let mut out = String::with_capacity(content.len());
    let mut changed = false;

    for (i, segment) in segments.iter().enumerate() {
        out.push_str(segment);

        if !segment.ends_with('\n') {
            continue;
        }
        let line = segment.trim_end_matches('\n').trim_end_matches('\r');

        if let Some((indent, quote, value)) = split_session_line(line) {
            let next = segments.get(i + 1).copied().unwrap_or("");
            if !next.contains("threadId") {
                out.push_str(indent);
                out.push_str("threadId: ");
                out.push(quote);
                out.push_str(value);
                out.push(quote);
                out.push_str(",\n");
                changed = true;
            }
        }
    }

    changed.then_some(out)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserts_thread_id_after_session_id() {
        let input = "const msg = {\n  sessionId: 'abc-123',\n  role: 'user',\n};\n";
        let patched = patch_content(input).unwrap();
        assert_eq!(
            patched,
            "const msg = {\n  sessionId: 'abc-123',\n  threadId: 'abc-123',\n  role: 'user',\n};\n"
        );
    }

    #[test]
    fn test_double_quoted_value() {
        let input = "  sessionId: \"s1\",\n  other: 1,\n";
        let patched = patch_content(input).unwrap();
        assert!(patched.contains("  threadId: \"s1\",\n"));
    }

    #[test]
    fn test_idempotent() {
        let input = "const msg = {\n  sessionId: 'abc-123',\n  role: 'user',\n};\n";
        let once = patch_content(input).unwrap();
        assert_eq!(patch_content(&once), None, "second run must be a no-op");
    }

    #[test]
    fn test_existing_thread_id_untouched() {
        let input = "  sessionId: 'abc',\n  threadId: 'abc',\n";
        assert_eq!(patch_content(input), None);
    }

    #[test]
    fn test_mismatched_quotes_not_patched() {
        let input = "  sessionId: 'abc\",\n  role: 'user',\n";
        assert_eq!(patch_content(input), None);
    }

    #[test]
    fn test_unindented_session_id_not_patched() {
        let input = "sessionId: 'abc',\nrole: 'user',\n";
        assert_eq!(patch_content(input), None);
    }

    #[test]
    fn test_trailing_content_after_comma_not_patched() {
        let input = "  sessionId: 'abc', // comment\n  role: 'user',\n";
        assert_eq!(patch_content(input), None);
    }

    #[test]
    fn test_final_line_without_newline_not_patched() {
        let input = "const msg = {\n  sessionId: 'abc',";
        assert_eq!(patch_content(input), None);
    }

    #[test]
    fn test_session_id_on_last_line_with_newline_is_patched() {
        let input = "  sessionId: 'abc',\n";
        let patched = patch_content(input).unwrap();
        assert_eq!(patched, "  sessionId: 'abc',\n  threadId: 'abc',\n");
    }

    #[test]
    fn test_multiple_objects_all_patched() {
        let input = "\
{\n  sessionId: 'one',\n  x: 1,\n}\n{\n  sessionId: 'two',\n  x: 2,\n}\n";
        let patched = patch_content(input).unwrap();
        assert!(patched.contains("  threadId: 'one',\n"));
        assert!(patched.contains("  threadId: 'two',\n"));
    }

    #[test]
    fn test_value_with_embedded_quote_of_other_kind() {
        let input = "  sessionId: 'it\"s',\n  x: 1,\n";
        let patched = patch_content(input).unwrap();
        assert!(patched.contains("  threadId: 'it\"s',\n"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "  sessionId: 'abc',\r\n  role: 'user',\r\n";
        let patched = patch_content(input).unwrap();
        assert!(patched.contains("  threadId: 'abc',\n"));
    }
}
