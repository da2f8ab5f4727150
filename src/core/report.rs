// logtriage - core/report.rs
//
// Error-log pattern analysis and report rendering.
// Core layer: accepts the log content as a string and renders to any Write;
// app::analyze owns the file read and stdout.
//
// The known failure signatures are a built-in table, each carrying its own
// context-window shape and remediation advice.

use crate::util::constants;
use regex::Regex;
use std::io::{self, Write};
use std::sync::OnceLock;

// =============================================================================
// Known failure patterns
// =============================================================================

/// A recognised failure signature in the error log.
#[derive(Debug, Clone, Copy)]
pub struct KnownPattern {
    /// Stable identifier.
    pub id: &'static str,

    /// Human-readable label used in section headers and the summary.
    pub label: &'static str,

    /// Literal substring that marks an occurrence.
    pub needle: &'static str,

    /// Context lines shown before a matching line.
    pub context_before: usize,

    /// Context lines shown after a matching line.
    pub context_after: usize,

    /// Remediation advice printed when at least one occurrence was found.
    pub advice: &'static [&'static str],
}

/// The built-in failure signatures.
pub const BUILTIN_PATTERNS: &[KnownPattern] = &[
    KnownPattern {
        id: "incomplete-json",
        label: "Incomplete JSON",
        needle: "Incomplete JSON segment at the end",
        context_before: 3,
        context_after: 3,
        advice: &[
            "Consider shortening the prompt",
            "Review the streaming response handling",
            "Add a timeout around JSON parsing",
        ],
    },
    KnownPattern {
        id: "malformed-function-call",
        label: "MALFORMED_FUNCTION_CALL",
        needle: "MALFORMED_FUNCTION_CALL",
        context_before: 1,
        context_after: 3,
        advice: &[
            "Validate the function call JSON shape",
            "Improve model response formatting",
        ],
    },
];

/// Advice printed when high prompt token counts were seen.
const TOKEN_ADVICE: &[&str] = &[
    "Trim the system prompt",
    "Reduce tool descriptions",
    "Tighten context window management",
];

// =============================================================================
// Analysis results
// =============================================================================

/// Where one known pattern fired.
#[derive(Debug)]
pub struct PatternHits {
    /// The signature that was searched for.
    pub pattern: &'static KnownPattern,

    /// Total substring occurrences in the content (may exceed the number of
    /// matching lines when a line contains the needle more than once).
    pub occurrences: usize,

    /// 0-based indices of lines containing the needle.
    pub line_hits: Vec<usize>,
}

/// Classification of a prompt token count sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLevel {
    Normal,
    High,
    VeryHigh,
}

impl TokenLevel {
    /// Classify a sample against the named thresholds.
    pub fn classify(value: u64) -> Self {
        if value > constants::TOKEN_VERY_HIGH_THRESHOLD {
            Self::VeryHigh
        } else if value > constants::TOKEN_HIGH_THRESHOLD {
            Self::High
        } else {
            Self::Normal
        }
    }
}

/// Token usage fields of a parsed chunk.
#[derive(Debug, PartialEq, Eq)]
pub struct ChunkUsage {
    pub prompt_tokens: u64,
    pub total_tokens: u64,
}

/// Fields pulled out of a successfully parsed chunk object.
#[derive(Debug)]
pub struct ChunkFields {
    /// `candidates[0].finishReason`; `Some("N/A")` when the first candidate
    /// carries no finish reason, `None` when there are no candidates at all.
    pub finish_reason: Option<String>,

    /// `usageMetadata` token counts, when present.
    pub usage: Option<ChunkUsage>,
}

/// Result of analysing one extracted chunk object.
#[derive(Debug)]
pub struct ChunkAnalysis {
    /// The raw extracted text.
    pub raw: String,

    /// Parsed fields, or the JSON error message.
    pub outcome: Result<ChunkFields, String>,
}

/// Everything the report renderer needs, computed in one pass.
#[derive(Debug)]
pub struct Report {
    /// One entry per built-in pattern, in table order.
    pub hits: Vec<PatternHits>,

    /// All promptTokenCount samples, in order of appearance.
    pub tokens: Vec<u64>,

    /// Total chunk objects found in the content.
    pub chunk_count: usize,

    /// Detailed analysis of the first few chunks.
    pub chunks: Vec<ChunkAnalysis>,
}

impl Report {
    /// Samples above the high threshold (includes very-high samples).
    pub fn high_token_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|&&v| v > constants::TOKEN_HIGH_THRESHOLD)
            .count()
    }

    /// Samples above the very-high threshold.
    pub fn very_high_token_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|&&v| v > constants::TOKEN_VERY_HIGH_THRESHOLD)
            .count()
    }
}

// =============================================================================
// Analysis
// =============================================================================

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r#""promptTokenCount":(\d+)"#).expect("token count: invalid regex")
    })
}

fn chunk_key_regex() -> &'static Regex {
    static CHUNK_KEY: OnceLock<Regex> = OnceLock::new();
    CHUNK_KEY.get_or_init(|| Regex::new(r#""chunk"\s*:\s*\{"#).expect("chunk key: invalid regex"))
}

/// Analyse the error log content against the given pattern table.
///
/// `lines` must be `content.lines()` collected by the caller (the renderer
/// needs the same buffer for context windows).
pub fn analyze(content: &str, lines: &[&str], patterns: &'static [KnownPattern]) -> Report {
    let hits = patterns
        .iter()
        .map(|pattern| PatternHits {
            pattern,
            occurrences: content.matches(pattern.needle).count(),
            line_hits: lines
                .iter()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern.needle))
                .map(|(idx, _)| idx)
                .collect(),
        })
        .collect();

    let tokens: Vec<u64> = token_regex()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    let raw_chunks = extract_chunks(content);
    let chunk_count = raw_chunks.len();
    let chunks = raw_chunks
        .into_iter()
        .take(constants::MAX_CHUNKS_ANALYSED)
        .map(analyse_chunk)
        .collect();

    tracing::debug!(
        tokens = tokens.len(),
        chunk_count,
        "Error log analysis complete"
    );

    Report {
        hits,
        tokens,
        chunk_count,
        chunks,
    }
}

/// Extract every JSON object assigned to a `"chunk"` key.
///
/// Objects are captured with a string-aware brace-depth scan so nested
/// structures come out whole. An unterminated object (truncated log) is
/// returned as-is; the downstream JSON parse then reports the failure
/// inline, which is exactly the condition this tool exists to surface.
pub fn extract_chunks(content: &str) -> Vec<String> {
    chunk_key_regex()
        .find_iter(content)
        .map(|m| {
            let object_start = m.end() - 1;
            let tail = &content[object_start..];
            match balanced_object(tail) {
                Some(object) => object.to_string(),
                None => tail.to_string(),
            }
        })
        .collect()
}

/// Return the prefix of `s` forming one balanced `{...}` object.
///
/// `s` must start with `{`. String literals and escape sequences are honoured
/// so braces inside values do not affect the depth count. `None` when the
/// object never closes.
fn balanced_object(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse one extracted chunk and pull out the fields worth reporting.
fn analyse_chunk(raw: String) -> ChunkAnalysis {
    let outcome = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => {
            let finish_reason = value
                .get("candidates")
                .and_then(|c| c.as_array())
                .and_then(|arr| arr.first())
                .map(|first| {
                    first
                        .get("finishReason")
                        .and_then(|f| f.as_str())
                        .unwrap_or("N/A")
                        .to_string()
                });
            let usage = value.get("usageMetadata").map(|u| ChunkUsage {
                prompt_tokens: u
                    .get("promptTokenCount")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0),
                total_tokens: u
                    .get("totalTokenCount")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0),
            });
            Ok(ChunkFields {
                finish_reason,
                usage,
            })
        }
        Err(e) => Err(e.to_string()),
    };

    ChunkAnalysis { raw, outcome }
}

// =============================================================================
// Rendering
// =============================================================================

/// Render the full six-section report.
pub fn write_report<W: Write>(report: &Report, lines: &[&str], mut w: W) -> io::Result<()> {
    writeln!(w, "=== Error log analysis ===")?;
    writeln!(w, "{}", "=".repeat(50))?;

    // Sections 1..N: one per known pattern, with context windows.
    for (section, hits) in report.hits.iter().enumerate() {
        writeln!(w)?;
        writeln!(w, "{}. {} errors", section + 1, hits.pattern.label)?;
        writeln!(w, "{}", "-".repeat(30))?;
        writeln!(
            w,
            "{} occurrences: {}",
            hits.pattern.label, hits.occurrences
        )?;
        write_context_windows(hits, lines, &mut w)?;
    }

    let mut section = report.hits.len();

    // Prompt token analysis.
    section += 1;
    writeln!(w)?;
    writeln!(w, "{section}. Prompt token analysis")?;
    writeln!(w, "{}", "-".repeat(30))?;
    writeln!(w, "promptTokenCount values: {:?}", report.tokens)?;
    for &value in &report.tokens {
        match TokenLevel::classify(value) {
            TokenLevel::VeryHigh => writeln!(
                w,
                "CRITICAL: very high token count: {value} (likely failure trigger)"
            )?,
            TokenLevel::High => {
                writeln!(w, "WARNING: high token count: {value} (needs attention)")?
            }
            TokenLevel::Normal => writeln!(w, "OK: normal token count: {value}")?,
        }
    }

    // Chunk JSON analysis.
    section += 1;
    writeln!(w)?;
    writeln!(w, "{section}. Chunk JSON analysis")?;
    writeln!(w, "{}", "-".repeat(30))?;
    writeln!(w, "Chunk JSON objects found: {}", report.chunk_count)?;
    for (idx, chunk) in report.chunks.iter().enumerate() {
        writeln!(w)?;
        writeln!(w, "--- Chunk {} ---", idx + 1)?;
        match &chunk.outcome {
            Ok(fields) => {
                writeln!(w, "Valid JSON structure")?;
                if let Some(reason) = &fields.finish_reason {
                    writeln!(w, "  Finish Reason: {reason}")?;
                }
                if let Some(usage) = &fields.usage {
                    writeln!(w, "  Prompt Tokens: {}", usage.prompt_tokens)?;
                    writeln!(w, "  Total Tokens: {}", usage.total_tokens)?;
                }
            }
            Err(message) => {
                writeln!(w, "JSON parse error: {message}")?;
                writeln!(
                    w,
                    "  Offending JSON: {}...",
                    truncate_chars(&chunk.raw, constants::CHUNK_PREVIEW_CHARS)
                )?;
            }
        }
    }

    // Pattern summary.
    section += 1;
    writeln!(w)?;
    writeln!(w, "{section}. Error pattern summary")?;
    writeln!(w, "{}", "-".repeat(30))?;
    for hits in &report.hits {
        writeln!(w, "{}: {}", hits.pattern.label, hits.occurrences)?;
    }
    writeln!(w, "High token count (>10k): {}", report.high_token_count())?;
    writeln!(
        w,
        "Very high token count (>15k): {}",
        report.very_high_token_count()
    )?;

    // Remediation advice, only for findings that actually occurred.
    section += 1;
    writeln!(w)?;
    writeln!(w, "{section}. Suggested remediation")?;
    writeln!(w, "{}", "-".repeat(30))?;
    for hits in &report.hits {
        if hits.occurrences > 0 {
            writeln!(w, "- {} errors:", hits.pattern.label)?;
            for line in hits.pattern.advice {
                writeln!(w, "  - {line}")?;
            }
        }
    }
    if report.high_token_count() > 0 {
        writeln!(w, "- High token count:")?;
        for line in TOKEN_ADVICE {
            writeln!(w, "  - {line}")?;
        }
    }

    Ok(())
}

/// Print the context window around each line where a pattern fired.
fn write_context_windows<W: Write>(
    hits: &PatternHits,
    lines: &[&str],
    w: &mut W,
) -> io::Result<()> {
    for &hit in &hits.line_hits {
        writeln!(w)?;
        writeln!(w, "=== Error at line {} ===", hit + 1)?;

        let start = hit.saturating_sub(hits.pattern.context_before);
        let end = (hit + hits.pattern.context_after).min(lines.len().saturating_sub(1));
        for i in start..=end {
            let marker = if i == hit { ">>>" } else { "   " };
            writeln!(w, "{marker} {:3}: {}", i + 1, lines[i])?;
        }
    }
    Ok(())
}

/// First `max` characters of `s`, respecting char boundaries.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// =============================================================================
// Tests
// =============================================================================
