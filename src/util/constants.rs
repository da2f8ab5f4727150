// logtriage - util/constants.rs
//
// Single source of truth for all named constants, paths, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "logtriage";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "triage.toml";

/// Default log level when neither RUST_LOG, --debug, nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Error-log reporter
// =============================================================================

/// Default path of the error log scanned by analyze-errors.
pub const DEFAULT_ERROR_LOG: &str = "error.txt";

/// Prompt token count above which a sample is flagged as high.
pub const TOKEN_HIGH_THRESHOLD: u64 = 10_000;

/// Prompt token count above which a sample is flagged as very high.
pub const TOKEN_VERY_HIGH_THRESHOLD: u64 = 15_000;

/// How many extracted chunk JSON objects are analysed in detail.
pub const MAX_CHUNKS_ANALYSED: usize = 2;

/// Characters of an unparseable chunk shown in the report.
pub const CHUNK_PREVIEW_CHARS: usize = 200;

// =============================================================================
// History consolidation
// =============================================================================

/// Default history directory scanned by consolidate-history.
pub const DEFAULT_HISTORY_DIR: &str = "docs/history";

/// Archive subdirectory name inside the history directory.
pub const DEFAULT_ARCHIVE_DIR_NAME: &str = "archive";

/// Filename stem of the consolidated output file.
pub const DEFAULT_OUTPUT_STEM: &str = "consolidated_history";

/// Files whose embedded date is more than this many days old are consolidated.
pub const DEFAULT_DAYS_OLD: i64 = 3;

/// chrono format of the 8-digit date embedded in history filenames.
pub const FILENAME_DATE_FORMAT: &str = "%Y%m%d";

/// Extension a history file must carry to be considered for consolidation.
pub const HISTORY_EXTENSION: &str = "md";

// =============================================================================
// Context extraction
// =============================================================================

/// Default input file for extract-context.
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Default (literal) pattern for extract-context.
pub const DEFAULT_PATTERN: &str = "[ERROR]";

/// Default number of context lines before and after each match.
pub const DEFAULT_CONTEXT_LINES: usize = 5;

/// Upper bound on the context window radius accepted from configuration.
pub const MAX_CONTEXT_LINES: usize = 1_000;

/// Process exit code when the input file is missing or the pattern is invalid.
pub const EXIT_BAD_INPUT: i32 = 2;

// =============================================================================
// Fixture patching
// =============================================================================

/// Default fixture directory scanned by patch-fixtures.
pub const DEFAULT_FIXTURE_DIR: &str = "src/lib/ai-service/__tests__";

/// Glob pattern (filename-only) a fixture file must match.
pub const DEFAULT_FIXTURE_PATTERN: &str = "*.test.ts";

/// Process exit code when the fixture directory is absent.
pub const EXIT_MISSING_FIXTURE_DIR: i32 = 1;
