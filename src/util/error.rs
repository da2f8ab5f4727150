// logtriage - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Each tool has its own error enum; all fold into TriageError for the
// binaries to report. No string-based error propagation.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all logtriage operations, categorised by the
/// subsystem that produced them.
#[derive(Debug)]
pub enum TriageError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Error-log analysis failed.
    Report(ReportError),

    /// History consolidation failed.
    History(HistoryError),

    /// Context extraction failed.
    Context(ContextError),

    /// Fixture patching failed.
    Fixture(FixtureError),
}

impl fmt::Display for TriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Report(e) => write!(f, "Report error: {e}"),
            Self::History(e) => write!(f, "Consolidation error: {e}"),
            Self::Context(e) => write!(f, "Extraction error: {e}"),
            Self::Fixture(e) => write!(f, "Fixture patch error: {e}"),
        }
    }
}

impl std::error::Error for TriageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Report(e) => Some(e),
            Self::History(e) => Some(e),
            Self::Context(e) => Some(e),
            Self::Fixture(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to triage.toml loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading the config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "I/O error reading '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for TriageError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors related to error-log analysis.
#[derive(Debug)]
pub enum ReportError {
    /// I/O error reading the error log or writing the report.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ReportError> for TriageError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

// ---------------------------------------------------------------------------
// History errors
// ---------------------------------------------------------------------------

/// Errors related to history consolidation.
#[derive(Debug)]
pub enum HistoryError {
    /// I/O error with path and operation context. Covers the write, archive,
    /// copy, and delete phases; per-file read errors during concatenation are
    /// non-fatal and never surface here.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<HistoryError> for TriageError {
    fn from(e: HistoryError) -> Self {
        Self::History(e)
    }
}

// ---------------------------------------------------------------------------
// Context errors
// ---------------------------------------------------------------------------

/// Errors related to context extraction.
#[derive(Debug)]
pub enum ContextError {
    /// The input file does not exist.
    FileNotFound { path: PathBuf },

    /// User-provided regex is invalid.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// Other I/O error reading the input file or writing output.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => {
                write!(f, "File not found: {}", path.display())
            }
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid pattern '{pattern}': {source}")
            }
            Self::Io { path, source } => {
                write!(f, "I/O error on '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::FileNotFound { .. } => None,
        }
    }
}

impl From<ContextError> for TriageError {
    fn from(e: ContextError) -> Self {
        Self::Context(e)
    }
}

// ---------------------------------------------------------------------------
// Fixture errors
// ---------------------------------------------------------------------------

/// Errors related to fixture patching.
#[derive(Debug)]
pub enum FixtureError {
    /// The configured fixture glob pattern does not compile.
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// I/O error writing output.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern { pattern, source } => {
                write!(f, "Invalid fixture glob '{pattern}': {source}")
            }
            Self::Io { path, source } => {
                write!(f, "I/O error on '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<FixtureError> for TriageError {
    fn from(e: FixtureError) -> Self {
        Self::Fixture(e)
    }
}

/// Convenience type alias for logtriage results.
pub type Result<T> = std::result::Result<T, TriageError>;
