// logtriage - config.rs
//
// Optional triage.toml loading with startup validation.
// Every fixed path and threshold used by the four tools can be overridden
// here; defaults reproduce the stock behaviour. Invalid values produce
// actionable warnings and fall back to defaults rather than aborting.

use crate::util::constants;
use crate::util::error::ConfigError;
use std::path::{Path, PathBuf};

// =============================================================================
// Raw deserialisable shape of triage.toml
// =============================================================================

/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[report]` section.
    pub report: ReportSection,
    /// `[consolidate]` section.
    pub consolidate: ConsolidateSection,
    /// `[extract]` section.
    pub extract: ExtractSection,
    /// `[patch]` section.
    pub patch: PatchSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Path of the error log scanned by analyze-errors.
    pub error_log: Option<String>,
}

/// `[consolidate]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ConsolidateSection {
    /// History directory to scan.
    pub history_dir: Option<String>,
    /// Archive subdirectory name inside the history directory.
    pub archive_dir_name: Option<String>,
    /// Filename stem of the consolidated output.
    pub output_stem: Option<String>,
    /// Age threshold in days.
    pub days_old: Option<i64>,
}

/// `[extract]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Input file used when no positional argument is given.
    pub default_file: Option<String>,
    /// Pattern used when --pattern is not given.
    pub default_pattern: Option<String>,
    /// Context radius used when --context is not given.
    pub default_context: Option<usize>,
}

/// `[patch]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PatchSection {
    /// Fixture directory to scan.
    pub fixture_dir: Option<String>,
    /// Filename glob a fixture file must match.
    pub file_pattern: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Validated application configuration derived from triage.toml.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- analyze-errors --
    /// Path of the error log.
    pub error_log: PathBuf,

    // -- consolidate-history --
    /// History directory to scan (non-recursive).
    pub history_dir: PathBuf,
    /// Archive subdirectory name inside the history directory.
    pub archive_dir_name: String,
    /// Filename stem of the consolidated output file.
    pub output_stem: String,
    /// Files with an embedded date older than this many days are consolidated.
    pub days_old: i64,

    // -- extract-context --
    /// Input file used when no positional argument is given.
    pub default_file: PathBuf,
    /// Pattern used when --pattern is not given.
    pub default_pattern: String,
    /// Context radius used when --context is not given.
    pub default_context: usize,

    // -- patch-fixtures --
    /// Fixture directory to scan (recursive).
    pub fixture_dir: PathBuf,
    /// Filename glob a fixture file must match.
    pub fixture_pattern: String,

    // -- logging --
    /// Log level from the config file, if any.
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            error_log: PathBuf::from(constants::DEFAULT_ERROR_LOG),
            history_dir: PathBuf::from(constants::DEFAULT_HISTORY_DIR),
            archive_dir_name: constants::DEFAULT_ARCHIVE_DIR_NAME.to_string(),
            output_stem: constants::DEFAULT_OUTPUT_STEM.to_string(),
            days_old: constants::DEFAULT_DAYS_OLD,
            default_file: PathBuf::from(constants::DEFAULT_LOG_FILE),
            default_pattern: constants::DEFAULT_PATTERN.to_string(),
            default_context: constants::DEFAULT_CONTEXT_LINES,
            fixture_dir: PathBuf::from(constants::DEFAULT_FIXTURE_DIR),
            fixture_pattern: constants::DEFAULT_FIXTURE_PATTERN.to_string(),
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Build a validated config from a raw TOML shape.
    ///
    /// Out-of-range or empty values are logged as warnings and replaced with
    /// their defaults; the run always proceeds.
    pub fn from_raw(raw: RawConfig) -> Self {
        let mut cfg = Self::default();

        if let Some(path) = non_empty(raw.report.error_log, "report.error_log") {
            cfg.error_log = PathBuf::from(path);
        }

        if let Some(path) = non_empty(raw.consolidate.history_dir, "consolidate.history_dir") {
            cfg.history_dir = PathBuf::from(path);
        }
        if let Some(name) = non_empty(
            raw.consolidate.archive_dir_name,
            "consolidate.archive_dir_name",
        ) {
            cfg.archive_dir_name = name;
        }
        if let Some(stem) = non_empty(raw.consolidate.output_stem, "consolidate.output_stem") {
            cfg.output_stem = stem;
        }
        if let Some(days) = raw.consolidate.days_old {
            if days < 0 {
                tracing::warn!(
                    days,
                    default = constants::DEFAULT_DAYS_OLD,
                    "consolidate.days_old is negative, using default"
                );
            } else {
                cfg.days_old = days;
            }
        }

        if let Some(path) = non_empty(raw.extract.default_file, "extract.default_file") {
            cfg.default_file = PathBuf::from(path);
        }
        if let Some(pattern) = non_empty(raw.extract.default_pattern, "extract.default_pattern") {
            cfg.default_pattern = pattern;
        }
        if let Some(context) = raw.extract.default_context {
            if context > constants::MAX_CONTEXT_LINES {
                tracing::warn!(
                    context,
                    max = constants::MAX_CONTEXT_LINES,
                    "extract.default_context exceeds maximum, clamping"
                );
                cfg.default_context = constants::MAX_CONTEXT_LINES;
            } else {
                cfg.default_context = context;
            }
        }

        if let Some(path) = non_empty(raw.patch.fixture_dir, "patch.fixture_dir") {
            cfg.fixture_dir = PathBuf::from(path);
        }
        if let Some(pattern) = non_empty(raw.patch.file_pattern, "patch.file_pattern") {
            cfg.fixture_pattern = pattern;
        }

        cfg.log_level = non_empty(raw.logging.level, "logging.level");

        cfg
    }
}

/// Reject empty-string overrides: they are always configuration mistakes.
fn non_empty(value: Option<String>, field: &str) -> Option<String> {
    match value {
        Some(v) if v.trim().is_empty() => {
            tracing::warn!(field, "Empty config value ignored, using default");
            None
        }
        other => other,
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load triage.toml from the working directory, or defaults if absent.
pub fn load() -> Result<AppConfig, ConfigError> {
    load_from(Path::new(constants::CONFIG_FILE_NAME))
}

/// Load configuration from an explicit path, or defaults if it does not exist.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "Config file loaded");
    Ok(AppConfig::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.error_log, PathBuf::from("error.txt"));
        assert_eq!(cfg.days_old, 3);
        assert_eq!(cfg.default_pattern, "[ERROR]");
        assert_eq!(cfg.default_context, 5);
    }

    #[test]
    fn test_overrides_applied() {
        let raw: RawConfig = toml::from_str(
            r#"
            [consolidate]
            history_dir = "notes/history"
            days_old = 7

            [extract]
            default_pattern = "[WARN]"
            "#,
        )
        .unwrap();
        let cfg = AppConfig::from_raw(raw);
        assert_eq!(cfg.history_dir, PathBuf::from("notes/history"));
        assert_eq!(cfg.days_old, 7);
        assert_eq!(cfg.default_pattern, "[WARN]");
        // Untouched sections keep defaults
        assert_eq!(cfg.fixture_pattern, "*.test.ts");
    }

    #[test]
    fn test_negative_days_falls_back() {
        let raw: RawConfig = toml::from_str("[consolidate]\ndays_old = -1\n").unwrap();
        let cfg = AppConfig::from_raw(raw);
        assert_eq!(cfg.days_old, 3);
    }

    #[test]
    fn test_oversized_context_clamped() {
        let raw: RawConfig = toml::from_str("[extract]\ndefault_context = 99999\n").unwrap();
        let cfg = AppConfig::from_raw(raw);
        assert_eq!(cfg.default_context, super::constants::MAX_CONTEXT_LINES);
    }

    #[test]
    fn test_empty_string_override_ignored() {
        let raw: RawConfig = toml::from_str("[report]\nerror_log = \"\"\n").unwrap();
        let cfg = AppConfig::from_raw(raw);
        assert_eq!(cfg.error_log, PathBuf::from("error.txt"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw: Result<RawConfig, _> = toml::from_str("[future]\nflag = true\n");
        assert!(raw.is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = load_from(Path::new("/nonexistent/triage.toml")).unwrap();
        assert_eq!(cfg.days_old, 3);
    }
}
