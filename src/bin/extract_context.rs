// logtriage - bin/extract_context.rs
//
// Entry point for extract-context: print merged context windows around
// pattern matches in a log file.

use clap::Parser;
use logtriage::app::extract::{self, ExtractArgs};
use logtriage::util::error::TriageError;
use logtriage::{config, util};
use std::path::PathBuf;

/// Extract context around matching lines in a log file.
#[derive(Parser, Debug)]
#[command(name = "extract-context", version, about)]
struct Cli {
    /// Path to the log file (default: log.txt).
    file: Option<PathBuf>,

    /// Substring or regex to match (default: '[ERROR]').
    #[arg(short = 'p', long = "pattern")]
    pattern: Option<String>,

    /// Number of context lines before and after each match (default: 5).
    #[arg(short = 'c', long = "context")]
    context: Option<usize>,

    /// Treat the pattern as a regular expression.
    #[arg(short = 'r', long = "regex")]
    regex: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    util::logging::init(cli.debug, cfg.log_level.as_deref());

    // CLI arguments win over config-provided defaults.
    let args = ExtractArgs {
        file: cli.file.unwrap_or_else(|| cfg.default_file.clone()),
        pattern: cli.pattern.unwrap_or_else(|| cfg.default_pattern.clone()),
        context: cli.context.unwrap_or(cfg.default_context),
        use_regex: cli.regex,
    };

    tracing::info!(
        version = util::constants::APP_VERSION,
        file = %args.file.display(),
        pattern = %args.pattern,
        context = args.context,
        regex = args.use_regex,
        "extract-context starting"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match extract::run(&args, &mut out) {
        Ok(_) => {}
        // Bad input (missing file, broken pattern) keeps the original
        // message shape on stderr and the distinctive exit code.
        Err(TriageError::Context(e)) => {
            eprintln!("{e}");
            std::process::exit(util::constants::EXIT_BAD_INPUT);
        }
        Err(e) => {
            tracing::error!(error = %e, "extract-context failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
