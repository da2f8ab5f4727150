// logtriage - bin/analyze_errors.rs
//
// Entry point for analyze-errors: scan the project error log for known
// failure patterns and print a report with remediation advice.

use clap::Parser;
use logtriage::{app, config, util};

/// Scan the project error log for known failure patterns and print a report.
#[derive(Parser, Debug)]
#[command(name = "analyze-errors", version, about)]
struct Cli {
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
    tracing::info!(
        version = util::constants::APP_VERSION,
        "analyze-errors starting"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = app::analyze::run(&cfg, &mut out) {
        tracing::error!(error = %e, "analyze-errors failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
