// logtriage - bin/consolidate_history.rs
//
// Entry point for consolidate-history: fold aged history files into one
// markdown document, bundle it as .tar.gz, copy the bundle to the archive
// directory, and delete the consumed sources.

use clap::Parser;
use logtriage::{app, config, util};

/// Consolidate aged history files into one archived markdown bundle.
#[derive(Parser, Debug)]
#[command(name = "consolidate-history", version, about)]
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
        "consolidate-history starting"
    );

    let today = chrono::Local::now().date_naive();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = app::consolidate::run(&cfg, today, &mut out) {
        tracing::error!(error = %e, "consolidate-history failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
