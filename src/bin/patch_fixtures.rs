// logtriage - bin/patch_fixtures.rs
//
// Entry point for patch-fixtures: insert a threadId member after each
// sessionId member in the test fixture tree, in place.

use clap::Parser;
use logtriage::{app, config, util};

/// Add threadId fields to fixture message objects that lack them.
#[derive(Parser, Debug)]
#[command(name = "patch-fixtures", version, about)]
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
        "patch-fixtures starting"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match app::patch::run(&cfg, &mut out) {
        Ok(Some(_)) => {}
        Ok(None) => {
            // Missing fixture directory: diagnostic already printed.
            std::process::exit(util::constants::EXIT_MISSING_FIXTURE_DIR);
        }
        Err(e) => {
            tracing::error!(error = %e, "patch-fixtures failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
