use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use releasy::cli::{orchestration, Cli};

const LOG_ENV: &str = "RELEASY_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let code = orchestration::run_cli(&cli)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

// Diagnostics go to stderr; user-facing output goes through the Logger
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
