//! trustkeep license management CLI
//!
//! Usage:
//!   trustkeep setup <TOKEN>
//!   trustkeep check [--deadline-secs N]
//!   trustkeep status
//!   trustkeep clear
//!
//! `RUST_LOG` controls log output; `--verbose` forces debug level.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use trustkeep_cli::{Cli, run};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    debug!(command = ?cli.command, "trustkeep starting");
    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}
