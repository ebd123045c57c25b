//! Command definitions and dispatch for the `trustkeep` binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use trustkeep_license::{LicenseConfig, LicenseManager};

#[derive(Parser, Debug)]
#[command(name = "trustkeep")]
#[command(about = "Configure and verify this installation's license")]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Licensing authority base URL (overrides the config file)
    #[arg(long)]
    pub authority_url: Option<String>,

    /// Trust store database path (overrides the config file)
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Fail instead of simulating a valid verdict when the authority is unreachable
    #[arg(long)]
    pub no_offline_grace: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Verify a token with the authority and store it
    Setup {
        token: String,
    },
    /// Re-verify the stored license
    Check {
        /// Give up on the authority after this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,
    },
    /// Forget the stored license
    Clear,
    /// Show the cached license state as JSON
    Status,
    /// Show trust store counters as JSON
    Stats,
}

/// Merges the config file (if any) with command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<LicenseConfig> {
    let mut config = match &cli.config {
        Some(path) => LicenseConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LicenseConfig::default(),
    };
    if let Some(url) = &cli.authority_url {
        config.authority_url = url.clone();
    }
    if let Some(path) = &cli.database {
        config.database_path = path.clone();
    }
    if cli.no_offline_grace {
        config.offline_grace_enabled = false;
    }
    Ok(config)
}

/// Runs one command and returns the text to print.
pub fn run(cli: &Cli) -> Result<String> {
    let config = resolve_config(cli)?;
    let manager = LicenseManager::open(&config).context("Failed to open license manager")?;
    execute(&manager, &cli.command)
}

/// Executes `command` against an existing manager.
pub fn execute(manager: &LicenseManager, command: &Command) -> Result<String> {
    match command {
        Command::Setup { token } => {
            manager
                .setup_license(token)
                .context("License setup failed")?;
            Ok("license configured".to_string())
        }
        Command::Check { deadline_secs } => {
            let result = match deadline_secs {
                Some(secs) => {
                    manager.check_license_until(Instant::now() + Duration::from_secs(*secs))
                }
                None => manager.check_license(),
            };
            result.context("License check failed")?;
            Ok("license valid".to_string())
        }
        Command::Clear => {
            manager.clear_license().context("Failed to clear license")?;
            Ok("license cleared".to_string())
        }
        Command::Status => Ok(serde_json::to_string_pretty(&manager.license_status())?),
        Command::Stats => {
            let stats = manager.store_stats().context("Failed to read store stats")?;
            Ok(serde_json::to_string_pretty(&stats)?)
        }
    }
}
