use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use thon_cli::{Cli, Commands, Config, shell};
use thon_core::{SystemClock, Tracker};

/// How long teardown waits for an in-flight stdin read before giving up on it.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

fn run_shell(config: &Config) -> Result<()> {
    anyhow::ensure!(
        config.tick_interval_ms > 0,
        "tick_interval_ms must be greater than zero"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let result = runtime.block_on(async {
        let mut tracker = Tracker::new(SystemClock);
        let input = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout().lock();
        shell::run(&mut tracker, config, input, &mut stdout).await
    });

    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so they never interleave with shell output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run_shell(&config)?,
        Commands::Config => {
            let json = serde_json::to_string_pretty(&config)
                .context("failed to render configuration")?;
            println!("{json}");
        }
    }

    Ok(())
}
