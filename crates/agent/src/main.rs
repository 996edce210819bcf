//! Nebula - message persistence worker
//!
//! Receives structured messages and appends each payload as one line of
//! JSON to a file chosen by the message's selector.
//!
//! # Usage
//!
//! ```bash
//! # Persist messages read as JSON-lines from stdin
//! nebula --config configs/nebula.toml
//!
//! # Override the configured log level
//! nebula --config configs/nebula.toml --log-level debug
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use nebula_agent::{NebulaAgent, StdinDelivery};
use nebula_config::{Config, LogFormat};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Nebula - message persistence worker
#[derive(Parser, Debug)]
#[command(name = "nebula")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "configs/nebula.toml")]
    config: std::path::PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_file(&cli.config)
        .with_context(|| format!("failed to load config '{}'", cli.config.display()))?;

    let level = cli
        .log_level
        .unwrap_or_else(|| config.log.level.as_str().to_string());
    init_logging(&level, config.log.format)?;

    let agent = NebulaAgent::from_config(&config).context("failed to initialize sink")?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    agent.run(StdinDelivery::new(), shutdown).await;

    Ok(())
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    match format {
        LogFormat::Console => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
