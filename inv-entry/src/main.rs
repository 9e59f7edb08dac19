//! Inventory Entry (inv-entry) - Main entry point
//!
//! Interactive terminal front end for the hierarchical selection engine:
//! catalog → category → sub-category → brand → model → year → color →
//! identifier, with suggestions from the HTTP API or the offline catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use inv_common::config::{load_config, resolve_config_path, CONFIG_ENV_VAR};
use inv_common::events::EventBus;
use inv_entry::cli::run_session;
use inv_entry::config::{apply_overrides, build_engine, ConfigOverrides};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for inv-entry
#[derive(Parser, Debug)]
#[command(name = "inv-entry")]
#[command(about = "Guided inventory entry with cascading suggestions")]
#[command(version)]
struct Args {
    /// Path to TOML config file (also INV_ENTRY_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the built-in offline catalog instead of the HTTP API
    #[arg(long)]
    offline: bool,

    /// Suggestion API base URL
    #[arg(long, env = "INV_ENTRY_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first so its log level can seed the filter
    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let mut config = load_config(config_path.as_deref()).context("Failed to load config")?;

    let default_filter = format!(
        "inv_entry={level},inv_common={level}",
        level = config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting inv-entry v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let overrides = ConfigOverrides {
        offline: args.offline,
        base_url: args.base_url,
        timeout_ms: args.timeout_ms,
    };
    apply_overrides(&mut config, &overrides).context("Invalid command-line option")?;

    let mut engine =
        build_engine(&config, EventBus::default()).context("Failed to build selection engine")?;
    engine.load_root_options();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_session(&mut engine, stdin, &mut stdout)
        .await
        .context("Session failed")?;

    info!("inv-entry finished");
    Ok(())
}
