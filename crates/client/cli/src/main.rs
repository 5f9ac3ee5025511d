//! Headless client entry point.
//!
//! Usage:
//! - `client-cli` or `client-cli play` - play a fresh run on autopilot
//! - `client-cli resume <slot>` - continue a saved run
//! - `client-cli scores` - print the high-score table
mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use game_content::ContentFactory;
use runtime::{OracleManager, RuntimeConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = RuntimeConfig::from_env();
    setup_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["play"] => {
            let oracles = load_oracles(&config)?;
            commands::play(&config, oracles).await
        }
        ["resume", slot] => {
            let oracles = load_oracles(&config)?;
            commands::resume(&config, oracles, slot).await
        }
        ["scores"] => commands::scores(&config),
        other => bail!("unknown arguments {other:?}; expected play, resume <slot> or scores"),
    }
}

fn load_oracles(config: &RuntimeConfig) -> Result<OracleManager> {
    let content = ContentFactory::new(&config.data_dir)
        .load_content()
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    tracing::info!(
        fragments = content.catalog.fragments.len(),
        themes = content.catalog.themes.len(),
        enemies = content.catalog.enemies.len(),
        "content loaded"
    );
    Ok(OracleManager::from_content(content))
}

/// Setup logging to a file under the platform cache directory.
fn setup_logging() -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(guard);

    tracing::info!("Log file: {}/client.log", log_dir.display());

    Ok(())
}

fn get_log_directory() -> PathBuf {
    ProjectDirs::from("", "", "matrix-crawl")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("matrix-crawl").join("logs"))
}
