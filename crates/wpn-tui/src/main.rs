mod action;
mod app;
mod app_state;
mod card;
mod component;
mod components;
mod filter;
mod focus;
mod session;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use wpn_proto::config::{Config, SourceConfig};
use wpn_proto::{platform, SnapshotProvider, Source};

/// What's Playing Now: live per-channel track listings in the terminal.
#[derive(Parser, Debug)]
#[command(name = "wpn", version, about)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Snapshot source: an http(s) URL or a JSON file path.
    #[arg(long, value_name = "URL_OR_PATH")]
    source: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("wpn log: {}", log_path.display());
    tracing::info!("wpn starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "config {} unusable, using defaults: {:#}",
                config_path.display(),
                e
            );
            Config::default()
        }
    };
    if let Some(location) = cli.source.as_deref() {
        config.source = SourceConfig::from_location(location);
    }
    tracing::debug!("config: {:?}", config);

    // ── Snapshot source ──────────────────────────────────────────────────────
    let source = Source::from_config(&config.source)?;
    tracing::info!("snapshot source: {}", source.describe());

    let auto_refresh = (config.refresh.auto_refresh && config.refresh.interval_secs > 0)
        .then(|| Duration::from_secs(config.refresh.interval_secs));

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(source, auto_refresh, config.ui.show_keys_bar);
    app.run().await?;

    Ok(())
}
