//! subtrack server binary.
//!
//! Reads `subtrack.toml` (or the path given with `--config`), opens the
//! SQLite store, and serves the JSON API over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use subtrack_server::{ServerConfig, app, expand_tilde};
use subtrack_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Subscription cost tracking server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "subtrack.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  // RUST_LOG wins over the configured filter.
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .parse_lossy(
      std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .or_else(|| server_cfg.log_filter.clone())
        .unwrap_or_default(),
    );
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, "store opened");

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(store)).await.context("server error")?;

  Ok(())
}
