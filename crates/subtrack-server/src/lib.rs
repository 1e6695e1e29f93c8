//! Startup plumbing for the subtrack HTTP server: configuration loading and
//! application assembly. The binary in `main.rs` is a thin wrapper.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use serde::Deserialize;
use subtrack_core::SubscriptionService;
use subtrack_store_sqlite::SqliteStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `subtrack.toml` and
/// `SUBTRACK_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// `EnvFilter` directive used when `RUST_LOG` is unset.
  #[serde(default)]
  pub log_filter: Option<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("subtrack.db") }

impl ServerConfig {
  /// Layer environment variables (prefix `SUBTRACK_`) over the TOML file at
  /// `path`. A missing file is not an error.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SUBTRACK").try_parsing(true))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Wire the service over `store` into a traced HTTP router.
pub fn app(store: SqliteStore) -> Router {
  let span = tracing::info_span!("subscriptions");
  let service = SubscriptionService::new(store, span);
  subtrack_api::api_router(Arc::new(service)).layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/subtrack.toml")).unwrap();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("subtrack.db"));
    assert_eq!(cfg.log_filter, None);
    assert_eq!(cfg.address(), "0.0.0.0:8080");
  }

  #[test]
  fn file_values_override_defaults() {
    let path = std::env::temp_dir().join(format!("subtrack-test-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "port = 9090\nstore_path = \"/tmp/subs.db\"\nlog_filter = \"debug\"").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/subs.db"));
    assert_eq!(cfg.log_filter.as_deref(), Some("debug"));
    assert_eq!(cfg.host, "0.0.0.0");
  }

  #[test]
  fn tilde_is_expanded_only_at_start() {
    let plain = Path::new("data/subtrack.db");
    assert_eq!(expand_tilde(plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/subs.db")), PathBuf::from(home).join("subs.db"));
    }
  }

  #[tokio::test]
  async fn assembled_app_serves_api() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let resp = app(store)
      .oneshot(
        Request::builder()
          .uri("/subscriptions/total-cost?start_date=01-2024&end_date=12-2024")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["total_cost"], 0);
  }
}
