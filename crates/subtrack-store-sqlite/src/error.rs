//! Error type for `subtrack-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column held a value that does not decode to a domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
