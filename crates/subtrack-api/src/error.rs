//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use subtrack_core::{ParseError, ValidationError};
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every variant renders as `{"error": "<message>", "kind": "<code>"}`; the
/// `kind` codes are stable.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{message}")]
  BadRequest {
    kind:    &'static str,
    message: String,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn kind(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "not_found",
      ApiError::BadRequest { kind, .. } => *kind,
      ApiError::Store(_) => "storage",
    }
  }
}

impl From<subtrack_core::Error> for ApiError {
  fn from(e: subtrack_core::Error) -> Self {
    use subtrack_core::Error;
    match e {
      Error::NotFound(_) => ApiError::NotFound(e.to_string()),
      Error::Storage(inner) => ApiError::Store(inner),
      Error::Parse(_) | Error::Validation(_) => ApiError::BadRequest {
        kind:    e.code(),
        message: e.to_string(),
      },
    }
  }
}

impl From<ParseError> for ApiError {
  fn from(e: ParseError) -> Self { subtrack_core::Error::from(e).into() }
}

impl From<ValidationError> for ApiError {
  fn from(e: ValidationError) -> Self { subtrack_core::Error::from(e).into() }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = json!({ "error": self.to_string(), "kind": self.kind() });
    (status, Json(body)).into_response()
  }
}
