//! Request extractors whose rejections render as [`ApiError`].
//!
//! The stock `Json`, `Path` and `Query` extractors answer decoding failures
//! with plain-text bodies. These wrappers send the same failures through the
//! JSON error body instead, each with its own `kind`.

use axum::extract::{
  FromRequest, FromRequestParts,
  rejection::{JsonRejection, PathRejection, QueryRejection},
};

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters. The only ones in use are subscription ids.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathId<T>(pub T);

/// Query-string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self {
    ApiError::BadRequest { kind: "invalid_body", message: e.body_text() }
  }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self {
    ApiError::BadRequest { kind: "invalid_id", message: e.body_text() }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self {
    ApiError::BadRequest { kind: "invalid_query", message: e.body_text() }
  }
}
