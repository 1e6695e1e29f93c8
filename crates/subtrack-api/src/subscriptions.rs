//! Handlers for `/subscriptions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subscriptions` | Optional `?user_id=&service_name=&limit=&offset=` |
//! | `POST` | `/subscriptions` | Body: [`CreateBody`]; returns 201 + `{"id": ...}` |
//! | `GET`  | `/subscriptions/{id}` | 404 if not found |
//! | `PUT`/`PATCH` | `/subscriptions/{id}` | Body: [`PatchBody`]; returns the updated record |
//! | `DELETE` | `/subscriptions/{id}` | 204, or 404 if not found |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use subtrack_core::{
  SubscriptionService,
  store::{SubscriptionQuery, SubscriptionStore},
  subscription::{Subscription, SubscriptionId, SubscriptionInput, SubscriptionPatch},
};

use crate::{
  dto::{CreateBody, Created, PatchBody, non_empty},
  error::ApiError,
  extract::{JsonBody, PathId, QueryParams},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id:      Option<String>,
  pub service_name: Option<String>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

/// `GET /subscriptions[?user_id=...][&service_name=...][&limit=...][&offset=...]`
pub async fn list<S>(
  State(service): State<Arc<SubscriptionService<S>>>,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Subscription>>, ApiError>
where
  S: SubscriptionStore,
{
  let query = SubscriptionQuery {
    user_id:      non_empty(params.user_id),
    service_name: non_empty(params.service_name),
    limit:        params.limit,
    offset:       params.offset,
  };
  Ok(Json(service.list(&query).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /subscriptions`
pub async fn create<S>(
  State(service): State<Arc<SubscriptionService<S>>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubscriptionStore,
{
  let input = SubscriptionInput::try_from(body)?;
  let sub = service.create(input).await?;
  Ok((StatusCode::CREATED, Json(Created { id: sub.id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /subscriptions/{id}`
pub async fn get_one<S>(
  State(service): State<Arc<SubscriptionService<S>>>,
  PathId(id): PathId<SubscriptionId>,
) -> Result<Json<Subscription>, ApiError>
where
  S: SubscriptionStore,
{
  Ok(Json(service.get(id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /subscriptions/{id}` (also mounted as `PATCH`)
pub async fn update<S>(
  State(service): State<Arc<SubscriptionService<S>>>,
  PathId(id): PathId<SubscriptionId>,
  JsonBody(body): JsonBody<PatchBody>,
) -> Result<Json<Subscription>, ApiError>
where
  S: SubscriptionStore,
{
  let patch = SubscriptionPatch::try_from(body)?;
  Ok(Json(service.update(id, patch).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /subscriptions/{id}`
pub async fn delete_one<S>(
  State(service): State<Arc<SubscriptionService<S>>>,
  PathId(id): PathId<SubscriptionId>,
) -> Result<StatusCode, ApiError>
where
  S: SubscriptionStore,
{
  service.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
