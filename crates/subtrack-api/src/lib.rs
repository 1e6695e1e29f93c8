//! JSON REST API for subscription tracking.
//!
//! Exposes an axum [`Router`] backed by a [`SubscriptionService`] over any
//! [`SubscriptionStore`]. TLS, tracing layers and other transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = subtrack_api::api_router(Arc::new(service));
//! ```

pub mod cost;
pub mod dto;
pub mod error;
pub mod extract;
pub mod subscriptions;

use std::sync::Arc;

use axum::{Router, routing::get};
use subtrack_core::{SubscriptionService, store::SubscriptionStore};

pub use error::ApiError;

/// Build the API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<SubscriptionService<S>>) -> Router<()>
where
  S: SubscriptionStore + 'static,
{
  Router::new()
    .route(
      "/subscriptions",
      get(subscriptions::list::<S>).post(subscriptions::create::<S>),
    )
    // Static segment takes priority over `{id}`.
    .route("/subscriptions/total-cost", get(cost::total::<S>))
    .route(
      "/subscriptions/{id}",
      get(subscriptions::get_one::<S>)
        .put(subscriptions::update::<S>)
        .patch(subscriptions::update::<S>)
        .delete(subscriptions::delete_one::<S>),
    )
    .with_state(service)
}
