//! [`SubscriptionService`]: the operations exposed to transport adapters.
//!
//! Validation, merge-patching and cost aggregation are pure; the service
//! feeds them from a [`SubscriptionStore`] and maps outcomes onto
//! [`Error`].

use tracing::Span;

use crate::{
  Error, Result,
  cost::{self, CostQuery},
  patch::apply_patch,
  store::{ModifyOutcome, SubscriptionQuery, SubscriptionStore},
  subscription::{Subscription, SubscriptionId, SubscriptionInput, SubscriptionPatch},
  validate,
};

/// Stateless request handling over a store.
///
/// Each operation runs in a child of the span handed to [`new`](Self::new),
/// so callers decide where the service's events end up.
#[derive(Debug, Clone)]
pub struct SubscriptionService<S> {
  store: S,
  span:  Span,
}

impl<S: SubscriptionStore> SubscriptionService<S> {
  pub fn new(store: S, span: Span) -> Self { Self { store, span } }

  #[tracing::instrument(parent = &self.span, name = "create", skip_all)]
  pub async fn create(&self, input: SubscriptionInput) -> Result<Subscription> {
    let data = validate::new_subscription(input).inspect_err(|e| {
      tracing::warn!(error = %e, "rejected new subscription");
    })?;

    let sub = self.store.create(data).await.map_err(storage)?;
    tracing::info!(id = %sub.id, service = %sub.service_name, "subscription created");
    Ok(sub)
  }

  #[tracing::instrument(parent = &self.span, name = "get", skip(self))]
  pub async fn get(&self, id: SubscriptionId) -> Result<Subscription> {
    self
      .store
      .get(id)
      .await
      .map_err(storage)?
      .ok_or(Error::NotFound(id))
  }

  #[tracing::instrument(parent = &self.span, name = "list", skip(self))]
  pub async fn list(&self, query: &SubscriptionQuery) -> Result<Vec<Subscription>> {
    let subs = self.store.list(query).await.map_err(storage)?;
    tracing::debug!(count = subs.len(), "listed subscriptions");
    Ok(subs)
  }

  /// Merge `patch` into the stored record. The read, merge and write happen
  /// as one store operation, so a concurrent update cannot be lost between
  /// them.
  #[tracing::instrument(
    parent = &self.span,
    name = "update",
    skip(self, patch),
    fields(empty_patch = patch.is_empty()),
  )]
  pub async fn update(
    &self,
    id: SubscriptionId,
    patch: SubscriptionPatch,
  ) -> Result<Subscription> {
    let outcome = self
      .store
      .read_modify_write(id, move |existing| apply_patch(existing, patch))
      .await
      .map_err(storage)?;

    match outcome {
      ModifyOutcome::Updated(sub) => {
        tracing::info!("subscription updated");
        Ok(sub)
      }
      ModifyOutcome::Rejected(e) => {
        tracing::warn!(error = %e, "rejected patch");
        Err(e.into())
      }
      ModifyOutcome::NotFound => Err(Error::NotFound(id)),
    }
  }

  #[tracing::instrument(parent = &self.span, name = "delete", skip(self))]
  pub async fn delete(&self, id: SubscriptionId) -> Result<()> {
    match self.store.delete(id).await.map_err(storage)? {
      0 => Err(Error::NotFound(id)),
      _ => {
        tracing::info!("subscription deleted");
        Ok(())
      }
    }
  }

  /// Total billed across matching subscriptions for the query window.
  #[tracing::instrument(
    parent = &self.span,
    name = "total_cost",
    skip_all,
    fields(start = %query.window_start, end = %query.window_end),
  )]
  pub async fn total_cost(&self, query: &CostQuery) -> Result<i64> {
    validate::window(query.window_start, query.window_end).inspect_err(|e| {
      tracing::warn!(error = %e, "rejected cost window");
    })?;

    let candidates = self
      .store
      .scan_overlapping(query.window_start, query.window_end)
      .await
      .map_err(storage)?;

    let total = cost::compute_total_cost(query, &candidates)?;
    tracing::info!(candidates = candidates.len(), total, "computed total cost");
    Ok(total)
  }
}

fn storage<E>(err: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  tracing::error!(error = %err, "store operation failed");
  Error::storage(err)
}
