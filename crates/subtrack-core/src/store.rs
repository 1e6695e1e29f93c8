//! The `SubscriptionStore` trait and supporting query types.
//!
//! Storage backends (e.g. `subtrack-store-sqlite`) implement the trait; the
//! service and transport layers depend only on this abstraction.

use std::future::Future;

use crate::{
  error::ValidationError,
  month::CalendarMonth,
  subscription::{NewSubscription, Subscription, SubscriptionId},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`SubscriptionStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionQuery {
  /// Exact match against the owner id.
  pub user_id:      Option<String>,
  /// Case-insensitive substring of the service name.
  pub service_name: Option<String>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

/// Result of [`SubscriptionStore::read_modify_write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyOutcome {
  /// The merged record was written; this is what the store read back.
  Updated(Subscription),
  /// The modification was refused; nothing was written.
  Rejected(ValidationError),
  NotFound,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Persistence for subscription records.
///
/// Every method returns a `Send` future so stores can be shared across a
/// multi-threaded runtime.
pub trait SubscriptionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new record under a freshly assigned id.
  fn create(
    &self,
    data: NewSubscription,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: SubscriptionId,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + '_;

  /// List records matching `query`. Rows that cannot be decoded are skipped.
  fn list<'a>(
    &'a self,
    query: &'a SubscriptionQuery,
  ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + 'a;

  /// All records active in at least one month of `[start, end]`:
  /// `start_date <= end AND (end_date IS NULL OR end_date >= start)`.
  fn scan_overlapping(
    &self,
    start: CalendarMonth,
    end: CalendarMonth,
  ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + '_;

  /// Replace every field of an existing record. Returns `None` if `id` is
  /// unknown.
  fn update(
    &self,
    id: SubscriptionId,
    data: NewSubscription,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + '_;

  /// Atomically read the record, pass it through `f`, and write back the
  /// result. A concurrent writer cannot interleave between the read and the
  /// write. The id of the value returned by `f` is ignored.
  fn read_modify_write<F>(
    &self,
    id: SubscriptionId,
    f: F,
  ) -> impl Future<Output = Result<ModifyOutcome, Self::Error>> + Send + '_
  where
    F: FnOnce(Subscription) -> Result<Subscription, ValidationError> + Send + 'static;

  /// Delete a record, returning the number of rows removed (0 or 1).
  fn delete(
    &self,
    id: SubscriptionId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
