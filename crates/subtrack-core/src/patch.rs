//! Merge-patch resolution: apply a partial update to an existing record.

use crate::{
  error::ValidationError,
  subscription::{EndDatePatch, Subscription, SubscriptionPatch},
  validate,
};

/// Merge `patch` into `existing` and re-validate the result.
///
/// - `service_name`, `user_id`: overwritten only by a non-empty value.
/// - `price`: overwritten only by a non-zero value; `Some(0)` is a no-op.
/// - `start_date`: overwritten whenever present.
/// - `end_date`: [`EndDatePatch::Keep`], [`EndDatePatch::Clear`] or
///   [`EndDatePatch::Set`].
///
/// The id is never touched.
pub fn apply_patch(
  existing: Subscription,
  patch: SubscriptionPatch,
) -> Result<Subscription, ValidationError> {
  let mut merged = existing;

  if let Some(name) = patch.service_name.filter(|s| !s.is_empty()) {
    merged.service_name = name;
  }
  if let Some(user) = patch.user_id.filter(|s| !s.is_empty()) {
    merged.user_id = user;
  }
  if let Some(price) = patch.price.filter(|p| *p != 0) {
    merged.price = price;
  }
  if let Some(start) = patch.start_date {
    merged.start_date = start;
  }
  match patch.end_date {
    EndDatePatch::Keep => {}
    EndDatePatch::Clear => merged.end_date = None,
    EndDatePatch::Set(end) => merged.end_date = Some(end),
  }

  validate::record(&merged)?;
  Ok(merged)
}
