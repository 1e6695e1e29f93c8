//! Cost aggregation over a window of calendar months.
//!
//! A subscription is billed once per month in which it is active, counting
//! both boundary months. Only the months that fall inside the query window
//! are billed.

use crate::{
  error::ValidationError,
  month::CalendarMonth,
  subscription::Subscription,
  validate,
};

/// Parameters for a total-cost query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
  /// Exact match against the owner id.
  pub user_id:      Option<String>,
  /// Case-insensitive substring of the service name.
  pub service_name: Option<String>,
  pub window_start: CalendarMonth,
  pub window_end:   CalendarMonth,
}

impl CostQuery {
  pub fn new(window_start: CalendarMonth, window_end: CalendarMonth) -> Self {
    Self { user_id: None, service_name: None, window_start, window_end }
  }

  /// Whether `sub` passes the optional owner and service filters.
  pub fn matches(&self, sub: &Subscription) -> bool {
    if let Some(user) = &self.user_id
      && sub.user_id != *user
    {
      return false;
    }
    if let Some(needle) = &self.service_name
      && !sub.service_matches(needle)
    {
      return false;
    }
    true
  }
}

/// True if `sub` is active in at least one month of `[start, end]`.
pub fn overlaps(sub: &Subscription, start: CalendarMonth, end: CalendarMonth) -> bool {
  sub.start_date <= end && sub.end_date.is_none_or(|e| e >= start)
}

/// Inclusive count of months `sub` is active within `[start, end]`.
/// Zero when the two do not intersect.
pub fn billed_months(sub: &Subscription, start: CalendarMonth, end: CalendarMonth) -> i64 {
  let effective_start = sub.start_date.max(start);
  let effective_end = match sub.end_date {
    Some(sub_end) => sub_end.min(end),
    None => end,
  };
  (effective_start.months_until(effective_end) + 1).max(0)
}

/// Sum `price × billed months` over every subscription that overlaps the
/// window and passes the query's filters. Fails with
/// [`ValidationError::CostOverflow`] rather than wrapping.
pub fn compute_total_cost<'a, I>(
  query: &CostQuery,
  subscriptions: I,
) -> Result<i64, ValidationError>
where
  I: IntoIterator<Item = &'a Subscription>,
{
  let (start, end) = (query.window_start, query.window_end);
  validate::window(start, end)?;

  subscriptions
    .into_iter()
    .filter(|sub| overlaps(sub, start, end) && query.matches(sub))
    .try_fold(0_i64, |total, sub| {
      let months = billed_months(sub, start, end);
      tracing::trace!(id = %sub.id, months, price = sub.price, "billed");
      months
        .checked_mul(sub.price)
        .and_then(|cost| total.checked_add(cost))
        .ok_or(ValidationError::CostOverflow)
    })
}
