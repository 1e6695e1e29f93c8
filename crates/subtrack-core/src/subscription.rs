//! Subscription records and the inputs that create or modify them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::month::CalendarMonth;

/// Store-assigned record identifier. Never reused after deletion.
pub type SubscriptionId = Uuid;

/// Whether `needle` occurs in `service_name`, ignoring case. Folding is
/// Unicode-aware, so `"кино"` matches `"Кинопоиск"`.
pub fn service_name_matches(service_name: &str, needle: &str) -> bool {
  service_name.to_lowercase().contains(&needle.to_lowercase())
}

/// A persisted subscription to a paid service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
  pub id:           SubscriptionId,
  pub service_name: String,
  /// Whole currency units per month.
  pub price:        i64,
  /// Opaque owner identifier.
  pub user_id:      String,
  pub start_date:   CalendarMonth,
  /// `None` means open-ended.
  pub end_date:     Option<CalendarMonth>,
}

impl Subscription {
  /// Attach an id to validated record data.
  pub fn from_parts(id: SubscriptionId, data: NewSubscription) -> Self {
    Self {
      id,
      service_name: data.service_name,
      price:        data.price,
      user_id:      data.user_id,
      start_date:   data.start_date,
      end_date:     data.end_date,
    }
  }

  /// Case-insensitive substring match against the service name.
  pub fn service_matches(&self, needle: &str) -> bool {
    service_name_matches(&self.service_name, needle)
  }

  /// Everything except the id, e.g. to hand back to the store on update.
  pub fn data(&self) -> NewSubscription {
    NewSubscription {
      service_name: self.service_name.clone(),
      price:        self.price,
      user_id:      self.user_id.clone(),
      start_date:   self.start_date,
      end_date:     self.end_date,
    }
  }
}

/// Validated record data without an id.
///
/// Produced by [`crate::validate::new_subscription`]; input to
/// [`crate::store::SubscriptionStore::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
  pub service_name: String,
  pub price:        i64,
  pub user_id:      String,
  pub start_date:   CalendarMonth,
  pub end_date:     Option<CalendarMonth>,
}

/// Unvalidated creation input, as decoded by a transport adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionInput {
  pub service_name: String,
  pub price:        i64,
  pub user_id:      String,
  pub start_date:   Option<CalendarMonth>,
  pub end_date:     Option<CalendarMonth>,
}

// ─── Patches ─────────────────────────────────────────────────────────────────

/// What a patch does to `end_date`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndDatePatch {
  /// Field omitted: leave the stored value alone.
  #[default]
  Keep,
  /// Field present but empty: make the subscription open-ended.
  Clear,
  /// Field present with a value.
  Set(CalendarMonth),
}

/// A partial update. See [`crate::patch::apply_patch`] for merge rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
  pub service_name: Option<String>,
  pub price:        Option<i64>,
  pub user_id:      Option<String>,
  pub start_date:   Option<CalendarMonth>,
  pub end_date:     EndDatePatch,
}

impl SubscriptionPatch {
  pub fn is_empty(&self) -> bool { self == &Self::default() }
}
