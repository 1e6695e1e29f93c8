//! Wire shapes for request and response bodies.
//!
//! Dates travel as `MM-YYYY` tokens. Empty strings are read as "not
//! supplied" throughout.

use serde::{Deserialize, Deserializer, Serialize};
use subtrack_core::{
  CalendarMonth, ParseError, parse_month_year,
  subscription::{EndDatePatch, SubscriptionId, SubscriptionInput, SubscriptionPatch},
};

/// `None` for a missing or empty token, otherwise the parsed month.
fn optional_month(token: Option<&str>) -> Result<Option<CalendarMonth>, ParseError> {
  token.filter(|t| !t.is_empty()).map(parse_month_year).transpose()
}

/// Collapse empty query/body strings to `None`.
pub(crate) fn non_empty(s: Option<String>) -> Option<String> {
  s.filter(|s| !s.is_empty())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /subscriptions`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBody {
  pub service_name: String,
  pub price:        i64,
  pub user_id:      String,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
}

impl TryFrom<CreateBody> for SubscriptionInput {
  type Error = ParseError;

  fn try_from(b: CreateBody) -> Result<Self, Self::Error> {
    Ok(SubscriptionInput {
      start_date:   optional_month(b.start_date.as_deref())?,
      end_date:     optional_month(b.end_date.as_deref())?,
      service_name: b.service_name,
      price:        b.price,
      user_id:      b.user_id,
    })
  }
}

#[derive(Debug, Serialize)]
pub struct Created {
  pub id: SubscriptionId,
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// Distinguish a key set to `null` (`Some(None)`) from an absent key
/// (`None`, via `#[serde(default)]`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

/// JSON body accepted by `PUT`/`PATCH /subscriptions/:id`.
///
/// `end_date`: absent keeps the stored value, `null` or `""` clears it, a
/// `MM-YYYY` token sets it.
#[derive(Debug, Default, Deserialize)]
pub struct PatchBody {
  pub service_name: Option<String>,
  pub price:        Option<i64>,
  pub user_id:      Option<String>,
  pub start_date:   Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub end_date:     Option<Option<String>>,
}

impl TryFrom<PatchBody> for SubscriptionPatch {
  type Error = ParseError;

  fn try_from(b: PatchBody) -> Result<Self, Self::Error> {
    let end_date = match b.end_date {
      None => EndDatePatch::Keep,
      Some(token) => match optional_month(token.as_deref())? {
        None => EndDatePatch::Clear,
        Some(end) => EndDatePatch::Set(end),
      },
    };

    Ok(SubscriptionPatch {
      service_name: b.service_name,
      price: b.price,
      user_id: b.user_id,
      start_date: optional_month(b.start_date.as_deref())?,
      end_date,
    })
  }
}

// ─── Total cost ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TotalCost {
  pub total_cost: i64,
}
