//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Month anchors are stored as `YYYY-MM-01`, so string comparison in SQL
//! orders them chronologically. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::NaiveDate;
use subtrack_core::{
  month::CalendarMonth,
  subscription::{Subscription, SubscriptionId},
};
use uuid::Uuid;

use crate::{Error, Result};

/// Column list shared by every `SELECT`; matches [`raw_row`].
pub const COLUMNS: &str = "id, service_name, price, user_id, start_date, end_date";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── CalendarMonth ───────────────────────────────────────────────────────────

pub fn encode_month(m: CalendarMonth) -> String {
  format!("{:04}-{:02}-01", m.year(), m.month())
}

pub fn decode_month(s: &str) -> Result<CalendarMonth> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map(CalendarMonth::from)
    .map_err(|e| Error::Decode(format!("bad month {s:?}: {e}")))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `subscriptions` row.
pub struct RawSubscription {
  pub id:           String,
  pub service_name: String,
  pub price:        i64,
  pub user_id:      String,
  pub start_date:   String,
  pub end_date:     Option<String>,
}

/// Row mapper for queries selecting [`COLUMNS`].
pub fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubscription> {
  Ok(RawSubscription {
    id:           row.get(0)?,
    service_name: row.get(1)?,
    price:        row.get(2)?,
    user_id:      row.get(3)?,
    start_date:   row.get(4)?,
    end_date:     row.get(5)?,
  })
}

impl RawSubscription {
  pub fn into_subscription(self) -> Result<Subscription> {
    let id: SubscriptionId = decode_uuid(&self.id)?;
    Ok(Subscription {
      id,
      service_name: self.service_name,
      price:        self.price,
      user_id:      self.user_id,
      start_date:   decode_month(&self.start_date)?,
      end_date:     self.end_date.as_deref().map(decode_month).transpose()?,
    })
  }
}
