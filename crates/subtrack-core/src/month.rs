//! Calendar-month anchors and the `MM-YYYY` token format.
//!
//! Every date in the system is a month: the day is pinned to the 1st and
//! there is no time component, so two tokens naming the same month always
//! compare equal. `MM-YYYY` is the external format in both directions.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::ParseError;

/// A date anchored to the first day of its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth(NaiveDate);

impl CalendarMonth {
  /// Build an anchor from a year and a 1-based month.
  /// Returns `None` for months outside `1..=12` or years chrono cannot hold.
  pub fn new(year: i32, month: u32) -> Option<Self> {
    NaiveDate::from_ymd_opt(year, month, 1).map(Self)
  }

  pub fn year(&self) -> i32 { self.0.year() }

  pub fn month(&self) -> u32 { self.0.month() }

  /// The anchor date (always day 1).
  pub fn first_day(&self) -> NaiveDate { self.0 }

  /// Signed number of month boundaries between `self` and `later`.
  /// Zero when both name the same month.
  pub fn months_until(&self, later: CalendarMonth) -> i64 {
    let years = i64::from(later.year()) - i64::from(self.year());
    let months = i64::from(later.month()) - i64::from(self.month());
    years * 12 + months
  }
}

impl From<NaiveDate> for CalendarMonth {
  /// Truncates to the first day of the date's month.
  fn from(date: NaiveDate) -> Self { Self(date.with_day(1).unwrap_or(date)) }
}

/// Parse a `MM-YYYY` token: two-digit month `01`–`12`, a dash, four-digit
/// year. Anything else is rejected.
pub fn parse_month_year(token: &str) -> Result<CalendarMonth, ParseError> {
  let invalid = || ParseError::new(token);

  let bytes = token.as_bytes();
  if bytes.len() != 7 || bytes[2] != b'-' {
    return Err(invalid());
  }
  let (month, year) = (&token[..2], &token[3..]);
  if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
    return Err(invalid());
  }

  let month: u32 = month.parse().map_err(|_| invalid())?;
  let year: i32 = year.parse().map_err(|_| invalid())?;
  CalendarMonth::new(year, month).ok_or_else(invalid)
}

impl fmt::Display for CalendarMonth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}-{:04}", self.month(), self.year())
  }
}

impl FromStr for CalendarMonth {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { parse_month_year(s) }
}

impl Serialize for CalendarMonth {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for CalendarMonth {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let token = String::deserialize(deserializer)?;
    parse_month_year(&token).map_err(de::Error::custom)
  }
}
