//! Error types for `subtrack-core`.
//!
//! Every error carries a stable [`code`](Error::code) so callers can pick a
//! response without inspecting message text.

use thiserror::Error;

use crate::{month::CalendarMonth, subscription::SubscriptionId};

/// A date token that is not a valid `MM-YYYY` month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date {token:?}, expected MM-YYYY")]
pub struct ParseError {
  token: String,
}

impl ParseError {
  pub(crate) fn new(token: &str) -> Self { Self { token: token.to_owned() } }

  /// The rejected input, verbatim.
  pub fn token(&self) -> &str { &self.token }
}

/// A rule violated by a subscription record or a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("end date {end} precedes start date {start}")]
  DateOrderViolation {
    start: CalendarMonth,
    end:   CalendarMonth,
  },

  #[error("price must not be negative, got {0}")]
  NegativePrice(i64),

  #[error("window end {end} precedes window start {start}")]
  InvalidWindow {
    start: CalendarMonth,
    end:   CalendarMonth,
  },

  #[error("total cost for the window does not fit in a 64-bit integer")]
  CostOverflow,
}

impl ValidationError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::MissingField(_) => "missing_field",
      Self::DateOrderViolation { .. } => "date_order_violation",
      Self::NegativePrice(_) => "negative_price",
      Self::InvalidWindow { .. } => "invalid_window",
      Self::CostOverflow => "cost_overflow",
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Parse(#[from] ParseError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("subscription not found: {0}")]
  NotFound(SubscriptionId),

  /// The record store failed; the cause is kept for logging.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }

  pub fn code(&self) -> &'static str {
    match self {
      Self::Parse(_) => "invalid_date",
      Self::Validation(v) => v.code(),
      Self::NotFound(_) => "not_found",
      Self::Storage(_) => "storage",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
