//! Invariants enforced before anything reaches the store.

use crate::{
  error::ValidationError,
  month::CalendarMonth,
  subscription::{NewSubscription, Subscription, SubscriptionInput},
};

/// Check a creation input and turn it into storable record data.
pub fn new_subscription(
  input: SubscriptionInput,
) -> Result<NewSubscription, ValidationError> {
  if input.service_name.is_empty() {
    return Err(ValidationError::MissingField("service_name"));
  }
  if input.user_id.is_empty() {
    return Err(ValidationError::MissingField("user_id"));
  }
  let start_date = input
    .start_date
    .ok_or(ValidationError::MissingField("start_date"))?;

  date_order(start_date, input.end_date)?;
  price(input.price)?;

  Ok(NewSubscription {
    service_name: input.service_name,
    price: input.price,
    user_id: input.user_id,
    start_date,
    end_date: input.end_date,
  })
}

/// Rules that must hold for any stored record.
pub fn record(sub: &Subscription) -> Result<(), ValidationError> {
  date_order(sub.start_date, sub.end_date)?;
  price(sub.price)
}

/// A same-month start and end is allowed.
pub fn date_order(
  start: CalendarMonth,
  end: Option<CalendarMonth>,
) -> Result<(), ValidationError> {
  match end {
    Some(end) if end < start => {
      Err(ValidationError::DateOrderViolation { start, end })
    }
    _ => Ok(()),
  }
}

pub fn price(price: i64) -> Result<(), ValidationError> {
  if price < 0 {
    return Err(ValidationError::NegativePrice(price));
  }
  Ok(())
}

pub fn window(
  start: CalendarMonth,
  end: CalendarMonth,
) -> Result<(), ValidationError> {
  if end < start {
    return Err(ValidationError::InvalidWindow { start, end });
  }
  Ok(())
}
