//! Core types and logic for tracking paid subscriptions and aggregating
//! their cost over calendar-month windows.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage is reached through [`store::SubscriptionStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cost;
pub mod error;
pub mod month;
pub mod patch;
pub mod service;
pub mod store;
pub mod subscription;
pub mod validate;

pub use error::{Error, ParseError, Result, ValidationError};
pub use month::{CalendarMonth, parse_month_year};
pub use service::SubscriptionService;
