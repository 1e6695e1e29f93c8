//! Integration tests for `SqliteStore` against an in-memory database.

use subtrack_core::{
  CalendarMonth, Error as CoreError, SubscriptionService, ValidationError,
  cost::CostQuery,
  store::{ModifyOutcome, SubscriptionQuery, SubscriptionStore},
  subscription::{EndDatePatch, NewSubscription, SubscriptionInput, SubscriptionPatch},
};
use tracing::Span;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn month(year: i32, month: u32) -> CalendarMonth {
  CalendarMonth::new(year, month).unwrap()
}

fn data(
  service: &str,
  price: i64,
  user: &str,
  start: CalendarMonth,
  end: Option<CalendarMonth>,
) -> NewSubscription {
  NewSubscription {
    service_name: service.into(),
    price,
    user_id: user.into(),
    start_date: start,
    end_date: end,
  }
}

// ─── CRUD ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get() {
  let s = store().await;

  let created = s
    .create(data("Netflix", 799, "alice", month(2023, 1), Some(month(2023, 6))))
    .await
    .unwrap();

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn open_ended_roundtrip() {
  let s = store().await;
  let created = s
    .create(data("Spotify", 169, "alice", month(2024, 2), None))
    .await
    .unwrap();

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.end_date, None);
  assert_eq!(fetched.start_date, month(2024, 2));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn ids_are_unique() {
  let s = store().await;
  let a = s.create(data("A", 1, "u", month(2023, 1), None)).await.unwrap();
  let b = s.create(data("A", 1, "u", month(2023, 1), None)).await.unwrap();
  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn update_replaces_record() {
  let s = store().await;
  let created = s.create(data("A", 1, "u", month(2023, 1), None)).await.unwrap();

  let updated = s
    .update(created.id, data("B", 2, "v", month(2023, 2), Some(month(2023, 4))))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.service_name, "B");
  assert_eq!(updated.end_date, Some(month(2023, 4)));
  assert_eq!(s.get(created.id).await.unwrap().unwrap(), updated);
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let result = s
    .update(Uuid::new_v4(), data("A", 1, "u", month(2023, 1), None))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_reports_affected_rows() {
  let s = store().await;
  let created = s.create(data("A", 1, "u", month(2023, 1), None)).await.unwrap();

  assert_eq!(s.delete(created.id).await.unwrap(), 1);
  assert_eq!(s.delete(created.id).await.unwrap(), 0);
  assert!(s.get(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn schema_rejects_negative_price() {
  let s = store().await;
  assert!(s.create(data("A", -1, "u", month(2023, 1), None)).await.is_err());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_and_paginates() {
  let s = store().await;
  s.create(data("Yandex Plus", 1, "alice", month(2023, 3), None)).await.unwrap();
  s.create(data("Кинопоиск", 1, "alice", month(2023, 1), None)).await.unwrap();
  s.create(data("yandex music", 1, "bob", month(2023, 2), None)).await.unwrap();

  let all = s.list(&SubscriptionQuery::default()).await.unwrap();
  assert_eq!(all.len(), 3);
  let starts: Vec<_> = all.iter().map(|sub| sub.start_date).collect();
  assert_eq!(starts, [month(2023, 1), month(2023, 2), month(2023, 3)]);

  let alice = SubscriptionQuery { user_id: Some("alice".into()), ..Default::default() };
  assert_eq!(s.list(&alice).await.unwrap().len(), 2);

  let yandex = SubscriptionQuery { service_name: Some("YANDEX".into()), ..Default::default() };
  assert_eq!(s.list(&yandex).await.unwrap().len(), 2);

  let cyrillic = SubscriptionQuery { service_name: Some("кино".into()), ..Default::default() };
  assert_eq!(s.list(&cyrillic).await.unwrap().len(), 1);

  let page = SubscriptionQuery { limit: Some(1), offset: Some(1), ..Default::default() };
  let page = s.list(&page).await.unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].start_date, month(2023, 2));
}

#[tokio::test]
async fn list_paginates_after_filtering() {
  let s = store().await;
  for (i, name) in ["Netflix", "Кинопоиск", "КИНО+", "Spotify", "кинотеатр"].iter().enumerate() {
    s.create(data(name, 1, "u", month(2023, i as u32 + 1), None)).await.unwrap();
  }

  let query = SubscriptionQuery {
    service_name: Some("кИнО".into()),
    limit: Some(2),
    offset: Some(1),
    ..Default::default()
  };
  let page = s.list(&query).await.unwrap();
  let names: Vec<_> = page.iter().map(|sub| sub.service_name.as_str()).collect();
  assert_eq!(names, ["КИНО+", "кинотеатр"]);

  let past_end = SubscriptionQuery { offset: Some(10), ..Default::default() };
  assert!(s.list(&past_end).await.unwrap().is_empty());

  let none = SubscriptionQuery { limit: Some(0), ..Default::default() };
  assert!(s.list(&none).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_skips_malformed_rows() {
  let s = store().await;
  s.create(data("Good", 1, "u", month(2023, 1), None)).await.unwrap();

  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO subscriptions (id, service_name, price, user_id, start_date)
         VALUES ('not-a-uuid', 'Bad', 1, 'u', '2023-01-01')",
        [],
      )?;
      conn.execute(
        "INSERT INTO subscriptions (id, service_name, price, user_id, start_date)
         VALUES (?1, 'Bad date', 1, 'u', 'January')",
        [Uuid::new_v4().to_string()],
      )?;
      // INTEGER affinity keeps a non-numeric string as TEXT, and the CHECK
      // constraint compares TEXT as greater than any number.
      conn.execute(
        "INSERT INTO subscriptions (id, service_name, price, user_id, start_date)
         VALUES (?1, 'Bad price', 'abc', 'u', '2023-02-01')",
        [Uuid::new_v4().to_string()],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let listed = s.list(&SubscriptionQuery::default()).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].service_name, "Good");
}

// ─── Overlap scan ────────────────────────────────────────────────────────────

#[tokio::test]
async fn scan_overlapping_is_a_hard_filter() {
  let s = store().await;
  let before = s
    .create(data("before", 1, "u", month(2022, 1), Some(month(2022, 12))))
    .await
    .unwrap();
  let touching_start = s
    .create(data("touch-start", 1, "u", month(2022, 6), Some(month(2023, 1))))
    .await
    .unwrap();
  let open = s.create(data("open", 1, "u", month(2020, 1), None)).await.unwrap();
  let touching_end = s
    .create(data("touch-end", 1, "u", month(2023, 12), None))
    .await
    .unwrap();
  let after = s.create(data("after", 1, "u", month(2024, 1), None)).await.unwrap();

  let found: Vec<_> = s
    .scan_overlapping(month(2023, 1), month(2023, 12))
    .await
    .unwrap()
    .into_iter()
    .map(|sub| sub.id)
    .collect();

  assert_eq!(found.len(), 3);
  assert!(found.contains(&touching_start.id));
  assert!(found.contains(&open.id));
  assert!(found.contains(&touching_end.id));
  assert!(!found.contains(&before.id));
  assert!(!found.contains(&after.id));
}

// ─── Read-modify-write ───────────────────────────────────────────────────────

#[tokio::test]
async fn read_modify_write_applies_and_reads_back() {
  let s = store().await;
  let created = s.create(data("A", 1, "u", month(2023, 1), None)).await.unwrap();

  let outcome = s
    .read_modify_write(created.id, |mut sub| {
      sub.price = 42;
      Ok(sub)
    })
    .await
    .unwrap();

  let ModifyOutcome::Updated(updated) = outcome else {
    panic!("expected Updated, got {outcome:?}");
  };
  assert_eq!(updated.price, 42);
  assert_eq!(s.get(created.id).await.unwrap().unwrap().price, 42);
}

#[tokio::test]
async fn read_modify_write_rejection_leaves_record() {
  let s = store().await;
  let created = s.create(data("A", 1, "u", month(2023, 1), None)).await.unwrap();

  let outcome = s
    .read_modify_write(created.id, |_| Err(ValidationError::NegativePrice(-1)))
    .await
    .unwrap();

  assert_eq!(outcome, ModifyOutcome::Rejected(ValidationError::NegativePrice(-1)));
  assert_eq!(s.get(created.id).await.unwrap().unwrap(), created);
}

#[tokio::test]
async fn read_modify_write_missing() {
  let s = store().await;
  let outcome = s.read_modify_write(Uuid::new_v4(), Ok).await.unwrap();
  assert_eq!(outcome, ModifyOutcome::NotFound);
}

#[tokio::test]
async fn read_modify_write_keeps_id() {
  let s = store().await;
  let created = s.create(data("A", 1, "u", month(2023, 1), None)).await.unwrap();

  let outcome = s
    .read_modify_write(created.id, |mut sub| {
      sub.id = Uuid::new_v4();
      Ok(sub)
    })
    .await
    .unwrap();

  assert_eq!(outcome, ModifyOutcome::Updated(created.clone()));
}

// ─── Service over SQLite ─────────────────────────────────────────────────────

async fn service() -> SubscriptionService<SqliteStore> {
  SubscriptionService::new(store().await, Span::none())
}

fn input(price: i64, start: CalendarMonth, end: Option<CalendarMonth>) -> SubscriptionInput {
  SubscriptionInput {
    service_name: "Yandex Plus".into(),
    price,
    user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".into(),
    start_date: Some(start),
    end_date: end,
  }
}

#[tokio::test]
async fn service_total_cost_scenarios() {
  let svc = service().await;
  svc.create(input(400, month(2023, 1), Some(month(2023, 3)))).await.unwrap();

  let one = CostQuery::new(month(2023, 2), month(2023, 2));
  assert_eq!(svc.total_cost(&one).await.unwrap(), 400);

  let year = CostQuery::new(month(2023, 1), month(2023, 12));
  assert_eq!(svc.total_cost(&year).await.unwrap(), 1200);
}

#[tokio::test]
async fn service_total_cost_mixed_open_and_bounded() {
  let svc = service().await;
  svc.create(input(100, month(2023, 1), None)).await.unwrap();
  svc.create(input(200, month(2023, 6), Some(month(2023, 8)))).await.unwrap();

  let june = CostQuery::new(month(2023, 6), month(2023, 6));
  assert_eq!(svc.total_cost(&june).await.unwrap(), 300);
}

#[tokio::test]
async fn service_total_cost_filters() {
  let svc = service().await;
  svc.create(input(100, month(2023, 1), None)).await.unwrap();
  let mut other = input(1000, month(2023, 1), None);
  other.user_id = "someone-else".into();
  other.service_name = "Spotify".into();
  svc.create(other).await.unwrap();

  let mut query = CostQuery::new(month(2023, 1), month(2023, 1));
  assert_eq!(svc.total_cost(&query).await.unwrap(), 1100);

  query.service_name = Some("spot".into());
  assert_eq!(svc.total_cost(&query).await.unwrap(), 1000);

  query.service_name = None;
  query.user_id = Some("60601fee-2bf1-4721-ae6f-7636e79a0cba".into());
  assert_eq!(svc.total_cost(&query).await.unwrap(), 100);
}

#[tokio::test]
async fn service_rejects_inverted_window() {
  let svc = service().await;
  let err = svc
    .total_cost(&CostQuery::new(month(2023, 5), month(2023, 4)))
    .await
    .unwrap_err();
  assert_eq!(err.code(), "invalid_window");
}

#[tokio::test]
async fn service_create_validates() {
  let svc = service().await;
  let err = svc
    .create(input(100, month(2023, 5), Some(month(2023, 4))))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    CoreError::Validation(ValidationError::DateOrderViolation { .. }),
  ));
  assert!(svc.list(&SubscriptionQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn service_update_clears_end_date() {
  let svc = service().await;
  let created = svc.create(input(100, month(2023, 1), Some(month(2023, 3)))).await.unwrap();

  let patch = SubscriptionPatch { end_date: EndDatePatch::Clear, ..Default::default() };
  let updated = svc.update(created.id, patch).await.unwrap();
  assert_eq!(updated.end_date, None);
  assert_eq!(svc.get(created.id).await.unwrap().end_date, None);
}

#[tokio::test]
async fn service_update_rejection_keeps_stored_record() {
  let svc = service().await;
  let created = svc.create(input(100, month(2023, 1), Some(month(2023, 3)))).await.unwrap();

  let patch = SubscriptionPatch { end_date: EndDatePatch::Set(month(2022, 12)), ..Default::default() };
  let err = svc.update(created.id, patch).await.unwrap_err();
  assert_eq!(err.code(), "date_order_violation");
  assert_eq!(svc.get(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn service_empty_patch_is_identity() {
  let svc = service().await;
  let created = svc.create(input(100, month(2023, 1), None)).await.unwrap();
  let updated = svc.update(created.id, SubscriptionPatch::default()).await.unwrap();
  assert_eq!(updated, created);
}

#[tokio::test]
async fn service_not_found() {
  let svc = service().await;
  let id = Uuid::new_v4();
  assert!(matches!(svc.get(id).await, Err(CoreError::NotFound(x)) if x == id));
  assert!(matches!(svc.delete(id).await, Err(CoreError::NotFound(_))));
  assert!(matches!(
    svc.update(id, SubscriptionPatch::default()).await,
    Err(CoreError::NotFound(_)),
  ));
}
