//! [`SqliteStore`], the SQLite implementation of [`SubscriptionStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, functions::FunctionFlags};
use subtrack_core::{
  ValidationError,
  month::CalendarMonth,
  store::{ModifyOutcome, SubscriptionQuery, SubscriptionStore},
  subscription::{NewSubscription, Subscription, SubscriptionId, service_name_matches},
};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{COLUMNS, RawSubscription, encode_month, encode_uuid, raw_row},
  schema::SCHEMA,
};

const DEFAULT_LIST_LIMIT: usize = 100;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A subscription store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// SQL name of the Unicode-aware service-name match. SQLite's own `LIKE`
/// only folds ASCII case.
const CONTAINS_FOLDED: &str = "contains_folded";

/// Install scalar functions the queries rely on. Functions are
/// per-connection, so this runs on every open.
fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    CONTAINS_FOLDED,
    2,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let haystack: Option<String> = ctx.get(0)?;
      let needle: Option<String> = ctx.get(1)?;
      Ok(match (haystack, needle) {
        (Some(haystack), Some(needle)) => service_name_matches(&haystack, &needle),
        _ => false,
      })
    },
  )
}

/// Bind order for `INSERT`/`UPDATE` statements:
/// `service_name, price, user_id, start_date, end_date`.
struct RowValues {
  service_name: String,
  price:        i64,
  user_id:      String,
  start_date:   String,
  end_date:     Option<String>,
}

impl From<&NewSubscription> for RowValues {
  fn from(data: &NewSubscription) -> Self {
    Self {
      service_name: data.service_name.clone(),
      price:        data.price,
      user_id:      data.user_id.clone(),
      start_date:   encode_month(data.start_date),
      end_date:     data.end_date.map(encode_month),
    }
  }
}

/// `UPDATE` one row by id. Returns the number of rows changed.
fn write_row(conn: &rusqlite::Connection, id: &str, row: &RowValues) -> rusqlite::Result<usize> {
  conn.execute(
    "UPDATE subscriptions
        SET service_name = ?1, price = ?2, user_id = ?3,
            start_date = ?4, end_date = ?5
      WHERE id = ?6",
    rusqlite::params![
      row.service_name,
      row.price,
      row.user_id,
      row.start_date,
      row.end_date,
      id,
    ],
  )
}

fn read_row(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawSubscription>> {
  conn
    .query_row(
      &format!("SELECT {COLUMNS} FROM subscriptions WHERE id = ?1"),
      rusqlite::params![id],
      raw_row,
    )
    .optional()
}

/// Surface a decode failure from inside a connection closure.
fn in_call(e: Error) -> tokio_rusqlite::Error { tokio_rusqlite::Error::Other(Box::new(e)) }

// ─── SubscriptionStore impl ──────────────────────────────────────────────────

impl SubscriptionStore for SqliteStore {
  type Error = Error;

  async fn create(&self, data: NewSubscription) -> Result<Subscription> {
    let id = Uuid::new_v4();
    let id_str = encode_uuid(id);
    let row = RowValues::from(&data);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            row.service_name,
            row.price,
            row.user_id,
            row.start_date,
            row.end_date,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(Subscription::from_parts(id, data))
  }

  async fn get(&self, id: SubscriptionId) -> Result<Option<Subscription>> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| Ok(read_row(conn, &id_str)?))
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }

  async fn list(&self, query: &SubscriptionQuery) -> Result<Vec<Subscription>> {
    let user_id = query.user_id.clone();
    let service_name = query.service_name.clone();
    let limit = i64::try_from(query.limit.unwrap_or(DEFAULT_LIST_LIMIT)).unwrap_or(i64::MAX);
    let offset = i64::try_from(query.offset.unwrap_or(0)).unwrap_or(i64::MAX);

    // Rows are decoded one by one so a single bad row cannot fail the page.
    let rows: Vec<rusqlite::Result<RawSubscription>> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM subscriptions
            WHERE (?1 IS NULL OR user_id = ?1)
              AND (?2 IS NULL OR {CONTAINS_FOLDED}(service_name, ?2))
            ORDER BY start_date, id
            LIMIT ?3 OFFSET ?4"
        ))?;
        let rows: Vec<_> = stmt
          .query_map(rusqlite::params![user_id, service_name, limit, offset], raw_row)?
          .collect();
        Ok(rows)
      })
      .await?;

    let subs = rows
      .into_iter()
      .filter_map(|row| match row {
        Ok(raw) => {
          let id = raw.id.clone();
          raw
            .into_subscription()
            .inspect_err(|e| tracing::warn!(%id, error = %e, "skipping malformed row"))
            .ok()
        }
        Err(e) => {
          tracing::warn!(error = %e, "skipping unreadable row");
          None
        }
      })
      .collect();

    Ok(subs)
  }

  async fn scan_overlapping(
    &self,
    start: CalendarMonth,
    end: CalendarMonth,
  ) -> Result<Vec<Subscription>> {
    let start_str = encode_month(start);
    let end_str = encode_month(end);

    let raws: Vec<RawSubscription> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM subscriptions
            WHERE start_date <= ?2
              AND (end_date IS NULL OR end_date >= ?1)"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![start_str, end_str], raw_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscription::into_subscription).collect()
  }

  async fn update(
    &self,
    id: SubscriptionId,
    data: NewSubscription,
  ) -> Result<Option<Subscription>> {
    let id_str = encode_uuid(id);
    let row = RowValues::from(&data);

    let raw = self
      .conn
      .call(move |conn| {
        if write_row(conn, &id_str, &row)? == 0 {
          return Ok(None);
        }
        Ok(read_row(conn, &id_str)?)
      })
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }

  async fn read_modify_write<F>(&self, id: SubscriptionId, f: F) -> Result<ModifyOutcome>
  where
    F: FnOnce(Subscription) -> Result<Subscription, ValidationError> + Send + 'static,
  {
    let id_str = encode_uuid(id);

    let outcome = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without committing rolls back.
        let tx = conn.transaction()?;

        let Some(raw) = read_row(&tx, &id_str)? else {
          return Ok(ModifyOutcome::NotFound);
        };
        let existing = raw.into_subscription().map_err(in_call)?;

        let merged = match f(existing) {
          Ok(merged) => merged,
          Err(e) => return Ok(ModifyOutcome::Rejected(e)),
        };

        write_row(&tx, &id_str, &RowValues::from(&merged.data()))?;
        let stored = read_row(&tx, &id_str)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?
          .into_subscription()
          .map_err(in_call)?;

        tx.commit()?;
        Ok(ModifyOutcome::Updated(stored))
      })
      .await?;

    Ok(outcome)
  }

  async fn delete(&self, id: SubscriptionId) -> Result<u64> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM subscriptions WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(affected as u64)
  }
}
