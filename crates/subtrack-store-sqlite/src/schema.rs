//! SQL schema for the subscription store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS subscriptions (
    id            TEXT PRIMARY KEY,               -- hyphenated UUID v4
    service_name  TEXT NOT NULL,
    price         INTEGER NOT NULL CHECK (price >= 0),
    user_id       TEXT NOT NULL,
    start_date    TEXT NOT NULL,                  -- 'YYYY-MM-01'
    end_date      TEXT,                           -- 'YYYY-MM-01' or NULL (open-ended)
    CHECK (end_date IS NULL OR end_date >= start_date)
);

CREATE INDEX IF NOT EXISTS subscriptions_user_idx  ON subscriptions(user_id);
CREATE INDEX IF NOT EXISTS subscriptions_start_idx ON subscriptions(start_date);

PRAGMA user_version = 1;
";
