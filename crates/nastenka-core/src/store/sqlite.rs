//! SQLite implementation of [`MessageStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature. Migrations are embedded at compile
//! time from `./migrations` (relative to `CARGO_MANIFEST_DIR`) and run by
//! [`SqliteStore::connect`].
//!
//! The runtime-checked `sqlx::query` form is used so no `DATABASE_URL` is
//! needed at compile time.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::MessageStore;
use crate::record::MessageRecord;

/// SQLite-backed message log.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://nastenka.db"`
    /// or `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Each connection to an in-memory database gets its own private
        // database, so the pool must hold exactly one and never recycle it.
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Round-trip a trivial query to confirm the database is reachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection; later queries fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Fixed-width UTC timestamps keep `ORDER BY created_at` chronological.
fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl MessageStore for SqliteStore {
    async fn insert_message(&self, name: &str, body: &str) -> Result<i64, sqlx::Error> {
        let created_at = encode_timestamp(Utc::now());
        let result = sqlx::query(
            "INSERT INTO messages (name, message, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(body)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn list_messages(&self) -> Result<Vec<MessageRecord>, sqlx::Error> {
        let rows: Vec<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, name, message, created_at \
             FROM messages ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, body, created_at)| MessageRecord {
                id,
                name,
                body,
                created_at: created_at.parse().unwrap_or_else(|e: chrono::ParseError| {
                    tracing::warn!(raw = %created_at, error = %e, "failed to parse message created_at; using now");
                    Utc::now()
                }),
            })
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encoded_timestamps_sort_chronologically() {
        let earlier: DateTime<Utc> = "2026-01-02T03:04:05Z".parse().unwrap();
        let later: DateTime<Utc> = "2026-01-02T03:04:05.5Z".parse().unwrap();
        let a = encode_timestamp(earlier);
        let b = encode_timestamp(later);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(a, "2026-01-02T03:04:05.000000Z");
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let first = store.insert_message("Ana", "hello").await.unwrap();
        let second = store.insert_message("Ben", "ahoj").await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let first = store.insert_message("Ana", "one").await.unwrap();
        let second = store.insert_message("Ben", "two").await.unwrap();
        let third = store.insert_message("Cyril", "three").await.unwrap();

        let ids: Vec<i64> = store
            .list_messages()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[tokio::test]
    async fn ping_fails_after_close() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.ping().await.unwrap();
        store.close().await;
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        assert!(store.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stored_fields_round_trip_unicode() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let id = store.insert_message("Jenda", "Žádné zprávy?").await.unwrap();
        let records = store.list_messages().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].name, "Jenda");
        assert_eq!(records[0].body, "Žádné zprávy?");
    }
}
