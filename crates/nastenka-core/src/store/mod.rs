//! Message store abstraction.
//!
//! [`MessageStore`] is the append-only log behind the board: one insert and
//! one ordered read. The default implementation is [`sqlite::SqliteStore`].
//! To swap to another database, implement [`MessageStore`] for the new type
//! and hand it to [`crate::MessageBoard::new`].
//!
//! All trait methods use `impl Future` in their signatures, so no
//! `async-trait` crate is required.

pub mod sqlite;

use std::future::Future;

use crate::record::MessageRecord;

/// Durable, append-only record log.
pub trait MessageStore: Send + Sync + 'static {
    /// Persist a new message and return the id the store assigned to it.
    ///
    /// Callers must validate `name` and `body` first; the store does not.
    fn insert_message(
        &self,
        name: &str,
        body: &str,
    ) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    /// Every stored message, newest first.
    fn list_messages(&self) -> impl Future<Output = Result<Vec<MessageRecord>, sqlx::Error>> + Send;
}
