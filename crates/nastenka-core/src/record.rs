use chrono::{DateTime, Utc};

/// A single row in the `messages` table.
///
/// `id` and `created_at` are assigned by the store; records are never
/// updated or deleted after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: i64,
    /// Author name, 1 to 100 characters.
    pub name: String,
    /// Message body, 1 to 500 characters.
    pub body: String,
    pub created_at: DateTime<Utc>,
}
