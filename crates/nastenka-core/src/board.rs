//! Submission validation and the board service.
//!
//! [`MessageBoard`] owns no global state: the store and the renderer are
//! handed in by the caller, and every operation runs to completion on its
//! own.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::BoardError;
use crate::record::MessageRecord;
use crate::render::BoardRenderer;
use crate::store::MessageStore;

/// Longest accepted author name, in characters.
pub const NAME_MAX_CHARS: u64 = 100;
/// Longest accepted message body, in characters.
pub const MESSAGE_MAX_CHARS: u64 = 500;

const REQUIRED: &str = "Name and message are required";
const TOO_LONG: &str = "Name or message too long";

/// Request body for `POST /message`.
///
/// Missing fields deserialize as empty strings so they are reported by
/// validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitMessage {
    /// Author name, 1 to 100 characters.
    #[serde(default)]
    #[validate(length(min = 1, max = NAME_MAX_CHARS))]
    pub name: String,
    /// Message body, 1 to 500 characters.
    #[serde(default)]
    #[validate(length(min = 1, max = MESSAGE_MAX_CHARS))]
    pub message: String,
}

impl SubmitMessage {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Apply the length rules, producing the caller-facing message on failure.
    pub fn check(&self) -> Result<(), BoardError> {
        self.validate().map_err(|_| {
            let reason = if self.name.is_empty() || self.message.is_empty() {
                REQUIRED
            } else {
                TOO_LONG
            };
            BoardError::Validation(reason.to_owned())
        })
    }
}

/// Store plus renderer: the two operations the HTTP layer needs.
#[derive(Debug)]
pub struct MessageBoard<S> {
    store: Arc<S>,
    renderer: Arc<BoardRenderer>,
}

impl<S> Clone for MessageBoard<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            renderer: Arc::clone(&self.renderer),
        }
    }
}

impl<S: MessageStore> MessageBoard<S> {
    pub fn new(store: Arc<S>, renderer: Arc<BoardRenderer>) -> Self {
        Self { store, renderer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist a message, returning its new id.
    ///
    /// Nothing is written when validation fails.
    pub async fn submit(&self, req: SubmitMessage) -> Result<i64, BoardError> {
        req.check()?;
        let id = self.store.insert_message(&req.name, &req.message).await?;
        info!(
            id,
            name_chars = req.name.chars().count(),
            message_chars = req.message.chars().count(),
            "message stored"
        );
        Ok(id)
    }

    /// Every stored record, newest first.
    pub async fn records(&self) -> Result<Vec<MessageRecord>, BoardError> {
        Ok(self.store.list_messages().await?)
    }

    /// One store read plus one drawing pass; the drawing runs on the
    /// blocking pool.
    pub async fn render_board(&self) -> Result<Vec<u8>, BoardError> {
        let records = self.records().await?;
        let count = records.len();
        let renderer = Arc::clone(&self.renderer);

        let png = tokio::task::spawn_blocking(move || renderer.render(&records))
            .await
            .map_err(|e| BoardError::Internal(format!("render task failed: {e}")))??;

        debug!(records = count, bytes = png.len(), "board rendered");
        Ok(png)
    }
}
