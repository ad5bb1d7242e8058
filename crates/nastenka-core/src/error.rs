//! Error types shared by the store, the renderer and the board service.

use thiserror::Error;

/// Failures raised while preparing or encoding the board image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A font file could not be read or is not a usable TrueType/OpenType face.
    #[error("font error: {0}")]
    Font(String),

    /// The configured timestamp pattern is not valid strftime syntax.
    #[error("invalid timestamp format: {0:?}")]
    InvalidTimestampFormat(String),

    /// PNG encoding failed.
    #[error("image encode error: {0}")]
    Encode(#[from] image::ImageError),
}

/// All errors that can occur while submitting or rendering messages.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The submitted name or message violates the length rules.
    #[error("{0}")]
    Validation(String),

    /// Propagated from the SQLite (or other) store.
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),

    /// Propagated from the renderer.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An unclassified internal failure, e.g. a panicked blocking task.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BoardError {
    /// `true` when the error was caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, BoardError::Validation(_))
    }
}
