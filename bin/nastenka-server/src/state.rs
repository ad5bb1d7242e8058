//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use nastenka_core::{MessageBoard, SqliteStore};

use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Message store plus renderer.
    pub board: MessageBoard<SqliteStore>,
}
