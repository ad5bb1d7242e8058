//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become the board's JSON
//! envelope: `{"success": false, "error": "..."}`.
//!
//! Internal errors (database, rendering) are logged with full detail but only
//! a generic message is returned to the caller, so SQL and file paths never
//! leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nastenka_core::BoardError;
use thiserror::Error;
use tracing::error;

use crate::schemas::SubmitResponse;

/// All errors that can occur in the nastenka-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the board service.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The caller sent a malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::Board(BoardError::Validation(m)) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),

            // Internal errors: log the full detail, keep it private.
            ServerError::Board(e) => {
                error!(error = %e, "board operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(SubmitResponse::failure(client_message))).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_bad_request_with_message() {
        let resp = ServerError::from(BoardError::Validation("Name or message too long".into()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Name or message too long");
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let resp = ServerError::from(BoardError::Internal("/secret/path exploded".into()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "internal server error");
    }
}
