//! Board routes: the rendered image and message submission.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use nastenka_core::SubmitMessage;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::SubmitResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(board_image, submit_message),
    components(schemas(SubmitMessage, SubmitResponse))
)]
pub struct BoardApi;

/// Register board routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/board.png", get(board_image))
        .route("/message", post(submit_message))
}

/// Current board as a PNG (`GET /board.png`).
///
/// Served with `Cache-Control: no-cache` so every fetch reflects the store.
#[utoipa::path(
    get,
    path = "/board.png",
    tag = "board",
    responses(
        (status = 200, description = "Rendered board", content_type = "image/png", body = Vec<u8>),
        (status = 500, description = "Store or render failure", body = SubmitResponse),
    )
)]
pub async fn board_image(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let png = state.board.render_board().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        png,
    ))
}

/// Post a message (`POST /message`).
#[utoipa::path(
    post,
    path = "/message",
    tag = "board",
    request_body = SubmitMessage,
    responses(
        (status = 200, description = "Message stored", body = SubmitResponse),
        (status = 400, description = "Empty, oversized or malformed input", body = SubmitResponse),
        (status = 500, description = "Store failure", body = SubmitResponse),
    )
)]
pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitMessage>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ServerError> {
    let Json(req) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let id = state.board.submit(req).await?;
    Ok(Json(SubmitResponse::stored(id)))
}
