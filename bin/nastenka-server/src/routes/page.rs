//! The single HTML page: submission form plus the board image.

use std::sync::Arc;

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
