use utoipa::OpenApi;

use crate::routes::board::BoardApi;
use crate::routes::health::HealthApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "nastenka-server",
    description = "Message board that renders posts to a PNG",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(BoardApi::openapi());
    root.merge(HealthApi::openapi());
    root
}
