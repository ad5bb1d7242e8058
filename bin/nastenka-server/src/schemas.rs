use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `POST /message`, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    pub success: bool,
    /// Id of the stored message; present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Human-readable reason; present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn stored(id: i64) -> Self {
        Self {
            success: true,
            id: Some(id),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}
