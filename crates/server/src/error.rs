use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mrt_topology::TopologyError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unsupported language: {0}")]
    UnsupportedLang(String),

    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnsupportedLang(_) => StatusCode::NOT_FOUND,
            Self::InvalidMonth { .. } => StatusCode::BAD_REQUEST,
            Self::Topology(err) => {
                // A validated, non-empty store cannot fail here; this is a build defect
                tracing::error!(error = %err, "topology error while serving request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            Self::Topology(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
