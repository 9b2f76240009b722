use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flowsmith_types::ExecutionError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(ExecutionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidPipeline(ref e) => {
                tracing::debug!("Rejected pipeline: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": e.message,
                        "kind": e.kind,
                        "node_id": e.node_id,
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
