use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mars_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            Self::BadRequest(e) => (StatusCode::BAD_REQUEST, e.as_str()),
            Self::NotFound(e) => (StatusCode::NOT_FOUND, e.as_str()),
            Self::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.as_str()),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnknownRover(_) => Self::NotFound(e.to_string()),
            CoreError::UnknownAction(_) | CoreError::BadPayload(_) => Self::BadRequest(e.to_string()),
            CoreError::Render(_) | CoreError::Fetch(_) => Self::Internal(e.to_string()),
        }
    }
}
