use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrGateError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Invalid file type: {0}")]
    InvalidContentType(String),

    #[error("{0}")]
    NoEngineSucceeded(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for OcrGateError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            OcrGateError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            OcrGateError::InvalidContentType(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            OcrGateError::Decode(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            OcrGateError::NoEngineSucceeded(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            OcrGateError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, OcrGateError>;
