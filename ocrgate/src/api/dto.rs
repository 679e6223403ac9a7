//! Wire types for the non-OCR endpoints. The `POST /ocr` bodies live in
//! [`crate::models`] because the service builds them directly.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub paddle_available: bool,
    pub paddle_initialized: bool,
    pub tesseract_available: bool,
    pub enhancement_available: bool,
    pub version: String,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    /// `not_available`, `available but initialization failed`,
    /// `working (N regions detected)` or `error: ...`
    pub paddle_status: String,
    /// `not_available`, `working` or `error: ...`
    pub tesseract_status: String,
    pub enhancement_status: String,
    pub version: String,
    pub port: u16,
    /// Seconds since the server started.
    pub uptime: u64,
    pub recommendations: Vec<String>,
}

/// `GET /languages`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LanguagesResponse {
    pub paddle: Vec<String>,
    pub tesseract: Vec<String>,
    pub default: String,
    /// Languages bundled by the `multi` key.
    pub multi: Vec<String>,
}

/// Transport-level error body (malformed request).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Multipart form accepted by `POST /ocr`, for documentation.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct OcrForm {
    /// Image file; must declare an `image/*` content type.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Default `en`. Use `multi` for mixed English/Spanish/French.
    pub language: Option<String>,
    /// Default `true`.
    pub enhance: Option<bool>,
    /// Default `true`.
    pub post_process: Option<bool>,
    /// `auto` (default), `paddle`, `easyocr` or `tesseract`.
    pub method: Option<String>,
    /// Default `true`.
    pub chunk_text: Option<bool>,
    /// 100 to 2000, default 800.
    pub chunk_size: Option<usize>,
}
