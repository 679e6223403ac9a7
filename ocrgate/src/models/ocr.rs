use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-request options for `POST /ocr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OcrOptions {
    pub language: String,
    pub enhance: bool,
    pub post_process: bool,
    pub method: String,
    pub chunk_text: bool,
    pub chunk_size: usize,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            enhance: true,
            post_process: true,
            method: "auto".to_string(),
            chunk_text: true,
            chunk_size: crate::config::DEFAULT_CHUNK_SIZE,
        }
    }
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Result of `POST /ocr`. Both variants are returned with HTTP 200.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OcrResponse {
    Success(OcrSuccess),
    Failure(OcrFailure),
}

impl OcrResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, OcrResponse::Success(_))
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OcrSuccess {
    /// Always `true`.
    pub success: bool,
    pub text: String,
    /// Percentage, two decimals.
    pub confidence: f64,
    pub word_count: usize,
    /// Language code as passed to the engine that produced the text.
    pub language: String,
    /// `paddle`, `tesseract` or `tesseract_fallback`.
    pub method_used: String,
    pub enhanced: bool,
    pub post_processed: bool,
    pub chunks: Vec<String>,
    pub chunk_count: usize,
    /// Seconds, three decimals.
    pub processing_time: f64,
    pub metadata: OcrMetadata,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OcrMetadata {
    pub original_filename: Option<String>,
    pub file_size: usize,
    /// `[width, height]` of the upload before resizing.
    pub image_dimensions: [u32; 2],
    pub raw_text_length: usize,
    pub processed_text_length: usize,
    pub regions_found: usize,
    pub regions_used: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OcrFailure {
    /// Always `false`.
    pub success: bool,
    pub error: String,
    pub text: String,
    pub confidence: f64,
    pub processing_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<OcrDebugInfo>,
}

impl OcrFailure {
    pub fn new(error: impl Into<String>, processing_time: f64) -> Self {
        Self {
            success: false,
            error: error.into(),
            text: String::new(),
            confidence: 0.0,
            processing_time,
            debug_info: None,
        }
    }

    pub fn with_debug_info(mut self, debug_info: OcrDebugInfo) -> Self {
        self.debug_info = Some(debug_info);
        self
    }
}

/// Engine state attached to a failure where no engine produced text.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OcrDebugInfo {
    pub paddle_available: bool,
    pub paddle_initialized: bool,
    pub tesseract_available: bool,
    pub image_size: [u32; 2],
    pub method_attempted: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_without_empty_debug_info() {
        let response = OcrResponse::Failure(OcrFailure::new("Invalid file type: text/plain", 0.001));
        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(json["success"], false);
        assert_eq!(json["text"], "");
        assert_eq!(json["confidence"], 0.0);
        assert!(json.get("debug_info").is_none());
    }

    #[test]
    fn success_serializes_flat() {
        let response = OcrResponse::Success(OcrSuccess {
            success: true,
            text: "HELLO WORLD".to_string(),
            confidence: 93.5,
            word_count: 2,
            language: "eng".to_string(),
            method_used: "tesseract".to_string(),
            enhanced: true,
            post_processed: true,
            chunks: vec!["HELLO WORLD".to_string()],
            chunk_count: 1,
            processing_time: 0.123,
            metadata: OcrMetadata {
                original_filename: Some("scan.png".to_string()),
                file_size: 1024,
                image_dimensions: [300, 100],
                raw_text_length: 11,
                processed_text_length: 11,
                regions_found: 0,
                regions_used: 0,
            },
        });
        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(json["success"], true);
        assert_eq!(json["method_used"], "tesseract");
        assert_eq!(json["metadata"]["image_dimensions"], serde_json::json!([300, 100]));
        assert_eq!(json["metadata"]["original_filename"], "scan.png");
    }

    #[test]
    fn default_options() {
        let options = OcrOptions::default();
        assert_eq!(options.language, "en");
        assert_eq!(options.method, "auto");
        assert!(options.enhance && options.post_process && options.chunk_text);
        assert_eq!(options.chunk_size, 800);
    }
}
