use std::sync::Arc;
use std::time::Instant;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::OcrConfig;
use crate::error::{OcrGateError, Result};
use crate::models::{
    ImageUpload, OcrDebugInfo, OcrFailure, OcrMetadata, OcrOptions, OcrResponse, OcrSuccess,
};
use crate::ocr::{normalize, FallbackOrchestrator, NormalizedImage, Recognized};
use crate::processing::{chunk, post_process};

/// Request-level OCR pipeline: validate, normalize, recognize with
/// fallback, clean up and chunk. Never fails; every problem becomes an
/// [`OcrFailure`].
#[derive(Clone)]
pub struct OcrService {
    orchestrator: FallbackOrchestrator,
    max_image_dimension: u32,
}

impl OcrService {
    pub fn new(orchestrator: FallbackOrchestrator, config: &OcrConfig) -> Self {
        Self {
            orchestrator,
            max_image_dimension: config.max_image_dimension,
        }
    }

    pub fn orchestrator(&self) -> &FallbackOrchestrator {
        &self.orchestrator
    }

    pub async fn process(&self, upload: ImageUpload, options: OcrOptions) -> OcrResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!("ocr_request", %request_id);
        self.process_inner(upload, options).instrument(span).await
    }

    async fn process_inner(&self, upload: ImageUpload, options: OcrOptions) -> OcrResponse {
        let started = Instant::now();
        info!(
            filename = upload.filename.as_deref().unwrap_or("<none>"),
            content_type = upload.content_type.as_deref().unwrap_or("<none>"),
            bytes = upload.bytes.len(),
            method = %options.method,
            language = %options.language,
            enhance = options.enhance,
            "OCR request"
        );

        if !is_image_content_type(upload.content_type.as_deref()) {
            let err = OcrGateError::InvalidContentType(
                upload.content_type.clone().unwrap_or_else(|| "none".to_string()),
            );
            warn!("{err}");
            return OcrResponse::Failure(OcrFailure::new(err.to_string(), elapsed(started)));
        }

        let file_size = upload.bytes.len();
        let image = match self.decode(upload.bytes, options.enhance).await {
            Ok(image) => Arc::new(image),
            Err(e) => {
                warn!("Image normalization failed: {e}");
                return OcrResponse::Failure(OcrFailure::new(
                    format!("OCR processing failed: {e}"),
                    elapsed(started),
                ));
            }
        };
        let (width, height) = image.original_dimensions;

        let outcome = self
            .orchestrator
            .run(&options.method, &options.language, Arc::clone(&image))
            .await;

        let recognized = match outcome.result {
            Ok(recognized) => recognized,
            Err(error) => {
                let region = self.orchestrator.region().status();
                let debug_info = OcrDebugInfo {
                    paddle_available: region.available,
                    paddle_initialized: region.initialized,
                    tesseract_available: self.orchestrator.tesseract().status().available,
                    image_size: [width, height],
                    method_attempted: outcome.method_selected,
                };
                let failure = OcrFailure::new(
                    OcrGateError::NoEngineSucceeded(error).to_string(),
                    elapsed(started),
                );
                return OcrResponse::Failure(failure.with_debug_info(debug_info));
            }
        };

        let response = build_success(
            recognized,
            &options,
            OcrMetadata {
                original_filename: upload.filename,
                file_size,
                image_dimensions: [width, height],
                raw_text_length: 0,
                processed_text_length: 0,
                regions_found: 0,
                regions_used: 0,
            },
            image.is_enhanced(),
            elapsed(started),
        );

        info!(
            method = %response.method_used,
            confidence = response.confidence,
            words = response.word_count,
            chunks = response.chunk_count,
            seconds = response.processing_time,
            "OCR complete"
        );
        OcrResponse::Success(response)
    }

    async fn decode(&self, bytes: Vec<u8>, enhance: bool) -> Result<NormalizedImage> {
        let max_dimension = self.max_image_dimension;
        tokio::task::spawn_blocking(move || normalize(&bytes, enhance, max_dimension))
            .await
            .map_err(|e| OcrGateError::Internal(format!("image task panicked: {e}")))?
    }
}

fn build_success(
    recognized: Recognized,
    options: &OcrOptions,
    mut metadata: OcrMetadata,
    enhanced: bool,
    processing_time: f64,
) -> OcrSuccess {
    let attempt = recognized.attempt;
    let raw_text = attempt.text();
    let confidence = attempt.confidence();

    let text = if options.post_process && !raw_text.is_empty() {
        post_process(raw_text, confidence)
    } else {
        raw_text.trim().to_string()
    };

    let chunks = if options.chunk_text && !text.is_empty() {
        chunk(&text, options.chunk_size)
    } else {
        Vec::new()
    };

    let regions = attempt.regions().unwrap_or_default();
    metadata.raw_text_length = raw_text.chars().count();
    metadata.processed_text_length = text.chars().count();
    metadata.regions_found = regions.found;
    metadata.regions_used = regions.used;

    OcrSuccess {
        success: true,
        word_count: text.split_whitespace().count(),
        confidence: round_to(confidence as f64, 2),
        language: attempt.language.clone(),
        method_used: recognized.method_used,
        enhanced,
        post_processed: options.post_process,
        chunk_count: chunks.len(),
        chunks,
        processing_time,
        metadata,
        text,
    }
}

fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
}

fn elapsed(started: Instant) -> f64 {
    round_to(started.elapsed().as_secs_f64(), 3)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
