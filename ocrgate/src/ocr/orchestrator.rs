use std::sync::Arc;

use tracing::{info, warn};

use super::attempt::{EngineKind, RecognitionAttempt};
use super::engine::RecognitionEngine;
use super::image::NormalizedImage;

/// Method name reported when no engine could be selected for `"auto"`.
pub const METHOD_NONE: &str = "none";

/// Terminal state of one orchestration run.
#[derive(Debug, Clone)]
pub struct OrchestrationOutcome {
    /// Method chosen in the selection step (`"paddle"`, `"tesseract"`,
    /// `"none"` or the unrecognized name the caller gave).
    pub method_selected: String,
    /// Every engine invocation in the order it happened.
    pub attempts: Vec<RecognitionAttempt>,
    pub result: Result<Recognized, String>,
}

/// The winning attempt and how it should be reported.
#[derive(Debug, Clone)]
pub struct Recognized {
    pub attempt: RecognitionAttempt,
    pub method_used: String,
}

impl OrchestrationOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the primary engine when it was selected and ready, then falls back
/// to Tesseract whenever no attempt has succeeded yet.
#[derive(Clone)]
pub struct FallbackOrchestrator {
    region: Arc<dyn RecognitionEngine>,
    tesseract: Arc<dyn RecognitionEngine>,
}

impl FallbackOrchestrator {
    pub fn new(region: Arc<dyn RecognitionEngine>, tesseract: Arc<dyn RecognitionEngine>) -> Self {
        Self { region, tesseract }
    }

    pub fn region(&self) -> &Arc<dyn RecognitionEngine> {
        &self.region
    }

    pub fn tesseract(&self) -> &Arc<dyn RecognitionEngine> {
        &self.tesseract
    }

    /// Resolve the requested method. `"auto"` picks the first ready engine;
    /// anything else is passed through.
    pub fn select_method(&self, requested: &str) -> String {
        let requested = requested.trim();
        if !requested.eq_ignore_ascii_case("auto") {
            return requested.to_lowercase();
        }

        if self.region.status().is_ready() {
            EngineKind::Paddle.as_str().to_string()
        } else if self.tesseract.status().available {
            EngineKind::Tesseract.as_str().to_string()
        } else {
            METHOD_NONE.to_string()
        }
    }

    pub async fn run(&self, method: &str, language: &str, image: Arc<NormalizedImage>) -> OrchestrationOutcome {
        let method_selected = self.select_method(method);
        let selected_engine = EngineKind::from_method(&method_selected);
        info!(method = %method_selected, language, "Selected OCR method");

        let mut attempts = Vec::new();

        if selected_engine == Some(EngineKind::Paddle) && self.region.status().is_ready() {
            let lang = EngineKind::Paddle.normalize_language(language);
            let attempt = self.region.recognize(Arc::clone(&image), &lang).await;
            if attempt.is_success() {
                return OrchestrationOutcome {
                    method_selected,
                    attempts: vec![attempt.clone()],
                    result: Ok(Recognized {
                        attempt,
                        method_used: EngineKind::Paddle.as_str().to_string(),
                    }),
                };
            }
            warn!(error = attempt.error().unwrap_or_default(), "PaddleOCR attempt failed, falling back");
            attempts.push(attempt);
        }

        if self.tesseract.status().available {
            let lang = EngineKind::Tesseract.normalize_language(language);
            let attempt = self.tesseract.recognize(image, &lang).await;
            let method_used = if selected_engine == Some(EngineKind::Tesseract) {
                "tesseract"
            } else {
                "tesseract_fallback"
            };
            attempts.push(attempt.clone());
            if attempt.is_success() {
                return OrchestrationOutcome {
                    method_selected,
                    attempts,
                    result: Ok(Recognized {
                        attempt,
                        method_used: method_used.to_string(),
                    }),
                };
            }
        }

        let error = self.composite_error(&attempts);
        warn!(error = %error, "No OCR engine succeeded");
        OrchestrationOutcome {
            method_selected,
            attempts,
            result: Err(error),
        }
    }

    /// `"All OCR methods failed"` plus a note for every engine that is
    /// missing or failed to start, and every failed attempt's reason.
    fn composite_error(&self, attempts: &[RecognitionAttempt]) -> String {
        let mut message = String::from("All OCR methods failed");

        let region = self.region.status();
        if !region.available {
            message.push_str(" (PaddleOCR not installed)");
        } else if !region.initialized {
            message.push_str(" (PaddleOCR initialization failed)");
        }
        if !self.tesseract.status().available {
            message.push_str(" (Tesseract not installed)");
        }

        for attempt in attempts {
            if let Some(reason) = attempt.error() {
                message.push_str(&format!(" ({}: {})", attempt.engine.display_name(), reason));
            }
        }
        message
    }
}
