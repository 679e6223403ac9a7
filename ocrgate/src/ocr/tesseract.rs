use std::sync::Arc;

use async_trait::async_trait;
#[cfg(feature = "tesseract")]
use tracing::{debug, info};
use tracing::warn;

use super::attempt::{EngineKind, EngineStatus, RecognitionAttempt};
use super::engine::RecognitionEngine;
use super::image::{NormalizedImage, PixelArray};
#[cfg(feature = "tesseract")]
use super::registry::ReaderRegistry;
use crate::config::OcrConfig;

#[cfg(feature = "tesseract")]
use leptess::LepTess;

/// Confidence reported when Tesseract gives no usable word scores.
pub const DEFAULT_CONFIDENCE: f32 = 50.0;

/// Single uniform block of text.
const PAGE_SEG_MODE: &str = "6";

const SUPPORTED_LANGUAGES: [&str; 7] = ["eng", "spa", "fra", "deu", "ita", "por", "nld"];

enum TesseractBackend {
    #[cfg(feature = "tesseract")]
    Local {
        handles: Arc<ReaderRegistry<LepTess>>,
        tessdata: Option<String>,
    },
    Unavailable {
        reason: String,
    },
}

/// Full-page recognition through libtesseract. Handles are bound to one
/// language at creation and cached per language.
pub struct TesseractEngine {
    backend: TesseractBackend,
}

#[cfg(feature = "tesseract")]
fn create_tesseract(tessdata: Option<&str>, language: &str) -> Result<LepTess, String> {
    let mut lt = LepTess::new(tessdata, language).map_err(|e| e.to_string())?;
    lt.set_variable(leptess::Variable::TesseditPagesegMode, PAGE_SEG_MODE)
        .map_err(|e| format!("failed to set page segmentation mode: {e}"))?;
    Ok(lt)
}

impl TesseractEngine {
    #[cfg(feature = "tesseract")]
    pub fn new(config: &OcrConfig) -> Self {
        let handles = Arc::new(ReaderRegistry::new("tesseract"));
        let tessdata = config.tessdata_path.clone();

        let backend = match handles.get_or_create("eng", || create_tesseract(tessdata.as_deref(), "eng")) {
            Ok(_) => {
                info!("Tesseract OCR initialized");
                TesseractBackend::Local { handles, tessdata }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                TesseractBackend::Unavailable { reason }
            }
        };

        Self { backend }
    }

    #[cfg(not(feature = "tesseract"))]
    pub fn new(_config: &OcrConfig) -> Self {
        warn!("Tesseract support not compiled in (enable the `tesseract` feature)");
        Self::unavailable("Tesseract not installed")
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: TesseractBackend::Unavailable {
                reason: reason.into(),
            },
        }
    }
}

#[async_trait]
impl RecognitionEngine for TesseractEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Tesseract
    }

    fn status(&self) -> EngineStatus {
        match self.backend {
            #[cfg(feature = "tesseract")]
            TesseractBackend::Local { .. } => EngineStatus::ready(),
            TesseractBackend::Unavailable { .. } => EngineStatus::missing(),
        }
    }

    fn languages(&self) -> Vec<String> {
        SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect()
    }

    #[cfg_attr(not(feature = "tesseract"), allow(unused_variables))]
    async fn recognize(&self, image: Arc<NormalizedImage>, language: &str) -> RecognitionAttempt {
        match &self.backend {
            #[cfg(feature = "tesseract")]
            TesseractBackend::Local { handles, tessdata } => {
                let handles = Arc::clone(handles);
                let tessdata = tessdata.clone();
                let key = language.to_string();

                let result = tokio::task::spawn_blocking(move || {
                    let png = encode_png(&image.preferred_for_full_page())?;
                    let handle =
                        handles.get_or_create(&key, || create_tesseract(tessdata.as_deref(), &key))?;
                    let mut lt = handle.blocking_lock();

                    lt.set_image_from_mem(&png)
                        .map_err(|e| format!("Failed to set image: {e}"))?;
                    let text = lt
                        .get_utf8_text()
                        .map_err(|e| format!("Failed to extract text: {e}"))?;
                    let confidence = lt
                        .get_tsv_text(0)
                        .ok()
                        .and_then(|tsv| parse_tsv_confidence(&tsv))
                        .unwrap_or(DEFAULT_CONFIDENCE);

                    Ok::<_, String>((text.trim().to_string(), confidence))
                })
                .await;

                match result {
                    Ok(Ok((text, confidence))) => {
                        debug!(language, confidence, chars = text.len(), "Tesseract recognition finished");
                        RecognitionAttempt::success(self.kind(), language, text, confidence, None)
                    }
                    Ok(Err(e)) => {
                        warn!(language, "Tesseract failed: {e}");
                        RecognitionAttempt::failure(self.kind(), language, format!("Tesseract failed: {e}"))
                    }
                    Err(e) => RecognitionAttempt::failure(
                        self.kind(),
                        language,
                        format!("Tesseract task panicked: {e}"),
                    ),
                }
            }
            TesseractBackend::Unavailable { reason } => {
                RecognitionAttempt::failure(self.kind(), language, reason.clone())
            }
        }
    }
}

/// Encode pixels as PNG for `set_image_from_mem`.
#[cfg_attr(not(feature = "tesseract"), allow(dead_code))]
fn encode_png(pixels: &PixelArray) -> Result<Vec<u8>, String> {
    let img = match pixels {
        PixelArray::Gray(gray) => image::DynamicImage::ImageLuma8(gray.clone()),
        PixelArray::Rgb(rgb) => image::DynamicImage::ImageRgb8(rgb.clone()),
    };

    let mut output = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| format!("Failed to encode image: {e}"))?;
    Ok(output)
}

/// Mean of the positive word confidences in Tesseract TSV output
/// (column 11). `None` when there are none.
#[cfg_attr(not(feature = "tesseract"), allow(dead_code))]
fn parse_tsv_confidence(tsv: &str) -> Option<f32> {
    let scores: Vec<f32> = tsv
        .lines()
        .filter_map(|line| line.split('\t').nth(10))
        .filter_map(|conf| conf.trim().parse::<f32>().ok())
        .filter(|conf| *conf > 0.0)
        .collect();

    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f32>() / scores.len() as f32)
    }
}
