//! OCR (Optical Character Recognition) Module
//!
//! Image normalization, the two recognition engines and the fallback
//! orchestrator that sequences them.
//!
//! # Architecture
//!
//! - [`normalize`] decodes uploads into a bounded RGB image with an optional
//!   grayscale derivative
//! - [`RecognitionEngine`] is the one capability both engines implement
//!   - [`RegionEngine`] detects text regions with PaddleOCR models
//!     (`paddle` feature) and caches one reader per language
//!   - [`TesseractEngine`] runs full-page recognition through leptess
//!     (`tesseract` feature, on by default)
//! - [`FallbackOrchestrator`] picks an engine and falls back to Tesseract
//!
//! Engines never return errors. Every failure is a failed
//! [`RecognitionAttempt`] so the orchestrator can keep going.
//!
//! # Usage
//!
//! ```rust,ignore
//! let orchestrator = FallbackOrchestrator::new(
//!     Arc::new(RegionEngine::from_config(&config.ocr)),
//!     Arc::new(TesseractEngine::new(&config.ocr)),
//! );
//! let image = Arc::new(normalize(&bytes, true, 1500)?);
//! let outcome = orchestrator.run("auto", "en", image).await;
//! ```

mod attempt;
mod engine;
mod image;
mod orchestrator;
mod region;
mod registry;
mod tesseract;

pub use attempt::{
    AttemptOutcome, BoundingBox, EngineKind, EngineStatus, RecognitionAttempt, RegionCounts,
    TextRegion, REGION_CONFIDENCE_THRESHOLD,
};
pub use engine::{health_probe_image, probe_engine, RecognitionEngine};
#[cfg(test)]
pub(crate) use engine::fake;
pub use image::{normalize, scaled_dimensions, to_luminance, NormalizedImage, PixelArray};
pub use orchestrator::{FallbackOrchestrator, OrchestrationOutcome, Recognized, METHOD_NONE};
pub use region::{
    merge_line_regions, reader_languages, DetectionParams, DetectorFactory, RegionDetector,
    RegionEngine, MULTI_LANGUAGES,
};
pub use registry::ReaderRegistry;
pub use tesseract::TesseractEngine;
