use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;
use tracing::{debug, info, warn};

use super::attempt::{EngineKind, EngineStatus, RecognitionAttempt, TextRegion};
use super::engine::RecognitionEngine;
use super::image::NormalizedImage;
use super::registry::ReaderRegistry;
use crate::config::OcrConfig;

/// Languages bundled into the `"multi"` reader.
pub const MULTI_LANGUAGES: [&str; 3] = ["en", "es", "fr"];

pub const SUPPORTED_LANGUAGES: [&str; 8] = ["en", "es", "fr", "de", "it", "pt", "nl", "multi"];

/// Line-grouping thresholds, relative to the mean height of two regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    pub width_ths: f32,
    pub height_ths: f32,
    pub paragraph: bool,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            width_ths: 0.7,
            height_ths: 0.7,
            paragraph: false,
        }
    }
}

/// A loaded detector/recognizer pair for one language set.
pub trait RegionDetector: Send {
    fn detect(&mut self, image: &RgbImage) -> Result<Vec<TextRegion>, String>;
}

/// Builds a detector for the given language list.
pub type DetectorFactory =
    Arc<dyn Fn(&[&str]) -> Result<Box<dyn RegionDetector>, String> + Send + Sync>;

/// Language list a registry key stands for.
pub fn reader_languages(key: &str) -> Vec<&str> {
    if key == "multi" {
        MULTI_LANGUAGES.to_vec()
    } else {
        vec![key]
    }
}

/// Merge neighbouring regions that sit on the same text line.
///
/// Two consecutive regions are merged when their heights differ by at most
/// `height_ths` times their mean height, their vertical centers are within
/// the same bound, and the horizontal gap between them is at most
/// `width_ths` times the mean height. Merged text is space-joined and keeps
/// the lower confidence. Detection order is preserved.
pub fn merge_line_regions(regions: Vec<TextRegion>, params: &DetectionParams) -> Vec<TextRegion> {
    if params.paragraph {
        return regions;
    }

    let mut merged: Vec<TextRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        match merged.last_mut() {
            Some(current) if same_line(current, &region, params) => {
                let left = current.bbox.x.min(region.bbox.x);
                let top = current.bbox.y.min(region.bbox.y);
                let right = current.bbox.right().max(region.bbox.right());
                let bottom = (current.bbox.y + current.bbox.height)
                    .max(region.bbox.y + region.bbox.height);

                current.bbox.x = left;
                current.bbox.y = top;
                current.bbox.width = right - left;
                current.bbox.height = bottom - top;
                current.text = format!("{} {}", current.text, region.text);
                current.confidence = current.confidence.min(region.confidence);
            }
            _ => merged.push(region),
        }
    }
    merged
}

fn same_line(a: &TextRegion, b: &TextRegion, params: &DetectionParams) -> bool {
    let mean_height = (a.bbox.height as f32 + b.bbox.height as f32) / 2.0;
    if mean_height <= 0.0 || b.bbox.x < a.bbox.x {
        return false;
    }

    let height_bound = params.height_ths * mean_height;
    let height_diff = (a.bbox.height as f32 - b.bbox.height as f32).abs();
    let center_diff = (a.bbox.center_y() - b.bbox.center_y()).abs();
    let gap = b.bbox.x as f32 - a.bbox.right() as f32;

    height_diff <= height_bound && center_diff <= height_bound && gap <= params.width_ths * mean_height
}

/// Region-based engine: detects text boxes, recognizes each one and
/// aggregates the confident ones.
pub struct RegionEngine {
    factory: Option<DetectorFactory>,
    registry: Arc<ReaderRegistry<Box<dyn RegionDetector>>>,
    params: DetectionParams,
    initialized: bool,
}

impl RegionEngine {
    /// Build the engine and eagerly create the `"en"` reader plus any
    /// `preload` languages. `None` means the backend is not installed.
    pub fn new(factory: Option<DetectorFactory>, preload: &[String]) -> Self {
        let registry = Arc::new(ReaderRegistry::new("paddle"));

        let initialized = match &factory {
            Some(factory) => match Self::load(&registry, factory, "en") {
                Ok(()) => {
                    info!("PaddleOCR initialized successfully");
                    true
                }
                Err(e) => {
                    warn!("PaddleOCR initialization failed: {e}");
                    false
                }
            },
            None => false,
        };

        if let (true, Some(factory)) = (initialized, &factory) {
            for language in preload.iter().filter(|l| l.as_str() != "en") {
                if let Err(e) = Self::load(&registry, factory, language) {
                    warn!(language = %language, "Failed to preload PaddleOCR reader: {e}");
                }
            }
        }

        Self {
            factory,
            registry,
            params: DetectionParams::default(),
            initialized,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(backend_factory(config), &config.preload_languages)
    }

    pub fn unavailable() -> Self {
        Self::new(None, &[])
    }

    fn load(
        registry: &ReaderRegistry<Box<dyn RegionDetector>>,
        factory: &DetectorFactory,
        key: &str,
    ) -> Result<(), String> {
        registry
            .get_or_create(key, || factory(&reader_languages(key)))
            .map(|_| ())
    }
}

#[async_trait]
impl RecognitionEngine for RegionEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Paddle
    }

    fn status(&self) -> EngineStatus {
        EngineStatus {
            available: self.factory.is_some(),
            initialized: self.initialized,
        }
    }

    fn languages(&self) -> Vec<String> {
        SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect()
    }

    async fn recognize(&self, image: Arc<NormalizedImage>, language: &str) -> RecognitionAttempt {
        let factory = match (&self.factory, self.initialized) {
            (Some(factory), true) => Arc::clone(factory),
            (Some(_), false) => {
                return RecognitionAttempt::failure(
                    self.kind(),
                    language,
                    "PaddleOCR initialization failed",
                )
            }
            (None, _) => {
                return RecognitionAttempt::failure(self.kind(), language, "PaddleOCR not installed")
            }
        };

        let registry = Arc::clone(&self.registry);
        let params = self.params;
        let key = language.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let reader = registry.get_or_create(&key, || factory(&reader_languages(&key)))?;
            let mut detector = reader.blocking_lock();
            let regions = detector.detect(&image.color)?;
            Ok::<_, String>(merge_line_regions(regions, &params))
        })
        .await;

        match result {
            Ok(Ok(regions)) => {
                let attempt = RecognitionAttempt::from_regions(self.kind(), language, &regions);
                debug!(
                    language,
                    regions = regions.len(),
                    confidence = attempt.confidence(),
                    "PaddleOCR recognition finished"
                );
                attempt
            }
            Ok(Err(e)) => {
                warn!(language, "PaddleOCR failed: {e}");
                RecognitionAttempt::failure(self.kind(), language, format!("PaddleOCR failed: {e}"))
            }
            Err(e) => RecognitionAttempt::failure(
                self.kind(),
                language,
                format!("PaddleOCR task panicked: {e}"),
            ),
        }
    }
}

#[cfg(feature = "paddle")]
fn backend_factory(config: &OcrConfig) -> Option<DetectorFactory> {
    match paddle::ModelDir::resolve(config.region_model_dir.as_deref()) {
        Ok(models) => {
            let threads = config.region_threads.max(1);
            Some(Arc::new(move |languages: &[&str]| {
                paddle::PaddleDetector::load(&models, languages, threads)
                    .map(|d| Box::new(d) as Box<dyn RegionDetector>)
            }))
        }
        Err(e) => {
            warn!("PaddleOCR not available: {e}");
            None
        }
    }
}

#[cfg(not(feature = "paddle"))]
fn backend_factory(_config: &OcrConfig) -> Option<DetectorFactory> {
    info!("PaddleOCR support not compiled in (enable the `paddle` feature)");
    None
}

#[cfg(feature = "paddle")]
mod paddle {
    use std::path::{Path, PathBuf};

    use image::RgbImage;
    use paddle_ocr_rs::ocr_lite::OcrLite;

    use super::RegionDetector;
    use crate::ocr::attempt::{BoundingBox, TextRegion};

    const PADDING: u32 = 50;
    const BOX_SCORE_THRESH: f32 = 0.5;
    const BOX_THRESH: f32 = 0.3;
    const UNCLIP_RATIO: f32 = 1.6;

    const LATIN_LANGUAGES: [&str; 7] = ["en", "es", "fr", "de", "it", "pt", "nl"];

    #[derive(Debug, Clone)]
    pub struct ModelDir {
        root: PathBuf,
    }

    impl ModelDir {
        pub fn resolve(dir: Option<&str>) -> Result<Self, String> {
            let root = PathBuf::from(dir.unwrap_or("models/paddle"));
            for required in ["det.onnx", "cls.onnx"] {
                if !root.join(required).is_file() {
                    return Err(format!("missing {} in {}", required, root.display()));
                }
            }
            Ok(Self { root })
        }

        fn path(&self, name: &str) -> PathBuf {
            self.root.join(name)
        }

        /// Recognition model and optional dictionary for a language set.
        /// Latin-script languages share `rec_latin` when no dedicated
        /// model exists.
        fn recognizer(&self, languages: &[&str]) -> Result<(PathBuf, Option<PathBuf>), String> {
            let mut candidates = Vec::new();
            if let [single] = languages {
                candidates.push(single.to_string());
            }
            if languages.iter().all(|l| LATIN_LANGUAGES.contains(l)) {
                candidates.push("latin".to_string());
            }

            for key in &candidates {
                let rec = self.path(&format!("rec_{key}.onnx"));
                if rec.is_file() {
                    let dict = self.path(&format!("dict_{key}.txt"));
                    return Ok((rec, dict.is_file().then_some(dict)));
                }
            }

            Err(format!(
                "no recognition model for [{}] in {}",
                languages.join(", "),
                self.root.display()
            ))
        }
    }

    pub struct PaddleDetector {
        ocr: OcrLite,
    }

    impl PaddleDetector {
        pub fn load(models: &ModelDir, languages: &[&str], threads: usize) -> Result<Self, String> {
            let (rec, dict) = models.recognizer(languages)?;
            let det = lossy(&models.path("det.onnx"));
            let cls = lossy(&models.path("cls.onnx"));
            let rec = lossy(&rec);

            let mut ocr = OcrLite::new();
            match dict {
                Some(dict) => ocr
                    .init_models_with_dict(&det, &cls, &rec, &lossy(&dict), threads)
                    .map_err(|e| format!("model init failed: {e}"))?,
                None => ocr
                    .init_models(&det, &cls, &rec, threads)
                    .map_err(|e| format!("model init failed: {e}"))?,
            }
            Ok(Self { ocr })
        }
    }

    fn lossy(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    impl RegionDetector for PaddleDetector {
        fn detect(&mut self, image: &RgbImage) -> Result<Vec<TextRegion>, String> {
            let max_side_len = image.width().max(image.height());
            let result = self
                .ocr
                .detect(
                    image,
                    PADDING,
                    max_side_len,
                    BOX_SCORE_THRESH,
                    BOX_THRESH,
                    UNCLIP_RATIO,
                    true,
                    false,
                )
                .map_err(|e| format!("detection failed: {e}"))?;

            Ok(result
                .text_blocks
                .into_iter()
                .map(|block| {
                    let xs = block.box_points.iter().map(|p| p.x);
                    let ys = block.box_points.iter().map(|p| p.y);
                    let (left, right) = (xs.clone().min().unwrap_or(0), xs.max().unwrap_or(0));
                    let (top, bottom) = (ys.clone().min().unwrap_or(0), ys.max().unwrap_or(0));
                    TextRegion {
                        bbox: BoundingBox {
                            x: left,
                            y: top,
                            width: right - left,
                            height: bottom - top,
                        },
                        text: block.text.trim().to_string(),
                        confidence: block.text_score,
                    }
                })
                .collect())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn model_dir(files: &[&str]) -> tempfile::TempDir {
            let dir = tempfile::tempdir().unwrap();
            for file in files {
                std::fs::write(dir.path().join(file), b"").unwrap();
            }
            dir
        }

        #[test]
        fn test_detection_models_are_required() {
            let dir = model_dir(&["det.onnx"]);
            let err = ModelDir::resolve(dir.path().to_str()).unwrap_err();
            assert!(err.contains("cls.onnx"));
        }

        #[test]
        fn test_dedicated_model_wins() {
            let dir = model_dir(&["det.onnx", "cls.onnx", "rec_en.onnx", "dict_en.txt", "rec_latin.onnx"]);
            let models = ModelDir::resolve(dir.path().to_str()).unwrap();

            let (rec, dict) = models.recognizer(&["en"]).unwrap();
            assert!(rec.ends_with("rec_en.onnx"));
            assert!(dict.unwrap().ends_with("dict_en.txt"));
        }

        #[test]
        fn test_latin_fallback_and_multi() {
            let dir = model_dir(&["det.onnx", "cls.onnx", "rec_latin.onnx"]);
            let models = ModelDir::resolve(dir.path().to_str()).unwrap();

            let (rec, dict) = models.recognizer(&["fr"]).unwrap();
            assert!(rec.ends_with("rec_latin.onnx"));
            assert!(dict.is_none());

            let (rec, _) = models.recognizer(&["en", "es", "fr"]).unwrap();
            assert!(rec.ends_with("rec_latin.onnx"));

            assert!(models.recognizer(&["ja"]).is_err());
        }
    }
}
