use std::sync::Arc;

use async_trait::async_trait;
use image::{Rgb, RgbImage};

use super::attempt::{EngineKind, EngineStatus, RecognitionAttempt};
use super::image::NormalizedImage;

/// A recognition back-end. Implementations never return errors: every
/// failure is reported as a failed [`RecognitionAttempt`].
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    fn status(&self) -> EngineStatus;

    /// Language codes this engine understands, in its own notation.
    fn languages(&self) -> Vec<String>;

    /// Recognize text in `image`. `language` is already normalized for
    /// this engine.
    async fn recognize(&self, image: Arc<NormalizedImage>, language: &str) -> RecognitionAttempt;
}

/// White 300x100 image with a black horizontal bar, used by the health
/// check to exercise each engine end to end.
pub fn health_probe_image() -> NormalizedImage {
    let mut img = RgbImage::from_pixel(300, 100, Rgb([255, 255, 255]));
    for y in 40..60 {
        for x in 50..250 {
            img.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    NormalizedImage::from_rgb(img)
}

/// Run the health probe image through `engine` and describe the result.
pub async fn probe_engine(engine: &dyn RecognitionEngine) -> String {
    let status = engine.status();
    if !status.available {
        return "not_available".to_string();
    }
    if !status.initialized {
        return "available but initialization failed".to_string();
    }

    let language = engine.kind().normalize_language("auto");
    let attempt = engine
        .recognize(Arc::new(health_probe_image()), &language)
        .await;

    match (attempt.error(), attempt.regions()) {
        (Some(reason), _) => format!("error: {reason}"),
        (None, Some(counts)) => format!("working ({} regions detected)", counts.found),
        (None, None) => "working".to_string(),
    }
}
