use serde::Serialize;

/// Minimum per-region confidence (native 0..1 scale) for a region to count.
pub const REGION_CONFIDENCE_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Region detector + recognizer (PaddleOCR).
    Paddle,
    /// Full-page Tesseract.
    Tesseract,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Paddle => "paddle",
            EngineKind::Tesseract => "tesseract",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EngineKind::Paddle => "PaddleOCR",
            EngineKind::Tesseract => "Tesseract",
        }
    }

    /// Map a requested method name onto an engine. `"easyocr"` and
    /// `"region"` are accepted for the region engine so existing clients
    /// keep working.
    pub fn from_method(method: &str) -> Option<Self> {
        match method.trim().to_lowercase().as_str() {
            "paddle" | "paddleocr" | "region" | "easyocr" => Some(EngineKind::Paddle),
            "tesseract" => Some(EngineKind::Tesseract),
            _ => None,
        }
    }

    /// Language code as each engine expects it.
    pub fn normalize_language(&self, language: &str) -> String {
        let language = language.trim();
        match self {
            EngineKind::Paddle if matches!(language, "auto" | "eng") => "en".to_string(),
            EngineKind::Tesseract if matches!(language, "auto" | "en") => "eng".to_string(),
            _ => language.to_string(),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Startup state of an engine. `available` means the backend is present;
/// `initialized` means its resources were created successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EngineStatus {
    pub available: bool,
    pub initialized: bool,
}

impl EngineStatus {
    pub fn ready() -> Self {
        Self {
            available: true,
            initialized: true,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.available && self.initialized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RegionCounts {
    pub found: usize,
    pub used: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.height as f32 / 2.0
    }
}

/// A detected sub-area with its own recognized text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub bbox: BoundingBox,
    pub text: String,
    /// Native 0..1 score.
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success {
        text: String,
        /// Percentage in `[0, 100]`.
        confidence: f32,
        regions: Option<RegionCounts>,
    },
    Failure {
        reason: String,
    },
}

/// Result of a single engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionAttempt {
    pub engine: EngineKind,
    pub language: String,
    pub outcome: AttemptOutcome,
}

impl RecognitionAttempt {
    pub fn success(
        engine: EngineKind,
        language: impl Into<String>,
        text: impl Into<String>,
        confidence: f32,
        regions: Option<RegionCounts>,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            engine,
            language: language.into(),
            outcome: AttemptOutcome::Success {
                text: text.into(),
                confidence,
                regions,
            },
        }
    }

    pub fn failure(engine: EngineKind, language: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = format!("{} failed without an error message", engine.display_name());
        }
        Self {
            engine,
            language: language.into(),
            outcome: AttemptOutcome::Failure { reason },
        }
    }

    /// Fold detected regions into one attempt: drop regions at or below
    /// [`REGION_CONFIDENCE_THRESHOLD`], join the rest with single spaces and
    /// average their confidence as a percentage.
    pub fn from_regions(engine: EngineKind, language: impl Into<String>, regions: &[TextRegion]) -> Self {
        let kept: Vec<&TextRegion> = regions
            .iter()
            .filter(|r| r.confidence > REGION_CONFIDENCE_THRESHOLD)
            .collect();

        let text = kept
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let confidence = if kept.is_empty() {
            0.0
        } else {
            kept.iter().map(|r| r.confidence).sum::<f32>() / kept.len() as f32 * 100.0
        };

        Self::success(
            engine,
            language,
            text,
            confidence,
            Some(RegionCounts {
                found: regions.len(),
                used: kept.len(),
            }),
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success { .. })
    }

    pub fn text(&self) -> &str {
        match &self.outcome {
            AttemptOutcome::Success { text, .. } => text,
            AttemptOutcome::Failure { .. } => "",
        }
    }

    pub fn confidence(&self) -> f32 {
        match &self.outcome {
            AttemptOutcome::Success { confidence, .. } => *confidence,
            AttemptOutcome::Failure { .. } => 0.0,
        }
    }

    pub fn regions(&self) -> Option<RegionCounts> {
        match &self.outcome {
            AttemptOutcome::Success { regions, .. } => *regions,
            AttemptOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Success { .. } => None,
            AttemptOutcome::Failure { reason } => Some(reason),
        }
    }
}
