#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};

use ocrgate::api::{create_router, AppState};
use ocrgate::config::Config;
use ocrgate::ocr::{
    EngineKind, EngineStatus, FallbackOrchestrator, NormalizedImage, RecognitionAttempt,
    RecognitionEngine,
};

pub const BOUNDARY: &str = "ocrgate-test-boundary";

/// Engine with a scripted result that records every call.
pub struct StubEngine {
    kind: EngineKind,
    status: EngineStatus,
    result: Result<(String, f32), String>,
    calls: AtomicUsize,
    languages_seen: Mutex<Vec<String>>,
}

impl StubEngine {
    pub fn succeeding(kind: EngineKind, text: &str, confidence: f32) -> Self {
        Self {
            kind,
            status: EngineStatus::ready(),
            result: Ok((text.to_string(), confidence)),
            calls: AtomicUsize::new(0),
            languages_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: EngineKind, reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            ..Self::succeeding(kind, "", 0.0)
        }
    }

    pub fn missing(kind: EngineKind) -> Self {
        let reason = format!("{} not installed", kind.display_name());
        Self {
            status: EngineStatus::missing(),
            ..Self::failing(kind, &reason)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn languages_seen(&self) -> Vec<String> {
        self.languages_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecognitionEngine for StubEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    fn status(&self) -> EngineStatus {
        self.status
    }

    fn languages(&self) -> Vec<String> {
        match self.kind {
            EngineKind::Paddle => vec!["en".into(), "fr".into(), "multi".into()],
            EngineKind::Tesseract => vec!["eng".into(), "fra".into()],
        }
    }

    async fn recognize(&self, _image: Arc<NormalizedImage>, language: &str) -> RecognitionAttempt {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.languages_seen.lock().unwrap().push(language.to_string());
        match &self.result {
            Ok((text, confidence)) => {
                RecognitionAttempt::success(self.kind, language, text.clone(), *confidence, None)
            }
            Err(reason) => RecognitionAttempt::failure(self.kind, language, reason.clone()),
        }
    }
}

/// Router over the two given engines. Callers keep their own `Arc` clones
/// to inspect call counts.
pub fn test_app(
    region: Arc<dyn RecognitionEngine>,
    tesseract: Arc<dyn RecognitionEngine>,
) -> axum::Router {
    let orchestrator = FallbackOrchestrator::new(region, tesseract);
    create_router(AppState::new(Config::default(), orchestrator))
}

/// Encode an RGB image as PNG bytes.
pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer.into_inner()
}

pub fn blank_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(&RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
}

/// 5x7 bitmap glyphs, one row per string, `#` is ink.
fn glyph(c: char) -> [&'static str; 7] {
    match c {
        'H' => ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'E' => ["#####", "#....", "#....", "####.", "#....", "#....", "#####"],
        'L' => ["#....", "#....", "#....", "#....", "#....", "#....", "#####"],
        'O' => [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'W' => ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "##.##", "#...#"],
        'R' => ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"],
        'D' => ["####.", "#...#", "#...#", "#...#", "#...#", "#...#", "####."],
        _ => ["....."; 7],
    }
}

/// Render upper-case text as black-on-white bitmap type, `scale` pixels per
/// glyph dot with two dots between letters. Large enough scales are
/// readable by Tesseract.
pub fn render_text(text: &str, scale: u32) -> RgbImage {
    let margin = 4 * scale;
    let advance = 7 * scale;
    let width = margin * 2 + advance * text.chars().count() as u32;
    let height = margin * 2 + 7 * scale;
    let mut image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for (index, c) in text.chars().enumerate() {
        let origin_x = margin + advance * index as u32;
        for (row, line) in glyph(c).iter().enumerate() {
            for (col, dot) in line.chars().enumerate() {
                if dot != '#' {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = origin_x + col as u32 * scale + dx;
                        let y = margin + row as u32 * scale + dy;
                        image.put_pixel(x, y, Rgb([0, 0, 0]));
                    }
                }
            }
        }
    }
    image
}

/// Upper-cased text with all whitespace removed.
pub fn squashed(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Multipart body builder for `POST /ocr`.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

pub fn ocr_request(body: Vec<u8>) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri("/ocr")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(body))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
