use image::{DynamicImage, GenericImageView, GrayImage, ImageReader, RgbImage};
use tracing::{debug, warn};

use crate::error::{OcrGateError, Result};

/// Decoded pixel data in one of the two color modes the engines understand.
#[derive(Debug, Clone)]
pub enum PixelArray {
    Gray(GrayImage),
    Rgb(RgbImage),
}

/// Output of [`normalize`]: the color image every engine can consume, plus
/// the grayscale derivative when enhancement was requested and succeeded.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub color: RgbImage,
    pub gray: Option<GrayImage>,
    /// Dimensions of the decoded upload before any resizing.
    pub original_dimensions: (u32, u32),
}

impl NormalizedImage {
    pub fn from_rgb(color: RgbImage) -> Self {
        let original_dimensions = color.dimensions();
        Self {
            color,
            gray: None,
            original_dimensions,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.color.dimensions()
    }

    pub fn is_enhanced(&self) -> bool {
        self.gray.is_some()
    }

    /// The grayscale derivative if present, otherwise the color image.
    pub fn preferred_for_full_page(&self) -> PixelArray {
        match &self.gray {
            Some(gray) => PixelArray::Gray(gray.clone()),
            None => PixelArray::Rgb(self.color.clone()),
        }
    }
}

/// Decode and normalize uploaded image bytes.
///
/// 1. Decodes with a guessed format (`Decode` error on failure)
/// 2. Flattens any color mode to 8-bit RGB
/// 3. Scales down so the longer side equals `max_dimension` when exceeded
/// 4. Optionally derives a grayscale image; a failure here is logged and
///    the color image is used alone
pub fn normalize(bytes: &[u8], enhance: bool, max_dimension: u32) -> Result<NormalizedImage> {
    let img = decode(bytes)?;
    let original_dimensions = img.dimensions();
    debug!(
        width = original_dimensions.0,
        height = original_dimensions.1,
        color = ?img.color(),
        "Decoded image"
    );

    let color = img.to_rgb8();
    let color = resize_if_needed(color, max_dimension);

    let gray = if enhance {
        match to_luminance(&color) {
            Ok(gray) => Some(gray),
            Err(e) => {
                warn!("Grayscale conversion failed: {e}, using color image");
                None
            }
        }
    } else {
        None
    };

    Ok(NormalizedImage {
        color,
        gray,
        original_dimensions,
    })
}

fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OcrGateError::Decode(format!("cannot read image: {e}")))?;

    reader
        .decode()
        .map_err(|e| OcrGateError::Decode(e.to_string()))
}

/// Target size for a longer side bounded by `max_dim`, rounding to the
/// nearest pixel. `None` when no resize is needed.
pub fn scaled_dimensions(width: u32, height: u32, max_dim: u32) -> Option<(u32, u32)> {
    let longer = width.max(height);
    if longer <= max_dim || max_dim == 0 {
        return None;
    }

    let ratio = max_dim as f64 / longer as f64;
    let new_width = ((width as f64 * ratio).round() as u32).max(1);
    let new_height = ((height as f64 * ratio).round() as u32).max(1);
    Some((new_width, new_height))
}

/// Lanczos3 downscale when the longer side exceeds `max_dim`.
fn resize_if_needed(img: RgbImage, max_dim: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    match scaled_dimensions(width, height, max_dim) {
        Some((new_width, new_height)) => {
            debug!(new_width, new_height, "Resizing image");
            image::imageops::resize(
                &img,
                new_width,
                new_height,
                image::imageops::FilterType::Lanczos3,
            )
        }
        None => img,
    }
}

/// ITU-R 601 luma, truncated: `0.299 R + 0.587 G + 0.114 B`.
pub fn to_luminance(rgb: &RgbImage) -> std::result::Result<GrayImage, String> {
    let (width, height) = rgb.dimensions();
    let luma: Vec<u8> = rgb
        .pixels()
        .map(|p| {
            let value = 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64;
            value as u8
        })
        .collect();

    GrayImage::from_raw(width, height, luma)
        .ok_or_else(|| format!("buffer does not match {width}x{height}"))
}
