//! HTTP OCR gateway: image normalization, PaddleOCR and Tesseract engines
//! behind one trait with automatic fallback, text cleanup and chunking.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod ocr;
pub mod processing;
pub mod services;
