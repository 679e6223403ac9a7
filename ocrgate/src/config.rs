use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse a comma-separated env var into trimmed, non-empty entries.
fn parse_env_list(var: &str, default: &[&str]) -> Vec<String> {
    match env::var(var) {
        Ok(val) if !val.trim().is_empty() => val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}

pub const DEFAULT_PORT: u16 = 8002;
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 1500;
pub const DEFAULT_CHUNK_SIZE: usize = 800;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Longer-side bound applied by the normalizer.
    pub max_image_dimension: u32,
    /// Directory holding the PaddleOCR `det`/`cls`/`rec_*` ONNX models.
    pub region_model_dir: Option<String>,
    pub region_threads: usize,
    /// Tesseract `tessdata` directory. `None` uses the library default.
    pub tessdata_path: Option<String>,
    /// Region engine readers created at startup in addition to `en`.
    pub preload_languages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingConfig {
    pub chunk_size: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            region_model_dir: None,
            region_threads: 2,
            tessdata_path: None,
            preload_languages: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("OCRGATE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: parse_env_or("OCRGATE_PORT", DEFAULT_PORT),
                cors_origins: parse_env_list(
                    "CORS_ORIGINS",
                    &["http://localhost:3000", "http://127.0.0.1:3000"],
                ),
                max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            },
            ocr: OcrConfig {
                max_image_dimension: parse_env_or(
                    "OCR_MAX_DIMENSION",
                    DEFAULT_MAX_IMAGE_DIMENSION,
                ),
                region_model_dir: env::var("REGION_MODEL_DIR").ok(),
                region_threads: parse_env_or("REGION_THREADS", 2),
                tessdata_path: env::var("TESSDATA_PREFIX").ok(),
                preload_languages: parse_env_list("REGION_PRELOAD_LANGUAGES", &[]),
            },
            processing: ProcessingConfig {
                chunk_size: parse_env_or("CHUNK_SIZE", DEFAULT_CHUNK_SIZE),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        std::env::remove_var("OCRGATE_HOST");
        std::env::remove_var("OCRGATE_PORT");
        std::env::remove_var("CORS_ORIGINS");

        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8002);
        assert_eq!(
            config.server.cors_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    #[serial]
    fn test_ocr_config_defaults() {
        std::env::remove_var("OCR_MAX_DIMENSION");
        std::env::remove_var("REGION_PRELOAD_LANGUAGES");
        std::env::remove_var("CHUNK_SIZE");

        let config = Config::default();
        assert_eq!(config.ocr.max_image_dimension, 1500);
        assert!(config.ocr.preload_languages.is_empty());
        assert_eq!(config.processing.chunk_size, 800);
    }

    #[test]
    #[serial]
    fn test_cors_origins_from_env() {
        std::env::set_var("CORS_ORIGINS", "https://app.example.com, ,https://admin.example.com");
        let config = Config::default();
        assert_eq!(
            config.server.cors_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );
        std::env::remove_var("CORS_ORIGINS");
    }

    #[test]
    #[serial]
    fn test_preload_languages_from_env() {
        std::env::set_var("REGION_PRELOAD_LANGUAGES", "multi,fr");
        let config = Config::default();
        assert_eq!(config.ocr.preload_languages, vec!["multi", "fr"]);
        std::env::remove_var("REGION_PRELOAD_LANGUAGES");
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back_to_default() {
        std::env::set_var("OCRGATE_PORT", "not-a-port");
        let config = Config::default();
        assert_eq!(config.server.port, 8002);
        std::env::remove_var("OCRGATE_PORT");
    }

    #[test]
    #[serial]
    fn test_parse_env_or_valid_value() {
        std::env::set_var("__TEST_PARSE_CHUNK", "1200");
        let result: usize = parse_env_or("__TEST_PARSE_CHUNK", 800);
        assert_eq!(result, 1200);
        std::env::remove_var("__TEST_PARSE_CHUNK");
    }
}
