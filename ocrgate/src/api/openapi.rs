use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ocrgate API",
        description = "Upload an image, get cleaned and chunked text back. PaddleOCR and Tesseract with automatic fallback.",
    ),
    paths(
        handlers::root::service_info,
        handlers::health::health_check,
        handlers::languages::list_languages,
        handlers::ocr::extract_text,
    ),
    components(schemas(
        dto::RootResponse,
        dto::HealthResponse,
        dto::LanguagesResponse,
        dto::ErrorResponse,
        dto::OcrForm,
        models::OcrResponse,
        models::OcrSuccess,
        models::OcrFailure,
        models::OcrMetadata,
        models::OcrDebugInfo,
    )),
    tags(
        (name = "health", description = "Service status and engine smoke tests"),
        (name = "ocr", description = "Text extraction"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/health", "/languages", "/ocr"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn version_comes_from_the_crate() {
        assert_eq!(ApiDoc::openapi().info.version, env!("CARGO_PKG_VERSION"));
    }
}
