use axum::extract::State;
use axum::Json;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::ocr::probe_engine;

const RECOMMENDATIONS: [&str; 3] = [
    "PaddleOCR works best with clear, high-contrast text",
    "Try toggling enhance if recognition fails",
    "Pass 'en' for English text instead of 'auto'",
];

/// `GET /health`
///
/// Runs a synthetic image through each engine.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Live engine status", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let orchestrator = state.orchestrator();
    let (paddle_status, tesseract_status) = tokio::join!(
        probe_engine(orchestrator.region().as_ref()),
        probe_engine(orchestrator.tesseract().as_ref()),
    );

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "ocrgate".to_string(),
        paddle_status,
        tesseract_status,
        enhancement_status: "available".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        port: state.config.server.port,
        uptime: state.started_at.elapsed().as_secs(),
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
    })
}
