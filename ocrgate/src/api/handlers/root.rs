use axum::extract::State;
use axum::Json;

use crate::api::dto::RootResponse;
use crate::api::state::AppState;

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service banner and engine availability", body = RootResponse),
    )
)]
pub async fn service_info(State(state): State<AppState>) -> Json<RootResponse> {
    let region = state.orchestrator().region().status();
    let tesseract = state.orchestrator().tesseract().status();

    Json(RootResponse {
        message: "ocrgate is running".to_string(),
        status: "healthy".to_string(),
        paddle_available: region.available,
        paddle_initialized: region.initialized,
        tesseract_available: tesseract.available,
        enhancement_available: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
