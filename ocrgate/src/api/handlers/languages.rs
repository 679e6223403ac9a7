use axum::extract::State;
use axum::Json;

use crate::api::dto::LanguagesResponse;
use crate::api::state::AppState;
use crate::ocr::MULTI_LANGUAGES;

/// `GET /languages`
#[utoipa::path(
    get,
    path = "/languages",
    tag = "ocr",
    responses(
        (status = 200, description = "Language codes accepted by each engine", body = LanguagesResponse),
    )
)]
pub async fn list_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    let orchestrator = state.orchestrator();

    Json(LanguagesResponse {
        paddle: orchestrator.region().languages(),
        tesseract: orchestrator.tesseract().languages(),
        default: "en".to_string(),
        multi: MULTI_LANGUAGES.iter().map(|l| l.to_string()).collect(),
    })
}
