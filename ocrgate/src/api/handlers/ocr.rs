use axum::extract::multipart::Field;
use axum::extract::State;
use axum::Json;

use crate::api::dto::{ErrorResponse, OcrForm};
use crate::api::extractors::AppMultipart;
use crate::api::state::AppState;
use crate::error::{OcrGateError, Result};
use crate::models::{ImageUpload, OcrOptions, OcrResponse};

pub const MIN_CHUNK_SIZE: usize = 100;
pub const MAX_CHUNK_SIZE: usize = 2000;

fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

async fn field_text(field: Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| OcrGateError::Validation(format!("Invalid {name} value: {e}")))
}

async fn field_bool(field: Field<'_>, name: &str) -> Result<bool> {
    let raw = field_text(field, name).await?;
    parse_form_bool(&raw).ok_or_else(|| {
        OcrGateError::Validation(format!(
            "{name} must be one of true/false/1/0/yes/no/on/off"
        ))
    })
}

fn parse_chunk_size(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(size) if (MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&size) => Ok(size),
        _ => Err(OcrGateError::Validation(format!(
            "chunk_size must be an integer between {MIN_CHUNK_SIZE} and {MAX_CHUNK_SIZE}"
        ))),
    }
}

/// `POST /ocr`
///
/// Recognition problems come back as `200` with `success: false`. Only a
/// malformed request (bad multipart, missing `file`, unparseable option)
/// is a `400`.
#[utoipa::path(
    post,
    path = "/ocr",
    tag = "ocr",
    request_body(content = OcrForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extraction result; check `success`", body = OcrResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
    )
)]
pub async fn extract_text(
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<Json<OcrResponse>> {
    let mut upload: Option<ImageUpload> = None;
    let mut options = OcrOptions {
        chunk_size: state.config.processing.chunk_size,
        ..OcrOptions::default()
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(OcrGateError::Validation(format!(
                    "Invalid multipart request: {e}"
                )))
            }
        };
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| OcrGateError::Validation(format!("Failed to read file: {e}")))?;

                upload = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "language" => options.language = field_text(field, "language").await?.trim().to_string(),
            "method" => options.method = field_text(field, "method").await?.trim().to_string(),
            "enhance" => options.enhance = field_bool(field, "enhance").await?,
            "post_process" => options.post_process = field_bool(field, "post_process").await?,
            "chunk_text" => options.chunk_text = field_bool(field, "chunk_text").await?,
            "chunk_size" => {
                options.chunk_size = parse_chunk_size(&field_text(field, "chunk_size").await?)?
            }
            _ => {}
        }
    }

    let upload = upload
        .ok_or_else(|| OcrGateError::Validation("Missing required 'file' field".to_string()))?;

    if options.language.is_empty() {
        options.language = "en".to_string();
    }
    if options.method.is_empty() {
        options.method = "auto".to_string();
    }

    Ok(Json(state.ocr.process(upload, options).await))
}
