//! Grounding exercise: does the photographed object have a characteristic?
//!
//! POST /analyze-image with `{base64, promptChars}`

use axum::{body::Bytes, extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

use super::parse_json;
use crate::models::{AnalyzeImageRequest, AnalyzeImageResponse};
use crate::services::extract;
use crate::services::prompts::image_grounding_prompt;
use crate::services::providers::InlineAttachment;
use crate::startup::AppState;

pub const IMAGE_FAILURE_MESSAGE: &str = "Failed to analyze image.";
pub const NO_RESULT_FALLBACK: &str = "No result returned.";

pub async fn analyze_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalyzeImageResponse>, AppError> {
    let request: AnalyzeImageRequest = parse_json(&body)?;
    request.validate()?;

    tracing::info!(
        characteristic = %request.prompt_chars,
        image_len = request.base64.len(),
        "Received image grounding request"
    );

    let prompt = image_grounding_prompt(&request.prompt_chars);
    let attachments = [InlineAttachment::jpeg(request.base64)];

    let completion = state
        .vision_provider
        .generate(&prompt, &attachments)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Image analysis failed");
            AppError::ServiceFailure(IMAGE_FAILURE_MESSAGE)
        })?;

    Ok(Json(AnalyzeImageResponse {
        result: extract(&completion, NO_RESULT_FALLBACK).into_string(),
    }))
}
