//! Single journal entry analysis.
//!
//! POST / with `{entry, timestamp}`

use axum::{body::Bytes, extract::State, Json};
use service_core::error::AppError;

use super::{parse_json, upstream_failure};
use crate::models::{AnalyzeEntryRequest, AnalyzeEntryResponse};
use crate::services::analysis::parse_analysis;
use crate::services::extract;
use crate::services::prompts::entry_analysis_prompt;
use crate::startup::AppState;

pub const MISSING_ENTRY_MESSAGE: &str = "Missing entry or timestamp";
pub const NO_ANALYSIS_FALLBACK: &str = "No analysis returned.";

pub async fn analyze_entry(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalyzeEntryResponse>, AppError> {
    let request: AnalyzeEntryRequest = parse_json(&body)?;
    let (entry, timestamp) = request
        .into_parts()
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(MISSING_ENTRY_MESSAGE)))?;

    let prompt = entry_analysis_prompt(&entry, &timestamp);

    let completion = match state.text_provider.generate(&prompt, &[]).await {
        Ok(completion) => completion,
        Err(e) => {
            return upstream_failure(state.config.policy.upstream_failure, "analyze", e, || {
                AnalyzeEntryResponse {
                    message: NO_ANALYSIS_FALLBACK.to_string(),
                    analysis: None,
                }
            })
        }
    };

    let extraction = extract(&completion, NO_ANALYSIS_FALLBACK);
    if extraction.is_fallback() {
        tracing::warn!(
            finish_reason = completion.finish_reason().unwrap_or("-"),
            "Completion carried no text, using fallback"
        );
    }

    let analysis = if extraction.is_fallback() {
        None
    } else {
        parse_analysis(extraction.as_str())
    };

    tracing::info!(
        entry_len = entry.len(),
        mood_score = analysis.as_ref().and_then(|a| a.mood_score),
        "Entry analyzed"
    );

    Ok(Json(AnalyzeEntryResponse {
        message: extraction.into_string(),
        analysis,
    }))
}
