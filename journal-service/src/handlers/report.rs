//! Trend report over recent journal entries.
//!
//! POST /report with `{logs: [...]}`

use axum::{body::Bytes, extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

use super::{parse_json, upstream_failure};
use crate::models::report::average_mood_score;
use crate::models::{TrendReportRequest, TrendReportResponse};
use crate::services::extract;
use crate::services::prompts::trend_report_prompt;
use crate::startup::AppState;

pub const MISSING_LOGS_MESSAGE: &str = "Missing logs";
pub const NO_REPORT_FALLBACK: &str = "Could not generate report.";

pub async fn trend_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TrendReportResponse>, AppError> {
    let request: TrendReportRequest = parse_json(&body)?;
    request.validate()?;
    let logs = request
        .logs
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(MISSING_LOGS_MESSAGE)))?;

    let prompt = trend_report_prompt(&logs, state.config.policy.professional_help);
    let average = average_mood_score(&logs);

    let completion = match state.text_provider.generate(&prompt, &[]).await {
        Ok(completion) => completion,
        Err(e) => {
            return upstream_failure(state.config.policy.upstream_failure, "report", e, || {
                TrendReportResponse {
                    report: NO_REPORT_FALLBACK.to_string(),
                    average_mood_score: average,
                }
            })
        }
    };

    let extraction = extract(&completion, NO_REPORT_FALLBACK);
    if extraction.is_fallback() {
        tracing::warn!(
            finish_reason = completion.finish_reason().unwrap_or("-"),
            "Completion carried no text, using fallback"
        );
    }

    tracing::info!(
        log_count = logs.len(),
        average_mood_score = average,
        "Trend report generated"
    );

    Ok(Json(TrendReportResponse {
        report: extraction.into_string(),
        average_mood_score: average,
    }))
}
