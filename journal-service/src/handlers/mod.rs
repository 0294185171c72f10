//! HTTP handlers for the journal service.

pub mod analyze;
pub mod health;
pub mod image;
pub mod report;

use axum::{body::Bytes, http::StatusCode, Json};
use serde::de::DeserializeOwned;
use service_core::error::AppError;

use crate::config::UpstreamFailurePolicy;
use crate::services::providers::ProviderError;

/// Plain-text answer for any method other than POST on a journaling route.
pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Only POST allowed")
}

/// Decode a JSON body regardless of the request's content type.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::InvalidBody(e.to_string()))
}

/// Resolve a failed completion call according to the configured policy.
pub(crate) fn upstream_failure<T>(
    policy: UpstreamFailurePolicy,
    endpoint: &'static str,
    err: ProviderError,
    fallback: impl FnOnce() -> T,
) -> Result<Json<T>, AppError> {
    match policy {
        UpstreamFailurePolicy::Error => {
            tracing::error!(endpoint, error = %err, "Completion call failed");
            Err(AppError::UpstreamError(err.to_string()))
        }
        UpstreamFailurePolicy::Fallback => {
            tracing::warn!(endpoint, error = %err, "Completion call failed, answering with fallback");
            Ok(Json(fallback()))
        }
    }
}
