//! Completion provider abstraction and implementations.
//!
//! Handlers talk to a [`TextProvider`]; production wires in Gemini, tests
//! wire in the mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use service_core::retry::Retryable;
use thiserror::Error;

use crate::models::CompletionResponse;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Completion API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl Retryable for ProviderError {
    fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimited
            | ProviderError::Timeout
            | ProviderError::NetworkError(_) => true,
            ProviderError::ApiError { status, .. } => *status >= 500,
            ProviderError::NotConfigured(_) | ProviderError::InvalidResponse(_) => false,
        }
    }
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError { .. } => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::Timeout => "timeout",
            ProviderError::NetworkError(_) => "network",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Binary content sent inline alongside the prompt.
#[derive(Debug, Clone)]
pub struct InlineAttachment {
    pub mime_type: String,
    /// Base64 encoded bytes.
    pub data: String,
}

impl InlineAttachment {
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            data: data.into(),
        }
    }
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Model identifier used for requests.
    fn model(&self) -> &str;

    /// Issue one completion request and return the raw envelope.
    ///
    /// Extraction of the text is left to the caller so that each endpoint
    /// can apply its own fallback.
    async fn generate(
        &self,
        prompt: &str,
        attachments: &[InlineAttachment],
    ) -> Result<CompletionResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
