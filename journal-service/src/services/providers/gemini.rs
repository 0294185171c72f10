//! Gemini provider implementation.
//!
//! Issues `generateContent` calls against Google's generative-language API
//! with a bounded timeout and retry on transient failures.

use super::{InlineAttachment, ProviderError, TextProvider};
use crate::models::CompletionResponse;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use service_core::retry::{retry_with_backoff, RetryConfig};
use std::time::{Duration, Instant};

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the configured model and method.
    ///
    /// The key travels as a query parameter; never log the result.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method,
            self.config.api_key.expose_secret()
        )
    }

    async fn send_once(
        &self,
        url: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<CompletionResponse, ProviderError> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response.json::<CompletionResponse>().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::InvalidResponse(e.without_url().to_string())
            }
        })
    }
}

/// Map a reqwest failure without leaking the keyed URL.
fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::NetworkError(e.without_url().to_string())
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        prompt: &str,
        attachments: &[InlineAttachment],
    ) -> Result<CompletionResponse, ProviderError> {
        let request = GenerateContentRequest::new(prompt, attachments);
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            attachment_count = attachments.len(),
            "Sending request to completion API"
        );

        let start = Instant::now();
        let result = retry_with_backoff(&self.config.retry, "generate_content", || {
            self.send_once(&url, &request)
        })
        .await;
        let elapsed = start.elapsed();

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::counter!(
            "upstream_requests_total",
            "model" => self.config.model.clone(),
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!("upstream_latency_seconds", "model" => self.config.model.clone())
            .record(elapsed.as_secs_f64());

        match &result {
            Ok(response) => tracing::info!(
                model = %self.config.model,
                latency_ms = elapsed.as_millis() as u64,
                finish_reason = response.finish_reason().unwrap_or("-"),
                "Completion API responded"
            ),
            Err(e) => tracing::error!(
                model = %self.config.model,
                latency_ms = elapsed.as_millis() as u64,
                error = %e,
                "Completion API call failed"
            ),
        }

        result
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Gemini API Request Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content<'a> {
    parts: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// Single user turn: the prompt text followed by any inline attachments.
    fn new(prompt: &'a str, attachments: &'a [InlineAttachment]) -> Self {
        let mut parts = Vec::with_capacity(1 + attachments.len());
        parts.push(ContentPart::Text { text: prompt });
        parts.extend(attachments.iter().map(|a| ContentPart::InlineData {
            inline_data: InlineData {
                mime_type: &a.mime_type,
                data: &a.data,
            },
        }));

        Self {
            contents: vec![Content { parts }],
        }
    }
}
