//! Mock provider for tests.

use super::{InlineAttachment, ProviderError, TextProvider};
use crate::models::CompletionResponse;
use async_trait::async_trait;
use std::sync::Mutex;

enum Behavior {
    Respond(CompletionResponse),
    Fail(String),
    Disabled,
}

/// Records every prompt it receives and answers with a fixed envelope or a
/// fixed network failure.
pub struct MockTextProvider {
    behavior: Behavior,
    prompts: Mutex<Vec<String>>,
    attachment_counts: Mutex<Vec<usize>>,
}

impl MockTextProvider {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
            attachment_counts: Mutex::new(Vec::new()),
        }
    }

    /// Answer with a well-formed single-candidate envelope.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Respond(CompletionResponse::from_text(text)))
    }

    /// Answer with an arbitrary envelope.
    pub fn with_response(response: CompletionResponse) -> Self {
        Self::with_behavior(Behavior::Respond(response))
    }

    /// Fail every call with a network error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    /// Report as not configured.
    pub fn disabled() -> Self {
        Self::with_behavior(Behavior::Disabled)
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of attachments sent with each call, in order.
    pub fn attachment_counts(&self) -> Vec<usize> {
        self.attachment_counts
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        attachments: &[InlineAttachment],
    ) -> Result<CompletionResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Ok(mut counts) = self.attachment_counts.lock() {
            counts.push(attachments.len());
        }

        match &self.behavior {
            Behavior::Respond(response) => Ok(response.clone()),
            Behavior::Fail(message) => Err(ProviderError::NetworkError(message.clone())),
            Behavior::Disabled => Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.behavior {
            Behavior::Disabled => Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
