//! Shared setup for journal-service integration tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use journal_service::config::{
    GoogleConfig, JournalConfig, ModelConfig, PolicyConfig, UpstreamConfig,
};
use journal_service::services::providers::mock::MockTextProvider;
use journal_service::startup::{build_router, AppState, Application};
use secrecy::Secret;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEXT_MODEL: &str = "gemini-2.0-flash";
pub const VISION_MODEL: &str = "gemini-1.5-pro";

/// Config pointing at `api_base` with fast, retry-free upstream settings.
pub fn test_config(api_base: &str) -> JournalConfig {
    JournalConfig {
        common: service_core::config::Config {
            port: 0,
            ..Default::default()
        },
        google: GoogleConfig {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            api_base: api_base.to_string(),
        },
        models: ModelConfig {
            text_model: TEXT_MODEL.to_string(),
            vision_model: VISION_MODEL.to_string(),
        },
        upstream: UpstreamConfig {
            timeout: Duration::from_secs(2),
            max_retries: 0,
            initial_backoff: Duration::from_millis(1),
        },
        policy: PolicyConfig::default(),
    }
}

/// Upstream path for `model`'s generateContent method.
pub fn generate_path(model: &str) -> String {
    format!("/models/{}:generateContent", model)
}

/// Router backed by mock providers.
pub fn mock_router(
    text: Arc<MockTextProvider>,
    vision: Arc<MockTextProvider>,
    policy: PolicyConfig,
) -> Router {
    let mut config = test_config("http://unused.invalid");
    config.policy = policy;

    build_router(AppState {
        config,
        text_provider: text,
        vision_provider: vision,
    })
}

/// Send one request through the router; returns status and raw body.
pub async fn send(router: Router, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn send_json(router: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let (status, body) = send(router, method, uri, body).await;
    (status, serde_json::from_str(&body).unwrap())
}

/// A running server whose providers call `api_base`.
pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub async fn spawn(config: JournalConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        Self { address }
    }
}
