mod common;

use axum::http::StatusCode;
use common::{generate_path, mock_router, send, send_json, test_config, TestApp, TEST_API_KEY, TEXT_MODEL};
use journal_service::config::{PolicyConfig, UpstreamFailurePolicy};
use journal_service::models::CompletionResponse;
use journal_service::services::providers::mock::MockTextProvider;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENTRY: &str = r#"{"entry":"I feel okay today","timestamp":"2025-01-01T10:00:00Z"}"#;

fn router_with(text: MockTextProvider) -> (Arc<MockTextProvider>, axum::Router) {
    let text = Arc::new(text);
    let router = mock_router(
        text.clone(),
        Arc::new(MockTextProvider::disabled()),
        PolicyConfig::default(),
    );
    (text, router)
}

#[tokio::test]
async fn missing_entry_or_timestamp_is_rejected() {
    let bodies = [
        r#"{"timestamp":"2025-01-01T10:00:00Z"}"#,
        r#"{"entry":"I feel okay today"}"#,
        r#"{}"#,
        r#"{"entry":"","timestamp":"2025-01-01T10:00:00Z"}"#,
        r#"{"entry":null,"timestamp":null}"#,
    ];

    for body in bodies {
        let (provider, router) = router_with(MockTextProvider::replying("unused"));
        let (status, json) = send_json(router, "POST", "/", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json, json!({ "error": "Missing entry or timestamp" }));
        assert!(provider.prompts().is_empty(), "upstream called for {}", body);
    }
}

#[tokio::test]
async fn non_post_methods_are_not_allowed() {
    for verb in ["GET", "PUT", "DELETE", "PATCH"] {
        let (_, router) = router_with(MockTextProvider::replying("unused"));
        let (status, body) = send(router, verb, "/", "").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method: {}", verb);
        assert_eq!(body, "Only POST allowed");
    }
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let (provider, router) = router_with(MockTextProvider::replying("unused"));
    let (status, json) = send_json(router, "POST", "/", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid request body");
    assert!(json["details"].is_string());
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
async fn returns_raw_model_text_as_message() {
    let (provider, router) = router_with(MockTextProvider::replying("stubbed analysis"));
    let (status, json) = send_json(router, "POST", "/", ENTRY).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "message": "stubbed analysis" }));

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("I feel okay today"));
    assert!(prompts[0].contains("2025-01-01T10:00:00Z"));
}

#[tokio::test]
async fn structured_sections_accompany_the_message() {
    let text = "*Tone:* Calm\n*Mood Score:* 0.4\n*Supportive Message:* Glad today felt steady.";
    let (_, router) = router_with(MockTextProvider::replying(text));
    let (status, json) = send_json(router, "POST", "/", ENTRY).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], text);
    assert_eq!(json["analysis"]["moodScore"], 0.4);
    assert_eq!(json["analysis"]["supportiveMessage"], "Glad today felt steady.");
    assert_eq!(json["analysis"]["grammarVersion"], 1);
}

#[tokio::test]
async fn empty_completion_uses_fallback() {
    let (_, router) = router_with(MockTextProvider::with_response(CompletionResponse::default()));
    let (status, json) = send_json(router, "POST", "/", ENTRY).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "message": "No analysis returned." }));
}

#[tokio::test]
async fn upstream_failure_is_reported_with_details() {
    let (_, router) = router_with(MockTextProvider::failing("connection refused"));
    let (status, json) = send_json(router, "POST", "/", ENTRY).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Something went wrong");
    assert!(json["details"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn fallback_policy_masks_upstream_failure() {
    let router = mock_router(
        Arc::new(MockTextProvider::failing("connection refused")),
        Arc::new(MockTextProvider::disabled()),
        PolicyConfig {
            upstream_failure: UpstreamFailurePolicy::Fallback,
            ..Default::default()
        },
    );
    let (status, json) = send_json(router, "POST", "/", ENTRY).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "message": "No analysis returned." }));
}

#[tokio::test]
async fn end_to_end_against_stubbed_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path(TEXT_MODEL)))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "<stubbed text>" }] } }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(test_config(&upstream.uri())).await;
    let response = reqwest::Client::new()
        .post(&app.address)
        .header("content-type", "application/json")
        .body(ENTRY)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "<stubbed text>" }));

    let requests = upstream.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains(r#"This is a journal entry: "I feel okay today""#));
}

#[tokio::test]
async fn end_to_end_upstream_error_status_becomes_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path(TEXT_MODEL)))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(test_config(&upstream.uri())).await;
    let response = reqwest::Client::new()
        .post(&app.address)
        .body(ENTRY)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Something went wrong");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("400"));
    assert!(!details.contains(TEST_API_KEY));
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let (provider, router) = router_with(MockTextProvider::replying("ok"));

    let requests = (0..8).map(|i| {
        let router = router.clone();
        async move {
            let body = format!(r#"{{"entry":"entry {}","timestamp":"t{}"}}"#, i, i);
            send_json(router, "POST", "/", &body).await
        }
    });
    let results = futures::future::join_all(requests).await;

    assert!(results
        .iter()
        .all(|(status, json)| *status == StatusCode::OK && json["message"] == "ok"));
    assert_eq!(provider.prompts().len(), 8);
}
