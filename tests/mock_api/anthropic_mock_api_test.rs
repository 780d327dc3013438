//! Anthropic Mock API Integration Tests

use onesdk::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> OneSdk {
    OneSdk::builder()
        .provider("anthropic")
        .api_key("test-api-key")
        .base_url(server.uri())
        .model("claude-3-5-sonnet-20241022")
        .build()
        .await
        .expect("Failed to build client")
}

#[tokio::test]
async fn chat_lifts_system_and_sends_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-api-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20241022",
            "system": "Be brief.",
            "max_tokens": 4096,
            "messages": [{"role": "user", "content": "Hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20241022",
            "content": [{"type": "text", "text": "Hello."}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .await
        .chat(vec![Message::system("Be brief."), Message::user("Hi")])
        .await
        .expect("chat");

    assert_eq!(response.id, "msg_01");
    assert_eq!(response.text().as_deref(), Some("Hello."));
    assert_eq!(response.choices[0].finish_reason.as_deref(), Some("end_turn"));
    assert_eq!(response.usage.total_tokens, Some(13));
}

#[tokio::test]
async fn beta_option_becomes_a_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("anthropic-beta", "prompt-caching-2024-07-31,pdfs-2024-09-25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_02",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20241022",
            "content": [{"type": "text", "text": "ok"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 1, "output_tokens": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new(vec![Message::user("Hi")]).with_option(
        "anthropic-beta",
        json!(["prompt-caching-2024-07-31", "pdfs-2024-09-25"]),
    );
    client(&server).await.generate(request).await.expect("generate");

    let received = &server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&received.body).unwrap();
    assert!(body.get("anthropic-beta").is_none());
}

#[tokio::test]
async fn count_tokens_is_exact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages/count_tokens"))
        .and(body_partial_json(json!({"model": "claude-3-5-sonnet-20241022"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"input_tokens": 14})))
        .expect(1)
        .mount(&server)
        .await;

    let count = client(&server)
        .await
        .count_tokens(None, &[Message::user("How many tokens is this?")])
        .await
        .expect("count");

    assert_eq!(count.tokens, 14);
    assert!(count.is_exact());
}

#[tokio::test]
async fn models_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"type": "model", "id": "claude-3-5-sonnet-20241022", "display_name": "Claude 3.5 Sonnet", "created_at": "2024-10-22T00:00:00Z"},
                {"type": "model", "id": "claude-3-haiku-20240307", "display_name": "Claude 3 Haiku", "created_at": "2024-03-07T00:00:00Z"}
            ],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let models = client(&server).await.list_models().await.expect("models");

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "claude-3-5-sonnet-20241022");
    assert_eq!(models[0].name.as_deref(), Some("Claude 3.5 Sonnet"));
    assert_eq!(models[1].created, Some(1_709_769_600));
}
