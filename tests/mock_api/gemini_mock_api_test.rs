//! Gemini Mock API Integration Tests
//!
//! The API key travels as the `key` query parameter.

use onesdk::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> OneSdk {
    OneSdk::builder()
        .provider("gemini")
        .api_key("g-key")
        .base_url(server.uri())
        .model("gemini-1.5-flash")
        .build()
        .await
        .expect("Failed to build client")
}

#[tokio::test]
async fn generate_maps_roles_system_and_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "g-key"))
        .and(body_json(json!({
            "contents": [
                {"role": "user", "parts": [{"text": "Hi"}]},
                {"role": "model", "parts": [{"text": "Hello!"}]},
                {"role": "user", "parts": [{"text": "Bye"}]}
            ],
            "systemInstruction": {"parts": [{"text": "Be kind."}]},
            "generationConfig": {"maxOutputTokens": 32, "stopSequences": ["END"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Goodbye!"}]},
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 9, "candidatesTokenCount": 2, "totalTokenCount": 11},
            "modelVersion": "gemini-1.5-flash-002",
            "responseId": "resp-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new(vec![
        Message::system("Be kind."),
        Message::user("Hi"),
        Message::assistant("Hello!"),
        Message::user("Bye"),
    ])
    .with_option("max_tokens", 32)
    .with_option("stop", "END");
    let response = client(&server).await.generate(request).await.expect("generate");

    assert_eq!(response.id, "resp-1");
    assert_eq!(response.model, "gemini-1.5-flash-002");
    assert_eq!(response.text().as_deref(), Some("Goodbye!"));
    assert_eq!(response.choices[0].finish_reason.as_deref(), Some("STOP"));
    assert_eq!(response.usage.total_tokens, Some(11));
}

#[tokio::test]
async fn blocked_prompt_is_a_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .chat(vec![Message::user("something unsafe")])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(err.error_code(), Some("SAFETY"));
}

#[tokio::test]
async fn count_tokens_uses_count_tokens_method() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:countTokens"))
        .and(query_param("key", "g-key"))
        .and(body_partial_json(json!({"contents": [{"role": "user", "parts": [{"text": "count me"}]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let count = client(&server)
        .await
        .count_tokens(None, &[Message::user("count me")])
        .await
        .expect("count");
    assert_eq!(count, TokenCount::exact(3));
}

#[tokio::test]
async fn models_strip_the_resource_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{
                "name": "models/gemini-1.5-pro",
                "displayName": "Gemini 1.5 Pro",
                "description": "Mid-size multimodal model",
                "inputTokenLimit": 2_097_152,
                "outputTokenLimit": 8192
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let models = client(&server).await.list_models().await.expect("models");

    assert_eq!(models.len(), 1);
    assert_eq!(models[0].id, "gemini-1.5-pro");
    assert_eq!(models[0].context_window, Some(2_097_152));
    assert_eq!(models[0].max_output_tokens, Some(8192));
}

#[tokio::test]
async fn embeddings_are_batched_per_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/text-embedding-004:batchEmbedContents"))
        .and(body_json(json!({"requests": [
            {"model": "models/text-embedding-004", "content": {"parts": [{"text": "a"}]}, "taskType": "RETRIEVAL_QUERY"},
            {"model": "models/text-embedding-004", "content": {"parts": [{"text": "b"}]}, "taskType": "RETRIEVAL_QUERY"}
        ]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [{"values": [0.5, 0.25]}, {"values": [0.75, 1.0]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = GenerationOptions::new().with("task_type", "RETRIEVAL_QUERY");
    let response = client(&server)
        .await
        .create_embedding("text-embedding-004", &["a".into(), "b".into()], &options)
        .await
        .expect("embedding");

    assert_eq!(response.embeddings, vec![vec![0.5, 0.25], vec![0.75, 1.0]]);
}
