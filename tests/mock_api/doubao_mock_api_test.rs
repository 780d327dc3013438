//! Doubao (Volcengine Ark) Mock API Integration Tests

use onesdk::prelude::*;
use onesdk::providers::doubao::DoubaoAdapter;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> OneSdk {
    OneSdk::builder()
        .provider("doubao")
        .api_key("ark-key")
        .base_url(server.uri())
        .model("ep-20240601-abcde")
        .build()
        .await
        .expect("Failed to build client")
}

#[tokio::test]
async fn tokenization_sums_per_text_counts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tokenization"))
        .and(header("authorization", "Bearer ark-key"))
        .and(body_json(json!({
            "model": "ep-20240601-abcde",
            "text": ["You are helpful.", "天空为什么是蓝色的？"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"object": "tokenization", "index": 0, "total_tokens": 4, "token_ids": [1, 2, 3, 4]},
                {"object": "tokenization", "index": 1, "total_tokens": 9, "token_ids": []}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let count = client(&server)
        .await
        .count_tokens(
            None,
            &[Message::system("You are helpful."), Message::user("天空为什么是蓝色的？")],
        )
        .await
        .expect("count");

    assert_eq!(count, TokenCount::exact(13));
}

#[tokio::test]
async fn embeddings_keep_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({
            "model": "doubao-embedding",
            "input": ["first", "second"],
            "encoding_format": "float"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "model": "doubao-embedding-text-240515",
            "data": [
                {"object": "embedding", "index": 0, "embedding": [0.5, -0.25]},
                {"object": "embedding", "index": 1, "embedding": [0.125, 1.0]}
            ],
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = GenerationOptions::new().with("encoding_format", "float");
    let response = client(&server)
        .await
        .create_embedding(
            "doubao-embedding",
            &["first".to_string(), "second".to_string()],
            &options,
        )
        .await
        .expect("embedding");

    assert_eq!(response.model, "doubao-embedding-text-240515");
    assert_eq!(response.embeddings, vec![vec![0.5, -0.25], vec![0.125, 1.0]]);
    assert_eq!(response.usage.total_tokens, Some(4));
}

#[tokio::test]
async fn unknown_options_are_not_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chat-1",
            "model": "ep-20240601-abcde",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new(vec![Message::user("hi")])
        .with_option("temperature", 0.5)
        .with_option("frobnicate", true);
    client(&server).await.generate(request).await.expect("generate");

    let received = &server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&received.body).unwrap();
    assert_eq!(body["temperature"], 0.5);
    assert!(body.get("frobnicate").is_none());
}

#[tokio::test]
async fn context_is_created_then_referenced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/context/create"))
        .and(body_partial_json(json!({
            "model": "ep-20240601-abcde",
            "messages": [{"role": "system", "content": "You are a librarian."}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ctx-123",
            "model": "ep-20240601-abcde",
            "mode": "session"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/context/chat/completions"))
        .and(body_partial_json(json!({"context_id": "ctx-123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chat-ctx",
            "model": "ep-20240601-abcde",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Shelf 4."}, "finish_reason": "stop"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = client(&server).await;
    let doubao = sdk.downcast_adapter::<DoubaoAdapter>().expect("doubao adapter");
    let context = doubao
        .create_context(
            "ep-20240601-abcde",
            &[Message::system("You are a librarian.")],
            &GenerationOptions::new(),
        )
        .await
        .expect("create context");
    let context_id = context["id"].as_str().unwrap();

    let response = doubao
        .generate_with_context(
            "ep-20240601-abcde",
            context_id,
            &[Message::user("Where is the atlas?")],
            &GenerationOptions::new(),
        )
        .await
        .expect("context chat");
    assert_eq!(response.text().as_deref(), Some("Shelf 4."));
}
