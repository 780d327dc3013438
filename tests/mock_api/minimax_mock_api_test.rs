//! MiniMax Mock API Integration Tests
//!
//! Every call carries the `GroupId` query parameter next to bearer auth.

use onesdk::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok() -> serde_json::Value {
    json!({"status_code": 0, "status_msg": "success"})
}

async fn client(server: &MockServer, model: &str) -> OneSdk {
    OneSdk::builder()
        .provider("minimax")
        .credentials(
            Credentials::new()
                .with_api_key("mm-key")
                .with_group_id("g-42")
                .with_base_url(server.uri()),
        )
        .model(model)
        .build()
        .await
        .expect("Failed to build client")
}

#[tokio::test]
async fn pro_chat_sends_bot_setting_and_sender_names() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text/chatcompletion_pro"))
        .and(query_param("GroupId", "g-42"))
        .and(header("authorization", "Bearer mm-key"))
        .and(body_partial_json(json!({
            "model": "abab5.5-chat",
            "bot_setting": [{"bot_name": "MM Assistant", "content": "You are terse."}],
            "reply_constraints": {"sender_type": "BOT", "sender_name": "MM Assistant"},
            "messages": [{"sender_type": "USER", "sender_name": "User", "text": "hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "mm-1",
            "created": 1_700_000_000,
            "model": "abab5.5-chat",
            "reply": "hello",
            "choices": [{
                "finish_reason": "stop",
                "messages": [{"sender_type": "BOT", "sender_name": "MM Assistant", "text": "hello"}]
            }],
            "usage": {"total_tokens": 20},
            "base_resp": ok()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, "abab5.5-chat")
        .await
        .chat(vec![Message::system("You are terse."), Message::user("hi")])
        .await
        .expect("chat");

    assert_eq!(response.id, "mm-1");
    assert_eq!(response.text().as_deref(), Some("hello"));
    assert_eq!(response.usage.total_tokens, Some(20));
}

#[tokio::test]
async fn embeddings_default_to_db_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(query_param("GroupId", "g-42"))
        .and(body_json(json!({"model": "embo-01", "texts": ["alpha", "beta"], "type": "db"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vectors": [[0.25, 0.5], [-1.0, 0.0]],
            "total_tokens": 6,
            "base_resp": ok()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({"type": "query"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vectors": [[1.0]],
            "total_tokens": 1,
            "base_resp": ok()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = client(&server, "abab6-chat").await;
    let response = sdk
        .create_embedding("embo-01", &["alpha".into(), "beta".into()], &GenerationOptions::new())
        .await
        .expect("embedding");
    assert_eq!(response.embeddings, vec![vec![0.25, 0.5], vec![-1.0, 0.0]]);
    assert_eq!(response.usage.total_tokens, Some(6));

    let query = sdk
        .create_embedding("embo-01", &["q".into()], &GenerationOptions::new().with("type", "query"))
        .await
        .expect("query embedding");
    assert_eq!(query.embeddings, vec![vec![1.0]]);
}

#[tokio::test]
async fn file_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/upload"))
        .and(query_param("GroupId", "g-42"))
        .and(body_string_contains("retrieval"))
        .and(body_string_contains("filename=\"kb.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file": {"file_id": 1_234_567, "bytes": 5, "created_at": 1_700_000_000, "filename": "kb.txt", "purpose": "retrieval"},
            "base_resp": ok()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/list"))
        .and(query_param("purpose", "retrieval"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{"file_id": 1_234_567, "bytes": 5, "filename": "kb.txt", "purpose": "retrieval"}],
            "base_resp": ok()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/retrieve"))
        .and(query_param("file_id", "1234567"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file": {"file_id": 1_234_567, "bytes": 5, "filename": "kb.txt", "purpose": "retrieval"},
            "base_resp": ok()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/delete"))
        .and(body_json(json!({"file_id": "1234567"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"base_resp": ok()})))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = client(&server, "abab6-chat").await;

    let uploaded = sdk
        .upload_file(FileUpload::new("kb.txt", b"hello".to_vec(), ""))
        .await
        .expect("upload");
    assert_eq!(uploaded.id, "1234567");
    assert_eq!(uploaded.filename, "kb.txt");

    let files = sdk.list_files(Some("retrieval")).await.expect("list");
    assert_eq!(files.len(), 1);

    let info = sdk.get_file_info("1234567").await.expect("info");
    assert_eq!(info.bytes, 5);

    let deleted = sdk.delete_file("1234567").await.expect("delete");
    assert_eq!(deleted.id, "1234567");
    assert!(deleted.deleted);
}

#[tokio::test]
async fn base_resp_failure_on_200_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text/chatcompletion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base_resp": {"status_code": 1002, "status_msg": "rate limit"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, "abab6-chat")
        .await
        .chat(vec![Message::user("hi")])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert_eq!(err.error_code(), Some("1002"));
}
