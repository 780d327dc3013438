//! Baichuan Mock API Integration Tests

use onesdk::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer, model: &str) -> OneSdk {
    OneSdk::builder()
        .provider("baichuan")
        .api_key("sk-bc")
        .base_url(server.uri())
        .model(model)
        .build()
        .await
        .expect("Failed to build client")
}

#[tokio::test]
async fn legacy_chat_uses_request_id_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("authorization", "Bearer sk-bc"))
        .and(body_partial_json(json!({
            "model": "Baichuan-53B",
            "parameters": {"temperature": 0.2}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-bc-request-id", "bc-req-9")
                .set_body_json(json!({
                    "code": 0,
                    "msg": "success",
                    "data": {"messages": [{"role": "assistant", "content": "你好", "finish_reason": "stop"}]},
                    "usage": {"prompt_tokens": 4, "answer_tokens": 2, "total_tokens": 6}
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new(vec![Message::user("hi")]).with_option("temperature", 0.2);
    let response = client(&server, "Baichuan-53B").await.generate(request).await.expect("generate");

    assert_eq!(response.id, "bc-req-9");
    assert_eq!(response.text().as_deref(), Some("你好"));
    assert_eq!(response.usage.completion_tokens, Some(2));
    assert_eq!(response.usage.total_tokens, Some(6));
}

#[tokio::test]
async fn baichuan2_models_use_chat_completions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "Baichuan2-Turbo"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-bc",
            "model": "Baichuan2-Turbo",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, "Baichuan2-Turbo")
        .await
        .chat(vec![Message::user("hi")])
        .await
        .expect("chat");
    assert_eq!(response.id, "chatcmpl-bc");
}

#[tokio::test]
async fn file_upload_is_multipart_with_default_purpose() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .and(header("authorization", "Bearer sk-bc"))
        .and(body_string_contains("name=\"purpose\""))
        .and(body_string_contains("knowledge-base"))
        .and(body_string_contains("filename=\"notes.txt\""))
        .and(body_string_contains("meeting notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "file-bc-1",
            "object": "file",
            "bytes": 13,
            "created_at": 1_700_000_000,
            "filename": "notes.txt",
            "purpose": "knowledge-base"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload = FileUpload::new("notes.txt", b"meeting notes".to_vec(), "");
    let file = client(&server, "Baichuan2-Turbo")
        .await
        .upload_file(upload)
        .await
        .expect("upload");

    assert_eq!(file.id, "file-bc-1");
    assert_eq!(file.bytes, 13);
    assert_eq!(file.purpose, "knowledge-base");
    assert!(file.created_at.is_some());

    let received = &server.received_requests().await.unwrap()[0];
    let content_type = received.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn file_listing_filters_by_purpose_and_deletes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"id": "file-1", "filename": "a.txt", "bytes": 1, "purpose": "knowledge-base"},
                {"id": "file-2", "filename": "b.jsonl", "bytes": 2, "purpose": "fine-tune"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/files/file-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "file-1", "object": "file", "deleted": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/file-2/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{\"prompt\":1}\n".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = client(&server, "Baichuan2-Turbo").await;
    let files = sdk.list_files(Some("knowledge-base")).await.expect("list");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "a.txt");

    let deleted = sdk.delete_file("file-1").await.expect("delete");
    assert!(deleted.deleted);

    let content = sdk.get_file_content("file-2").await.expect("content");
    assert_eq!(content, b"{\"prompt\":1}\n");
}
