//! Wenxin (ERNIE) Mock API Integration Tests

use onesdk::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials(server: &MockServer) -> Credentials {
    Credentials::new()
        .with_api_key("ak")
        .with_secret_key("sk")
        .with_base_url(server.uri())
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/oauth/2.0/token"))
        .and(query_param("grant_type", "client_credentials"))
        .and(query_param("client_id", "ak"))
        .and(query_param("client_secret", "sk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "24.abc",
            "expires_in": 2_592_000
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn token_is_fetched_once_then_used_for_chat() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/completions_pro"))
        .and(query_param("access_token", "24.abc"))
        .and(body_partial_json(json!({
            "system": "你是助手",
            "messages": [{"role": "user", "content": "你好"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "as-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "result": "你好，有什么可以帮你？",
            "is_end": true,
            "usage": {"prompt_tokens": 4, "completion_tokens": 8, "total_tokens": 12}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let sdk = OneSdk::builder()
        .provider("wenxin")
        .credentials(credentials(&server))
        .model("ERNIE-4.0-8K")
        .build()
        .await
        .expect("Failed to build client");

    for _ in 0..2 {
        let response = sdk
            .chat(vec![Message::system("你是助手"), Message::user("你好")])
            .await
            .expect("chat");
        assert_eq!(response.id, "as-1");
        assert_eq!(response.text().as_deref(), Some("你好，有什么可以帮你？"));
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.total_tokens, Some(12));
    }
}

#[tokio::test]
async fn rejected_key_pair_fails_construction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "unknown client id"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = OneSdk::new("wenxin", credentials(&server)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[tokio::test]
async fn unknown_model_names_are_used_as_endpoint_slugs() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/my-custom-endpoint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "as-2",
            "result": "ok",
            "is_end": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = OneSdk::new("wenxin", credentials(&server)).await.expect("sdk");
    let response = sdk
        .generate(GenerationRequest::new(vec![Message::user("hi")]).with_model("my-custom-endpoint"))
        .await
        .expect("generate");
    assert_eq!(response.text().as_deref(), Some("ok"));
}
