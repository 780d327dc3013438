//! Qwen (DashScope) Mock API Integration Tests

use onesdk::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer, model: &str) -> OneSdk {
    OneSdk::builder()
        .provider("qwen")
        .api_key("sk-dash")
        .base_url(server.uri())
        .model(model)
        .build()
        .await
        .expect("Failed to build client")
}

#[tokio::test]
async fn text_models_use_the_text_generation_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-generation/generation"))
        .and(header("authorization", "Bearer sk-dash"))
        .and(body_partial_json(json!({
            "model": "qwen-turbo",
            "input": {"messages": [{"role": "user", "content": "你好"}]},
            "parameters": {"result_format": "message", "temperature": 0.3}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"choices": [{"finish_reason": "stop", "message": {"role": "assistant", "content": "你好！"}}]},
            "usage": {"input_tokens": 3, "output_tokens": 2, "total_tokens": 5},
            "request_id": "req-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new(vec![Message::user("你好")]).with_option("temperature", 0.3);
    let response = client(&server, "qwen-turbo").await.generate(request).await.expect("generate");

    assert_eq!(response.id, "req-1");
    assert_eq!(response.text().as_deref(), Some("你好！"));
    assert_eq!(response.usage.total_tokens, Some(5));
}

#[tokio::test]
async fn vision_models_use_the_multimodal_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multimodal-generation/generation"))
        .and(body_partial_json(json!({
            "model": "qwen-vl-plus",
            "input": {"messages": [{
                "role": "user",
                "content": [{"text": "描述这张图"}, {"image": "data:image/png;base64,iVBORw0K"}]
            }]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"choices": [{
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": [{"text": "一只猫"}]}
            }]},
            "usage": {"input_tokens": 1200, "output_tokens": 3},
            "request_id": "req-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::user_parts(vec![
        ContentPart::text("描述这张图"),
        ContentPart::image_base64("image/png", "iVBORw0K"),
    ]);
    let response = client(&server, "qwen-vl-plus").await.chat(vec![message]).await.expect("chat");

    assert_eq!(response.text().as_deref(), Some("一只猫"));
    assert_eq!(response.usage.total_tokens, Some(1203));
}

#[tokio::test]
async fn quota_code_in_body_is_a_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-generation/generation"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "code": "Throttling.RateQuota",
            "message": "Requests rate limit exceeded, please try again later.",
            "request_id": "req-3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, "qwen-turbo")
        .await
        .chat(vec![Message::user("hi")])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert_eq!(err.error_code(), Some("Throttling.RateQuota"));
}

#[tokio::test]
async fn catalog_listing_needs_no_request() {
    let server = MockServer::start().await;
    let sdk = client(&server, "qwen-turbo").await;

    let models = sdk.list_models().await.expect("models");
    assert!(models.iter().any(|m| m.id == "qwen-max"));
    let info = sdk.get_model_info("qwen-vl-plus").await.expect("info");
    assert_eq!(info.name.as_deref(), Some("Qwen-VL-Plus"));
    assert_eq!(sdk.get_model_info("qwen-9").await.unwrap_err().kind(), ErrorKind::ModelNotFound);

    assert!(server.received_requests().await.unwrap().is_empty());
}
