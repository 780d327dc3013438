//! Kimi (Moonshot) Mock API Integration Tests

use onesdk::prelude::*;
use onesdk::providers::kimi::{CacheListQuery, KimiAdapter, KimiCacheRequest};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> OneSdk {
    OneSdk::builder()
        .provider("kimi")
        .api_key("sk-moon")
        .base_url(server.uri())
        .model("moonshot-v1-8k")
        .build()
        .await
        .expect("Failed to build client")
}

#[tokio::test]
async fn chat_completion_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-moon"))
        .and(body_partial_json(json!({"model": "moonshot-v1-8k", "max_tokens": 64})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cmpl-1",
            "object": "chat.completion",
            "created": 1_717_000_000,
            "model": "moonshot-v1-8k",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "你好"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 8, "completion_tokens": 2, "total_tokens": 10}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new(vec![Message::user("hi")]).with_option("max_tokens", 64);
    let response = client(&server).await.generate(request).await.expect("generate");

    assert_eq!(response.id, "cmpl-1");
    assert_eq!(response.text().as_deref(), Some("你好"));
    assert_eq!(response.usage.prompt_tokens, Some(8));
    assert!(response.created.is_some());
}

#[tokio::test]
async fn token_estimate_endpoint_is_exact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tokenizers/estimate-token-count"))
        .and(body_partial_json(json!({
            "model": "moonshot-v1-8k",
            "messages": [{"role": "user", "content": "hello kimi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"total_tokens": 11}})))
        .expect(1)
        .mount(&server)
        .await;

    let count = client(&server)
        .await
        .count_tokens(None, &[Message::user("hello kimi")])
        .await
        .expect("count");
    assert_eq!(count, TokenCount::exact(11));
}

#[tokio::test]
async fn oversized_token_estimate_saturates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tokenizers/estimate-token-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"total_tokens": 4_294_967_298_u64}})))
        .mount(&server)
        .await;

    let count = client(&server)
        .await
        .count_tokens(None, &[Message::user("hello kimi")])
        .await
        .expect("count");
    assert_eq!(count, TokenCount::exact(u32::MAX));
}

#[tokio::test]
async fn models_and_model_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"id": "moonshot-v1-8k", "object": "model", "created": 1_711_000_000, "owned_by": "moonshot"},
                {"id": "moonshot-v1-128k", "object": "model", "created": 1_711_000_000, "owned_by": "moonshot"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models/moonshot-v1-128k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "moonshot-v1-128k", "object": "model", "owned_by": "moonshot"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = client(&server).await;
    let models = sdk.list_models().await.expect("models");
    let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["moonshot-v1-8k", "moonshot-v1-128k"]);
    assert_eq!(models[0].owned_by.as_deref(), Some("moonshot"));

    let info = sdk.get_model_info("moonshot-v1-128k").await.expect("info");
    assert_eq!(info.id, "moonshot-v1-128k");
}

#[tokio::test]
async fn context_cache_create_and_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/caching"))
        .and(body_json(json!({
            "model": "moonshot-v1",
            "messages": [{"role": "system", "content": "long document"}],
            "name": "doc",
            "ttl": 300
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cache-abc",
            "status": "pending",
            "object": "context_cache.object"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/caching"))
        .and(query_param("limit", "5"))
        .and(query_param("order", "desc"))
        .and(query_param("metadata[project]", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"id": "cache-abc", "status": "ready"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = client(&server).await;
    let kimi = sdk.downcast_adapter::<KimiAdapter>().expect("kimi adapter");

    let created = kimi
        .create_cache(KimiCacheRequest {
            model: "moonshot-v1".into(),
            messages: vec![Message::system("long document")],
            name: Some("doc".into()),
            ttl: Some(300),
            ..Default::default()
        })
        .await
        .expect("create cache");
    assert_eq!(created["id"], "cache-abc");

    let mut query = CacheListQuery {
        limit: 5,
        ..Default::default()
    };
    query.metadata.insert("project".into(), "demo".into());
    let listed = kimi.list_caches(&query).await.expect("list caches");
    assert_eq!(listed["data"][0]["status"], "ready");
}

#[tokio::test]
async fn cache_tags_point_at_caches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/caching/refs/tags"))
        .and(body_json(json!({"tag": "contract", "cache_id": "cache-abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag": "contract", "cache_id": "cache-abc", "object": "cache_object.tag"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/caching/refs/tags/contract/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cache-abc", "status": "ready", "tokens": 1200
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/caching/refs/tags/contract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = client(&server).await;
    let kimi = sdk.downcast_adapter::<KimiAdapter>().expect("kimi adapter");

    let tag = kimi.create_tag("contract", "cache-abc").await.expect("create tag");
    assert_eq!(tag["cache_id"], "cache-abc");
    let content = kimi.get_tag_content("contract").await.expect("tag content");
    assert_eq!(content["tokens"], 1200);
    let deleted = kimi.delete_tag("contract").await.expect("delete tag");
    assert_eq!(deleted["deleted"], true);
}
