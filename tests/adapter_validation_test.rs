//! Local validation and capability gating: nothing here may reach the wire

mod support;

use base64::Engine;
use onesdk::prelude::*;
use serde_json::json;
use std::sync::Arc;
use support::{SpyTransport, json_body};

const PROVIDERS: [&str; 8] = [
    "anthropic", "qwen", "kimi", "doubao", "baichuan", "minimax", "gemini", "wenxin",
];

fn all_credentials() -> Credentials {
    Credentials::new()
        .with_api_key("k")
        .with_group_id("g")
        .with_access_token("t")
}

async fn sdk(provider: &str, credentials: Credentials, spy: &Arc<SpyTransport>) -> OneSdk {
    OneSdk::builder()
        .provider(provider)
        .credentials(credentials)
        .transport(spy.clone())
        .build()
        .await
        .expect("build sdk")
}

#[tokio::test]
async fn empty_messages_and_model_fail_locally_everywhere() {
    for provider in PROVIDERS {
        let spy = SpyTransport::new();
        let adapter = sdk(provider, all_credentials(), &spy).await.adapter().clone();
        let options = GenerationOptions::new();

        let err = adapter.generate("some-model", &[], &options).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "{provider}");

        let err = adapter
            .generate(" ", &[Message::user("hi")], &options)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "{provider}");

        let err = adapter
            .stream_generate("some-model", &[], &options)
            .await
            .err()
            .expect("stream rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "{provider}");

        let err = adapter
            .generate("some-model", &[Message::new("", "hi")], &options)
            .await
            .unwrap_err();
        assert!(err.message().contains("role"), "{provider}: {err}");

        assert_eq!(spy.calls(), 0, "{provider} sent a request");
    }
}

#[tokio::test]
async fn facade_without_any_model_fails_locally() {
    let spy = SpyTransport::new();
    let sdk = sdk("qwen", all_credentials(), &spy).await;

    let err = sdk.chat(vec![Message::user("hi")]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert!(sdk.stream_generate_with_cancel(GenerationRequest::new(vec![Message::user("hi")])).is_err());
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn missing_capabilities_are_unsupported_operations() {
    let spy = SpyTransport::new();

    let wenxin = sdk("wenxin", all_credentials(), &spy).await;
    let err = wenxin
        .create_embedding("embedding-v1", &["x".to_string()], &GenerationOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    assert!(err.to_string().contains("wenxin"));

    let anthropic = sdk("anthropic", all_credentials(), &spy).await;
    let err = anthropic
        .upload_file(FileUpload::new("a.txt", b"abc".to_vec(), "assistants"))
        .await
        .unwrap_err();
    assert!(err.is_unsupported());
    assert!(err.to_string().contains("upload_file"));

    let qwen = sdk("qwen", all_credentials(), &spy).await;
    assert!(qwen.list_files(None).await.unwrap_err().is_unsupported());
    assert!(!qwen.supports("files"));

    let minimax = sdk("minimax", all_credentials(), &spy).await;
    let err = minimax.list_models().await.unwrap_err();
    assert!(err.to_string().contains("list_models"));
    let err = minimax.get_model_info("abab6.5s-chat").await.unwrap_err();
    assert!(err.is_unsupported());
    assert!(err.to_string().contains("get_model_info"), "{err}");

    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn capability_flags_match_the_vendor_matrix() {
    let spy = SpyTransport::new();
    let expectations = [
        ("anthropic", true, true, false, false),
        ("qwen", false, true, false, false),
        ("kimi", true, true, false, false),
        ("doubao", true, false, true, false),
        ("baichuan", false, false, true, true),
        ("minimax", false, false, true, true),
        ("gemini", true, true, true, false),
        ("wenxin", false, true, false, false),
    ];
    for (provider, exact, listing, embedding, files) in expectations {
        let sdk = sdk(provider, all_credentials(), &spy).await;
        let caps = sdk.capabilities();
        assert!(caps.generation && caps.streaming, "{provider}");
        assert_eq!(caps.exact_token_count, exact, "{provider}");
        assert_eq!(caps.model_listing, listing, "{provider}");
        assert_eq!(caps.embedding, embedding, "{provider}");
        assert_eq!(caps.file_management, files, "{provider}");
    }
    assert!(sdk("kimi", all_credentials(), &spy).await.supports("context_caching"));
}

#[tokio::test]
async fn path_images_are_inlined_as_base64() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat.png");
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];
    std::fs::write(&path, png).unwrap();

    let spy = SpyTransport::new();
    spy.reply_json(
        200,
        json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-haiku-20240307",
            "content": [{"type": "text", "text": "a cat"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 30, "output_tokens": 2}
        }),
    );
    let sdk = sdk("anthropic", all_credentials(), &spy).await;

    let message = Message::user_parts(vec![
        ContentPart::text("what is this?"),
        ContentPart::image_path(path.display().to_string()),
    ]);
    let request = GenerationRequest::new(vec![message]).with_model("claude-3-haiku-20240307");
    let response = sdk.generate(request).await.unwrap();
    assert_eq!(response.text().as_deref(), Some("a cat"));

    let body = json_body(&spy.last_request());
    let source = &body["messages"][0]["content"][1]["source"];
    assert_eq!(source["type"], "base64");
    assert_eq!(source["media_type"], "image/png");
    let expected = base64::engine::general_purpose::STANDARD.encode(png);
    assert_eq!(source["data"], expected.as_str());
}

#[tokio::test]
async fn unreadable_image_is_a_file_error() {
    let spy = SpyTransport::new();
    let sdk = sdk("anthropic", all_credentials(), &spy).await;

    let message = Message::user_parts(vec![
        ContentPart::text("what is this?"),
        ContentPart::image_path("/definitely/not/here.png"),
    ]);
    let err = sdk
        .generate(GenerationRequest::new(vec![message]).with_model("claude-3-haiku-20240307"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileIo);
    assert!(err.message().contains("/definitely/not/here.png"));
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn required_credentials_are_checked_at_construction() {
    let spy = SpyTransport::new();

    let err = OneSdk::builder()
        .provider("minimax")
        .api_key("k")
        .transport(spy.clone())
        .build()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert!(err.message().contains("group_id"));

    let err = OneSdk::builder()
        .provider("wenxin")
        .api_key("k")
        .transport(spy.clone())
        .build()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert!(err.message().contains("secret_key"));

    let err = OneSdk::builder()
        .provider("kimi")
        .transport(spy.clone())
        .build()
        .await
        .unwrap_err();
    assert!(err.message().contains("api_key"));

    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn unknown_provider_is_rejected() {
    let err = OneSdk::new("openai-classic", Credentials::new().with_api_key("k"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let err = OneSdk::builder().api_key("k").build().await.unwrap_err();
    assert!(err.message().contains("provider is required"));
}
