use super::{ALLOWED_OPTIONS, DEFAULT_BASE_URL, PROVIDER_ID};
use crate::error::InvokeError;
use crate::execution::http::HttpTransport;
use crate::execution::{ExecRequest, HttpExecutor};
use crate::standards::openai::{
    OpenAiChunkConverter, OpenAiCompatibleSpec, build_chat_body, parse_chat_response,
    to_openai_messages,
};
use crate::streaming::{ChunkStream, LineFraming, reassemble};
use crate::traits::{GenerationCapability, ModelListingCapability, ProviderAdapter, ProviderCapabilities};
use crate::types::{
    CanonicalResponse, Credentials, GenerationOptions, Message, ModelInfo, TokenCount,
};
use crate::utils::{inline_images, join_url, validate_request};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct KimiAdapter {
    api_key: SecretString,
    base_url: String,
    pub(super) executor: HttpExecutor,
}

impl KimiAdapter {
    pub fn new(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Result<Self, InvokeError> {
        let api_key = SecretString::from(credentials.require_api_key(PROVIDER_ID)?);
        let base_url = credentials.base_url_or(DEFAULT_BASE_URL);
        tracing::info!(provider = PROVIDER_ID, base_url = %base_url, "adapter initialized");
        Ok(Self {
            api_key,
            base_url,
            executor: HttpExecutor::new(Arc::new(OpenAiCompatibleSpec(PROVIDER_ID)), transport),
        })
    }

    pub(super) fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub(super) fn authed(&self, request: ExecRequest) -> ExecRequest {
        request.bearer(self.api_key.expose_secret())
    }

    async fn chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> Result<ExecRequest, InvokeError> {
        validate_request(model, messages)?;
        let body = build_chat_body(PROVIDER_ID, model, messages, options, ALLOWED_OPTIONS, stream).await?;
        Ok(self.authed(ExecRequest::post_json(self.url("chat/completions"), body)))
    }
}

fn model_from_json(value: &Value) -> ModelInfo {
    ModelInfo {
        id: value.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
        owned_by: value.get("owned_by").and_then(Value::as_str).map(str::to_string),
        created: value.get("created").and_then(Value::as_i64),
        ..Default::default()
    }
}

#[async_trait]
impl GenerationCapability for KimiAdapter {
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        let request = self.chat_request(model, messages, options, false).await?;
        let raw = self.executor.send_json(request).await?;
        parse_chat_response(&raw, model)
    }

    async fn stream_generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChunkStream, InvokeError> {
        let request = self.chat_request(model, messages, options, true).await?;
        let body = self.executor.open_stream(request).await?;
        Ok(reassemble(
            PROVIDER_ID,
            body,
            LineFraming::ServerSentEvents,
            OpenAiChunkConverter::new(PROVIDER_ID, model),
        ))
    }

    async fn count_tokens(&self, model: &str, messages: &[Message]) -> Result<TokenCount, InvokeError> {
        validate_request(model, messages)?;
        let messages = inline_images(messages).await?;
        let body = json!({"model": model, "messages": to_openai_messages(&messages)});
        let request = self.authed(ExecRequest::post_json(
            self.url("tokenizers/estimate-token-count"),
            body,
        ));
        let raw = self.executor.send_json(request).await?;
        let tokens = raw
            .pointer("/data/total_tokens")
            .and_then(Value::as_u64)
            .ok_or_else(|| InvokeError::generic("token count response has no data.total_tokens"))?;
        Ok(TokenCount::exact(u32::try_from(tokens).unwrap_or(u32::MAX)))
    }
}

#[async_trait]
impl ModelListingCapability for KimiAdapter {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, InvokeError> {
        let raw = self
            .executor
            .send_json(self.authed(ExecRequest::get(self.url("models"))))
            .await?;
        Ok(raw
            .get("data")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(model_from_json).collect())
            .unwrap_or_default())
    }

    async fn get_model(&self, model_id: &str) -> Result<ModelInfo, InvokeError> {
        let path = format!("models/{}", urlencoding::encode(model_id));
        let raw = self
            .executor
            .send_json(self.authed(ExecRequest::get(self.url(&path))))
            .await?;
        Ok(model_from_json(&raw))
    }
}

impl ProviderAdapter for KimiAdapter {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::generation()
            .with_vision()
            .with_exact_token_count()
            .with_model_listing()
            .with_custom_feature("context_caching", true)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_model_listing_capability(&self) -> Option<&dyn ModelListingCapability> {
        Some(self)
    }
}
