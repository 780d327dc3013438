use super::{ALLOWED_OPTIONS, CONTEXT_OPTIONS, DEFAULT_BASE_URL, EMBEDDING_OPTIONS, PROVIDER_ID};
use crate::error::InvokeError;
use crate::execution::http::HttpTransport;
use crate::execution::{ExecRequest, HttpExecutor};
use crate::standards::openai::{
    OpenAiChunkConverter, OpenAiCompatibleSpec, build_chat_body, parse_chat_response,
    to_openai_messages,
};
use crate::streaming::{ChunkStream, LineFraming, reassemble};
use crate::traits::{EmbeddingCapability, GenerationCapability, ProviderAdapter, ProviderCapabilities};
use crate::types::{
    CanonicalResponse, Credentials, EmbeddingResponse, GenerationOptions, Message, TokenCount, Usage,
};
use crate::utils::{filter_options, inline_images, join_url, validate_model, validate_request};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DoubaoAdapter {
    api_key: SecretString,
    base_url: String,
    executor: HttpExecutor,
}

impl DoubaoAdapter {
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

    fn post(&self, path: &str, body: Value) -> ExecRequest {
        ExecRequest::post_json(join_url(&self.base_url, path), body).bearer(self.api_key.expose_secret())
    }

    /// Create a cached context; returns the vendor object (carries `id`).
    pub async fn create_context(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Value, InvokeError> {
        validate_request(model, messages)?;
        let messages = inline_images(messages).await?;
        let mut body = filter_options(PROVIDER_ID, options, CONTEXT_OPTIONS);
        body.insert("model".into(), json!(model));
        body.insert("messages".into(), Value::Array(to_openai_messages(&messages)));
        self.executor
            .send_json(self.post("context/create", Value::Object(body)))
            .await
    }

    /// Chat against a context created by [`Self::create_context`].
    pub async fn generate_with_context(
        &self,
        model: &str,
        context_id: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        validate_request(model, messages)?;
        if context_id.is_empty() {
            return Err(InvokeError::invalid_parameter("context_id must not be empty"));
        }
        let mut body = build_chat_body(PROVIDER_ID, model, messages, options, ALLOWED_OPTIONS, false).await?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("context_id".into(), json!(context_id));
        }
        let raw = self
            .executor
            .send_json(self.post("context/chat/completions", body))
            .await?;
        parse_chat_response(&raw, model)
    }
}

#[async_trait]
impl GenerationCapability for DoubaoAdapter {
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        validate_request(model, messages)?;
        let body = build_chat_body(PROVIDER_ID, model, messages, options, ALLOWED_OPTIONS, false).await?;
        let raw = self.executor.send_json(self.post("chat/completions", body)).await?;
        parse_chat_response(&raw, model)
    }

    async fn stream_generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChunkStream, InvokeError> {
        validate_request(model, messages)?;
        let body = build_chat_body(PROVIDER_ID, model, messages, options, ALLOWED_OPTIONS, true).await?;
        let stream = self.executor.open_stream(self.post("chat/completions", body)).await?;
        Ok(reassemble(
            PROVIDER_ID,
            stream,
            LineFraming::ServerSentEvents,
            OpenAiChunkConverter::new(PROVIDER_ID, model),
        ))
    }

    /// Sum of `total_tokens` over the per-message tokenization results.
    async fn count_tokens(&self, model: &str, messages: &[Message]) -> Result<TokenCount, InvokeError> {
        validate_request(model, messages)?;
        let text: Vec<String> = messages.iter().map(Message::text).collect();
        let raw = self
            .executor
            .send_json(self.post("tokenization", json!({"model": model, "text": text})))
            .await?;
        let data = raw
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| InvokeError::generic("tokenization response has no data array"))?;
        let total: u64 = data
            .iter()
            .filter_map(|d| d.get("total_tokens").and_then(Value::as_u64))
            .sum();
        Ok(TokenCount::exact(u32::try_from(total).unwrap_or(u32::MAX)))
    }
}

#[async_trait]
impl EmbeddingCapability for DoubaoAdapter {
    async fn create_embedding(
        &self,
        model: &str,
        input: &[String],
        options: &GenerationOptions,
    ) -> Result<EmbeddingResponse, InvokeError> {
        validate_model(model)?;
        if input.is_empty() {
            return Err(InvokeError::invalid_parameter("input must not be empty"));
        }
        let mut body = filter_options(PROVIDER_ID, options, EMBEDDING_OPTIONS);
        body.insert("model".into(), json!(model));
        body.insert("input".into(), json!(input));
        let raw = self
            .executor
            .send_json(self.post("embeddings", Value::Object(body)))
            .await?;
        let embeddings = raw
            .get("data")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|d| d.get("embedding").and_then(EmbeddingResponse::vector_from_json))
                    .collect()
            })
            .unwrap_or_default();
        Ok(EmbeddingResponse {
            model: raw.get("model").and_then(Value::as_str).unwrap_or(model).to_string(),
            embeddings,
            usage: Usage::from_json_fields(raw.get("usage"), "prompt_tokens", "completion_tokens", "total_tokens"),
        })
    }
}

impl ProviderAdapter for DoubaoAdapter {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::generation()
            .with_vision()
            .with_exact_token_count()
            .with_embedding()
            .with_custom_feature("context_cache", true)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_embedding_capability(&self) -> Option<&dyn EmbeddingCapability> {
        Some(self)
    }
}
