use super::chat::{ChatEndpoint, MinimaxEventConverter, MinimaxSpec, build_chat_body, parse_chat_response};
use super::{DEFAULT_BASE_URL, DEFAULT_EMBEDDING_TYPE, PROVIDER_ID};
use crate::error::InvokeError;
use crate::execution::http::HttpTransport;
use crate::execution::{ExecRequest, HttpExecutor};
use crate::streaming::{ChunkStream, LineFraming, reassemble};
use crate::traits::{
    EmbeddingCapability, FileManagementCapability, GenerationCapability, ProviderAdapter,
    ProviderCapabilities,
};
use crate::types::{
    CanonicalResponse, Credentials, EmbeddingResponse, GenerationOptions, Message, TokenCount, Usage,
};
use crate::utils::{estimate_tokens, join_url, validate_model, validate_request};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct MinimaxAdapter {
    api_key: SecretString,
    group_id: String,
    base_url: String,
    pub(super) executor: HttpExecutor,
}

impl MinimaxAdapter {
    pub fn new(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Result<Self, InvokeError> {
        let api_key = SecretString::from(credentials.require_api_key(PROVIDER_ID)?);
        let group_id = credentials.require_group_id(PROVIDER_ID)?;
        let base_url = credentials.base_url_or(DEFAULT_BASE_URL);
        tracing::info!(provider = PROVIDER_ID, base_url = %base_url, "adapter initialized");
        Ok(Self {
            api_key,
            group_id,
            base_url,
            executor: HttpExecutor::new(Arc::new(MinimaxSpec), transport),
        })
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Bearer auth plus the `GroupId` query parameter.
    pub(super) fn authed(&self, request: ExecRequest) -> ExecRequest {
        request
            .bearer(self.api_key.expose_secret())
            .query("GroupId", self.group_id.clone())
    }

    pub(super) fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> Result<ExecRequest, InvokeError> {
        validate_request(model, messages)?;
        let endpoint = ChatEndpoint::for_model(model);
        let body = build_chat_body(endpoint, model, messages, options, stream);
        Ok(self.authed(ExecRequest::post_json(self.url(endpoint.path()), body)))
    }
}

#[async_trait]
impl GenerationCapability for MinimaxAdapter {
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        let request = self.chat_request(model, messages, options, false)?;
        let raw = self.executor.send_json(request).await?;
        Ok(parse_chat_response(&raw, model))
    }

    async fn stream_generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChunkStream, InvokeError> {
        let request = self.chat_request(model, messages, options, true)?;
        let body = self.executor.open_stream(request).await?;
        Ok(reassemble(
            PROVIDER_ID,
            body,
            LineFraming::ServerSentEvents,
            MinimaxEventConverter::new(model),
        ))
    }

    async fn count_tokens(&self, model: &str, messages: &[Message]) -> Result<TokenCount, InvokeError> {
        validate_request(model, messages)?;
        Ok(estimate_tokens(messages))
    }
}

#[async_trait]
impl EmbeddingCapability for MinimaxAdapter {
    /// `type` selects `db` (stored documents) or `query`; defaults to `db`.
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
        let kind = options.get_str("type").unwrap_or(DEFAULT_EMBEDDING_TYPE);
        let body = json!({"model": model, "texts": input, "type": kind});
        let raw = self
            .executor
            .send_json(self.authed(ExecRequest::post_json(self.url("embeddings"), body)))
            .await?;
        let embeddings = raw
            .get("vectors")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(EmbeddingResponse::vector_from_json).collect())
            .unwrap_or_default();
        Ok(EmbeddingResponse {
            model: model.to_string(),
            embeddings,
            usage: Usage::new(None, None, raw.get("total_tokens").and_then(Value::as_u64).map(|n| u32::try_from(n).unwrap_or(u32::MAX))),
        })
    }
}

impl ProviderAdapter for MinimaxAdapter {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::generation()
            .with_embedding()
            .with_file_management()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_embedding_capability(&self) -> Option<&dyn EmbeddingCapability> {
        Some(self)
    }

    fn as_file_management_capability(&self) -> Option<&dyn FileManagementCapability> {
        Some(self)
    }
}
