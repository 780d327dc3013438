use super::legacy::{BaichuanSpec, LegacyChunkConverter, parse_legacy_response};
use super::{ALLOWED_OPTIONS, ChatEndpoint, DEFAULT_BASE_URL, EMBEDDING_OPTIONS, PROVIDER_ID};
use crate::error::InvokeError;
use crate::execution::http::HttpTransport;
use crate::execution::{ExecRequest, HttpExecutor};
use crate::standards::openai::{OpenAiChunkConverter, build_chat_body, parse_chat_response};
use crate::streaming::{ChunkStream, LineFraming, reassemble};
use crate::traits::{
    EmbeddingCapability, FileManagementCapability, GenerationCapability, ProviderAdapter,
    ProviderCapabilities,
};
use crate::types::{
    CanonicalResponse, Credentials, EmbeddingResponse, GenerationOptions, Message, TokenCount, Usage,
};
use crate::utils::{estimate_tokens, filter_options, join_url, validate_model, validate_request};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::sync::Arc;

const REQUEST_ID_HEADER: &str = "x-bc-request-id";

#[derive(Debug, Clone)]
pub struct BaichuanAdapter {
    api_key: SecretString,
    base_url: String,
    pub(super) executor: HttpExecutor,
}

impl BaichuanAdapter {
    pub fn new(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Result<Self, InvokeError> {
        let api_key = SecretString::from(credentials.require_api_key(PROVIDER_ID)?);
        let base_url = credentials.base_url_or(DEFAULT_BASE_URL);
        tracing::info!(provider = PROVIDER_ID, base_url = %base_url, "adapter initialized");
        Ok(Self {
            api_key,
            base_url,
            executor: HttpExecutor::new(Arc::new(BaichuanSpec), transport),
        })
    }

    pub(super) fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub(super) fn authed(&self, request: ExecRequest) -> ExecRequest {
        request.bearer(self.api_key.expose_secret())
    }

    /// Legacy endpoints take text-only messages and nest options under
    /// `parameters`.
    fn legacy_body(&self, model: &str, messages: &[Message], options: &GenerationOptions) -> Value {
        let parameters = filter_options(PROVIDER_ID, options, ALLOWED_OPTIONS);
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.text()}))
            .collect();
        let mut body = json!({"model": model, "messages": messages});
        if !parameters.is_empty() {
            body["parameters"] = Value::Object(parameters);
        }
        body
    }

    async fn chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> Result<(ChatEndpoint, ExecRequest), InvokeError> {
        validate_request(model, messages)?;
        let endpoint = ChatEndpoint::for_model(model);
        let body = match endpoint {
            ChatEndpoint::OpenAiCompatible => {
                build_chat_body(PROVIDER_ID, model, messages, options, ALLOWED_OPTIONS, stream).await?
            }
            ChatEndpoint::Legacy => self.legacy_body(model, messages, options),
        };
        let request = self.authed(ExecRequest::post_json(self.url(endpoint.path(stream)), body));
        Ok((endpoint, request))
    }
}

#[async_trait]
impl GenerationCapability for BaichuanAdapter {
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        let (endpoint, request) = self.chat_request(model, messages, options, false).await?;
        let resp = self.executor.send(request).await?;
        let raw: Value = serde_json::from_slice(&resp.body)?;
        let raw = self.executor.check_body(raw)?;
        match endpoint {
            ChatEndpoint::OpenAiCompatible => parse_chat_response(&raw, model),
            ChatEndpoint::Legacy => {
                let request_id = resp
                    .headers
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok());
                Ok(parse_legacy_response(&raw, model, request_id))
            }
        }
    }

    async fn stream_generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChunkStream, InvokeError> {
        let (endpoint, request) = self.chat_request(model, messages, options, true).await?;
        let body = self.executor.open_stream(request).await?;
        Ok(match endpoint {
            ChatEndpoint::OpenAiCompatible => reassemble(
                PROVIDER_ID,
                body,
                LineFraming::ServerSentEvents,
                OpenAiChunkConverter::new(PROVIDER_ID, model),
            ),
            ChatEndpoint::Legacy => reassemble(
                PROVIDER_ID,
                body,
                LineFraming::JsonLines,
                LegacyChunkConverter::new(model),
            ),
        })
    }

    async fn count_tokens(&self, model: &str, messages: &[Message]) -> Result<TokenCount, InvokeError> {
        validate_request(model, messages)?;
        Ok(estimate_tokens(messages))
    }
}

#[async_trait]
impl EmbeddingCapability for BaichuanAdapter {
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
            .send_json(self.authed(ExecRequest::post_json(self.url("embeddings"), Value::Object(body))))
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

impl ProviderAdapter for BaichuanAdapter {
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
