use super::streaming::AnthropicEventConverter;
use super::transformers::{build_messages_body, parse_messages_response, split_system};
use super::{API_VERSION, BETA_OPTION, DEFAULT_BASE_URL, PROVIDER_ID};
use crate::error::InvokeError;
use crate::execution::http::HttpTransport;
use crate::execution::{BasicSpec, ExecRequest, HttpExecutor};
use crate::streaming::{ChunkStream, LineFraming, reassemble};
use crate::traits::{GenerationCapability, ModelListingCapability, ProviderAdapter, ProviderCapabilities};
use crate::types::{CanonicalResponse, Credentials, GenerationOptions, Message, ModelInfo, TokenCount};
use crate::utils::{inline_images, join_url, validate_request};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    api_key: SecretString,
    base_url: String,
    executor: HttpExecutor,
}

/// `anthropic-beta` value from the options bag, given as a string or a list.
fn beta_header(options: &GenerationOptions) -> Option<String> {
    match options.get(BETA_OPTION)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(",");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

fn model_from_json(value: &Value) -> ModelInfo {
    ModelInfo {
        id: value.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
        name: value.get("display_name").and_then(Value::as_str).map(str::to_string),
        owned_by: Some(PROVIDER_ID.to_string()),
        created: value
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.timestamp()),
        ..Default::default()
    }
}

impl AnthropicAdapter {
    pub fn new(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Result<Self, InvokeError> {
        let api_key = SecretString::from(credentials.require_api_key(PROVIDER_ID)?);
        let base_url = credentials.base_url_or(DEFAULT_BASE_URL);
        tracing::info!(provider = PROVIDER_ID, base_url = %base_url, "adapter initialized");
        Ok(Self {
            api_key,
            base_url,
            executor: HttpExecutor::new(Arc::new(BasicSpec(PROVIDER_ID)), transport),
        })
    }

    fn authed(&self, request: ExecRequest, options: Option<&GenerationOptions>) -> ExecRequest {
        let mut request = request
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION);
        if let Some(beta) = options.and_then(beta_header) {
            request = request.header("anthropic-beta", beta);
        }
        request
    }

    async fn messages_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> Result<ExecRequest, InvokeError> {
        validate_request(model, messages)?;
        let messages = inline_images(messages).await?;
        let body = build_messages_body(model, &messages, options, stream);
        Ok(self.authed(
            ExecRequest::post_json(join_url(&self.base_url, "v1/messages"), body),
            Some(options),
        ))
    }
}

#[async_trait]
impl GenerationCapability for AnthropicAdapter {
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        let request = self.messages_request(model, messages, options, false).await?;
        let raw = self.executor.send_json(request).await?;
        parse_messages_response(&raw, model)
    }

    async fn stream_generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChunkStream, InvokeError> {
        let request = self.messages_request(model, messages, options, true).await?;
        let body = self.executor.open_stream(request).await?;
        Ok(reassemble(
            PROVIDER_ID,
            body,
            LineFraming::ServerSentEvents,
            AnthropicEventConverter::new(model),
        ))
    }

    async fn count_tokens(&self, model: &str, messages: &[Message]) -> Result<TokenCount, InvokeError> {
        validate_request(model, messages)?;
        let messages = inline_images(messages).await?;
        let (system, messages) = split_system(&messages);
        let mut body = json!({"model": model, "messages": messages});
        if let Some(system) = system {
            body["system"] = Value::String(system);
        }
        let request = self.authed(
            ExecRequest::post_json(join_url(&self.base_url, "v1/messages/count_tokens"), body),
            None,
        );
        let raw = self.executor.send_json(request).await?;
        let tokens = raw
            .get("input_tokens")
            .and_then(Value::as_u64)
            .ok_or_else(|| InvokeError::generic("token count response has no input_tokens"))?;
        Ok(TokenCount::exact(u32::try_from(tokens).unwrap_or(u32::MAX)))
    }
}

#[async_trait]
impl ModelListingCapability for AnthropicAdapter {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, InvokeError> {
        let request = self.authed(ExecRequest::get(join_url(&self.base_url, "v1/models")), None);
        let raw = self.executor.send_json(request).await?;
        Ok(raw
            .get("data")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(model_from_json).collect())
            .unwrap_or_default())
    }

    async fn get_model(&self, model_id: &str) -> Result<ModelInfo, InvokeError> {
        let path = format!("v1/models/{}", urlencoding::encode(model_id));
        let request = self.authed(ExecRequest::get(join_url(&self.base_url, &path)), None);
        let raw = self.executor.send_json(request).await?;
        Ok(model_from_json(&raw))
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::generation()
            .with_vision()
            .with_exact_token_count()
            .with_model_listing()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_model_listing_capability(&self) -> Option<&dyn ModelListingCapability> {
        Some(self)
    }
}
