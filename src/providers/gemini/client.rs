use super::convert::{
    GeminiEventConverter, GeminiSpec, build_generate_body, model_path, parse_generate_response,
    to_contents,
};
use super::{DEFAULT_BASE_URL, EMBEDDING_OPTIONS, PROVIDER_ID};
use crate::error::InvokeError;
use crate::execution::http::HttpTransport;
use crate::execution::{ExecRequest, HttpExecutor};
use crate::streaming::{ChunkStream, LineFraming, reassemble};
use crate::traits::{
    EmbeddingCapability, GenerationCapability, ModelListingCapability, ProviderAdapter,
    ProviderCapabilities,
};
use crate::types::{
    CanonicalResponse, Credentials, EmbeddingResponse, GenerationOptions, Message, ModelInfo,
    TokenCount,
};
use crate::utils::{filter_options, inline_images, join_url, validate_model, validate_request};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    api_key: SecretString,
    base_url: String,
    executor: HttpExecutor,
}

/// Embedding options use snake_case names; the API wants camelCase.
fn embedding_field(option: &str) -> &str {
    match option {
        "task_type" => "taskType",
        "output_dimensionality" => "outputDimensionality",
        other => other,
    }
}

fn model_from_json(value: &Value) -> ModelInfo {
    let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
    let as_u32 = |k: &str| value.get(k).and_then(Value::as_u64).map(|n| u32::try_from(n).unwrap_or(u32::MAX));
    ModelInfo {
        id: name.strip_prefix("models/").unwrap_or(name).to_string(),
        name: value.get("displayName").and_then(Value::as_str).map(str::to_string),
        description: value.get("description").and_then(Value::as_str).map(str::to_string),
        owned_by: Some("google".to_string()),
        created: None,
        context_window: as_u32("inputTokenLimit"),
        max_output_tokens: as_u32("outputTokenLimit"),
    }
}

impl GeminiAdapter {
    pub fn new(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Result<Self, InvokeError> {
        let api_key = SecretString::from(credentials.require_api_key(PROVIDER_ID)?);
        let base_url = credentials.base_url_or(DEFAULT_BASE_URL);
        tracing::info!(provider = PROVIDER_ID, base_url = %base_url, "adapter initialized");
        Ok(Self {
            api_key,
            base_url,
            executor: HttpExecutor::new(Arc::new(GeminiSpec), transport),
        })
    }

    fn keyed(&self, request: ExecRequest) -> ExecRequest {
        request.query("key", self.api_key.expose_secret())
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        join_url(&self.base_url, &format!("{}:{method}", model_path(model)))
    }

    async fn generate_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> Result<ExecRequest, InvokeError> {
        validate_request(model, messages)?;
        let messages = inline_images(messages).await?;
        let body = build_generate_body(&messages, options);
        let request = if stream {
            ExecRequest::post_json(self.model_url(model, "streamGenerateContent"), body).query("alt", "sse")
        } else {
            ExecRequest::post_json(self.model_url(model, "generateContent"), body)
        };
        Ok(self.keyed(request))
    }
}

#[async_trait]
impl GenerationCapability for GeminiAdapter {
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        let request = self.generate_request(model, messages, options, false).await?;
        let raw = self.executor.send_json(request).await?;
        parse_generate_response(&raw, model)
    }

    async fn stream_generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChunkStream, InvokeError> {
        let request = self.generate_request(model, messages, options, true).await?;
        let body = self.executor.open_stream(request).await?;
        Ok(reassemble(
            PROVIDER_ID,
            body,
            LineFraming::ServerSentEvents,
            GeminiEventConverter::new(model),
        ))
    }

    async fn count_tokens(&self, model: &str, messages: &[Message]) -> Result<TokenCount, InvokeError> {
        validate_request(model, messages)?;
        let messages = inline_images(messages).await?;
        let (_, contents) = to_contents(&messages);
        let request = self.keyed(ExecRequest::post_json(
            self.model_url(model, "countTokens"),
            json!({"contents": contents}),
        ));
        let raw = self.executor.send_json(request).await?;
        let tokens = raw
            .get("totalTokens")
            .and_then(Value::as_u64)
            .ok_or_else(|| InvokeError::generic("token count response has no totalTokens"))?;
        Ok(TokenCount::exact(u32::try_from(tokens).unwrap_or(u32::MAX)))
    }
}

#[async_trait]
impl ModelListingCapability for GeminiAdapter {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, InvokeError> {
        let request = self.keyed(ExecRequest::get(join_url(&self.base_url, "models")));
        let raw = self.executor.send_json(request).await?;
        Ok(raw
            .get("models")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(model_from_json).collect())
            .unwrap_or_default())
    }

    async fn get_model(&self, model_id: &str) -> Result<ModelInfo, InvokeError> {
        let request = self.keyed(ExecRequest::get(join_url(&self.base_url, &model_path(model_id))));
        let raw = self.executor.send_json(request).await?;
        Ok(model_from_json(&raw))
    }
}

#[async_trait]
impl EmbeddingCapability for GeminiAdapter {
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
        let extra = filter_options(PROVIDER_ID, options, EMBEDDING_OPTIONS);
        let requests: Vec<Value> = input
            .iter()
            .map(|text| {
                let mut entry = json!({
                    "model": model_path(model),
                    "content": {"parts": [{"text": text}]},
                });
                for (k, v) in &extra {
                    entry[embedding_field(k)] = v.clone();
                }
                entry
            })
            .collect();
        let request = self.keyed(ExecRequest::post_json(
            self.model_url(model, "batchEmbedContents"),
            json!({"requests": requests}),
        ));
        let raw = self.executor.send_json(request).await?;
        let embeddings = raw
            .get("embeddings")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|e| e.get("values").and_then(EmbeddingResponse::vector_from_json))
                    .collect()
            })
            .unwrap_or_default();
        Ok(EmbeddingResponse::new(model, embeddings))
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::generation()
            .with_vision()
            .with_exact_token_count()
            .with_model_listing()
            .with_embedding()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_model_listing_capability(&self) -> Option<&dyn ModelListingCapability> {
        Some(self)
    }

    fn as_embedding_capability(&self) -> Option<&dyn EmbeddingCapability> {
        Some(self)
    }
}
