use super::transformers::{QwenEventConverter, QwenSpec, build_generation_body, parse_generation_response};
use super::{
    DEFAULT_BASE_URL, MODEL_CATALOG, MULTIMODAL_GENERATION_PATH, PROVIDER_ID, TEXT_GENERATION_PATH,
    is_multimodal,
};
use crate::error::InvokeError;
use crate::execution::http::HttpTransport;
use crate::execution::{ExecRequest, HttpExecutor};
use crate::streaming::{ChunkStream, LineFraming, reassemble};
use crate::traits::{
    GenerationCapability, ModelListingCapability, ProviderAdapter, ProviderCapabilities, find_model,
};
use crate::types::{CanonicalResponse, Credentials, GenerationOptions, Message, ModelInfo, TokenCount};
use crate::utils::{estimate_tokens, inline_images, join_url, validate_request};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct QwenAdapter {
    api_key: SecretString,
    base_url: String,
    executor: HttpExecutor,
}

impl QwenAdapter {
    pub fn new(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Result<Self, InvokeError> {
        let api_key = SecretString::from(credentials.require_api_key(PROVIDER_ID)?);
        let base_url = credentials.base_url_or(DEFAULT_BASE_URL);
        tracing::info!(provider = PROVIDER_ID, base_url = %base_url, "adapter initialized");
        Ok(Self {
            api_key,
            base_url,
            executor: HttpExecutor::new(Arc::new(QwenSpec), transport),
        })
    }

    async fn generation_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> Result<ExecRequest, InvokeError> {
        validate_request(model, messages)?;
        let multimodal = is_multimodal(model);
        let messages = inline_images(messages).await?;
        let body = build_generation_body(model, &messages, options, multimodal, stream);
        let path = if multimodal {
            MULTIMODAL_GENERATION_PATH
        } else {
            TEXT_GENERATION_PATH
        };
        let mut request = ExecRequest::post_json(join_url(&self.base_url, path), body)
            .bearer(self.api_key.expose_secret());
        if stream {
            request = request.header("X-DashScope-SSE", "enable");
        }
        Ok(request)
    }
}

fn catalog() -> Vec<ModelInfo> {
    MODEL_CATALOG
        .iter()
        .map(|(id, name)| ModelInfo::new(*id).with_name(*name).with_owner("alibaba"))
        .collect()
}

#[async_trait]
impl GenerationCapability for QwenAdapter {
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        let request = self.generation_request(model, messages, options, false).await?;
        let raw = self.executor.send_json(request).await?;
        parse_generation_response(&raw, model)
    }

    async fn stream_generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChunkStream, InvokeError> {
        let request = self.generation_request(model, messages, options, true).await?;
        let body = self.executor.open_stream(request).await?;
        Ok(reassemble(
            PROVIDER_ID,
            body,
            LineFraming::ServerSentEvents,
            QwenEventConverter::new(model),
        ))
    }

    async fn count_tokens(&self, model: &str, messages: &[Message]) -> Result<TokenCount, InvokeError> {
        validate_request(model, messages)?;
        Ok(estimate_tokens(messages))
    }
}

#[async_trait]
impl ModelListingCapability for QwenAdapter {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, InvokeError> {
        Ok(catalog())
    }

    async fn get_model(&self, model_id: &str) -> Result<ModelInfo, InvokeError> {
        find_model(catalog(), model_id)
    }
}

impl ProviderAdapter for QwenAdapter {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::generation()
            .with_vision()
            .with_model_listing()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_model_listing_capability(&self) -> Option<&dyn ModelListingCapability> {
        Some(self)
    }
}
