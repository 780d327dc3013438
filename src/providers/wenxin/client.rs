use super::auth::fetch_access_token;
use super::{ALLOWED_OPTIONS, CHAT_PATH_PREFIX, DEFAULT_BASE_URL, MODEL_ENDPOINTS, PROVIDER_ID, endpoint_for};
use crate::error::{ErrorDetail, InvokeError};
use crate::execution::http::HttpTransport;
use crate::execution::{ExecRequest, HttpExecutor, ProviderSpec};
use crate::streaming::{ChunkStream, LineFraming, StreamEventConverter, reassemble};
use crate::traits::{
    GenerationCapability, ModelListingCapability, ProviderAdapter, ProviderCapabilities, find_model,
};
use crate::types::{
    CanonicalChunk, CanonicalResponse, Credentials, GenerationOptions, Message, ModelInfo,
    TokenCount, Usage,
};
use crate::utils::{estimate_tokens, filter_options, join_url, validate_request};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::sync::Arc;

/// Map a body `error_code` to an error.
pub fn wenxin_body_error(body: &Value) -> Option<InvokeError> {
    let code = body.get("error_code")?.as_i64()?;
    if code == 0 {
        return None;
    }
    let message = body
        .get("error_msg")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();
    let detail = ErrorDetail::new(message)
        .with_code(Some(code.to_string()))
        .with_details(json!({"provider": PROVIDER_ID, "response": body}));
    Some(match code {
        110 | 111 | 6 | 14 => InvokeError::Authorization(detail),
        4 | 17 | 18 | 336501 | 336502 => InvokeError::RateLimit {
            detail,
            retry_after: None,
        },
        3 => InvokeError::model_not_found(detail),
        1 | 2 | 336000 | 336100 => InvokeError::ServerUnavailable(detail),
        _ => InvokeError::BadRequest(detail),
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WenxinSpec;

impl ProviderSpec for WenxinSpec {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn classify_body_error(&self, body: &Value) -> Option<InvokeError> {
        wenxin_body_error(body)
    }
}

fn usage_of(value: &Value) -> Usage {
    Usage::from_json_fields(value.get("usage"), "prompt_tokens", "completion_tokens", "total_tokens")
}

fn finish_of(value: &Value) -> Option<String> {
    value
        .get("finish_reason")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| {
            value
                .get("is_end")
                .and_then(Value::as_bool)
                .filter(|end| *end)
                .map(|_| "stop".to_string())
        })
}

fn parse_response(value: &Value, model: &str) -> CanonicalResponse {
    let text = value.get("result").and_then(Value::as_str).unwrap_or_default();
    CanonicalResponse {
        usage: usage_of(value),
        ..CanonicalResponse::single(
            value.get("id").and_then(Value::as_str).unwrap_or_default(),
            model,
            text,
            finish_of(value),
        )
    }
    .with_created_unix(value.get("created").and_then(Value::as_i64))
}

/// Each SSE event carries one `result` sentence; `is_end` marks the last.
#[derive(Debug, Clone)]
pub struct WenxinEventConverter {
    model: String,
}

impl WenxinEventConverter {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

impl StreamEventConverter for WenxinEventConverter {
    fn convert(&mut self, event: Value) -> Result<Option<CanonicalChunk>, InvokeError> {
        if let Some(err) = wenxin_body_error(&event) {
            return Err(err);
        }
        let chunk = parse_response(&event, &self.model);
        let empty = chunk.text().is_none_or(|t| t.is_empty())
            && chunk.finish_reason().is_none()
            && chunk.usage.is_empty();
        Ok((!empty).then_some(chunk))
    }
}

#[derive(Debug, Clone)]
pub struct WenxinAdapter {
    access_token: SecretString,
    base_url: String,
    executor: HttpExecutor,
}

impl WenxinAdapter {
    /// Uses the `access_token` credential when present, otherwise exchanges
    /// `api_key` and `secret_key` for one.
    pub async fn new(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Result<Self, InvokeError> {
        let base_url = credentials.base_url_or(DEFAULT_BASE_URL);
        let executor = HttpExecutor::new(Arc::new(WenxinSpec), transport);
        let token = match credentials.access_token_value() {
            Some(token) => token,
            None => {
                let api_key = credentials.require_api_key(PROVIDER_ID)?;
                let secret_key = credentials.require_secret_key(PROVIDER_ID)?;
                fetch_access_token(&executor, &base_url, &api_key, &secret_key).await?
            }
        };
        tracing::info!(provider = PROVIDER_ID, base_url = %base_url, "adapter initialized");
        Ok(Self {
            access_token: SecretString::from(token),
            base_url,
            executor,
        })
    }

    fn chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> Result<ExecRequest, InvokeError> {
        validate_request(model, messages)?;
        let system: Vec<String> = messages
            .iter()
            .filter(|m| m.role == "system")
            .map(Message::text)
            .collect();
        let turns: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| json!({"role": m.role, "content": m.text()}))
            .collect();

        let mut body = filter_options(PROVIDER_ID, options, ALLOWED_OPTIONS);
        body.insert("messages".into(), Value::Array(turns));
        if !system.is_empty() {
            body.insert("system".into(), json!(system.join("\n")));
        }
        if stream {
            body.insert("stream".into(), Value::Bool(true));
        }
        let endpoint = urlencoding::encode(endpoint_for(model));
        let url = join_url(&self.base_url, &format!("{CHAT_PATH_PREFIX}{endpoint}"));
        Ok(ExecRequest::post_json(url, Value::Object(body))
            .query("access_token", self.access_token.expose_secret()))
    }
}

fn catalog() -> Vec<ModelInfo> {
    MODEL_ENDPOINTS
        .iter()
        .map(|(name, _)| ModelInfo::new(*name).with_name(*name).with_owner("baidu"))
        .collect()
}

#[async_trait]
impl GenerationCapability for WenxinAdapter {
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError> {
        let request = self.chat_request(model, messages, options, false)?;
        let raw = self.executor.send_json(request).await?;
        Ok(parse_response(&raw, model))
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
            WenxinEventConverter::new(model),
        ))
    }

    async fn count_tokens(&self, model: &str, messages: &[Message]) -> Result<TokenCount, InvokeError> {
        validate_request(model, messages)?;
        Ok(estimate_tokens(messages))
    }
}

/// Static: the platform has no listing endpoint for these models.
#[async_trait]
impl ModelListingCapability for WenxinAdapter {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, InvokeError> {
        Ok(catalog())
    }

    async fn get_model(&self, model_id: &str) -> Result<ModelInfo, InvokeError> {
        find_model(catalog(), model_id)
    }
}

impl ProviderAdapter for WenxinAdapter {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::generation().with_model_listing()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_model_listing_capability(&self) -> Option<&dyn ModelListingCapability> {
        Some(self)
    }
}
