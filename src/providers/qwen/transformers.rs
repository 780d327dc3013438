use super::{ALLOWED_OPTIONS, PROVIDER_ID};
use crate::error::{InvokeError, classify_event_error, extract_vendor_error, signals_missing_model};
use crate::execution::ProviderSpec;
use crate::streaming::StreamEventConverter;
use crate::types::{
    CanonicalChunk, CanonicalResponse, Choice, ContentPart, GenerationOptions, ImageSource,
    Message, MessageContent, Usage,
};
use crate::utils::{data_url, filter_options};
use reqwest::header::HeaderMap;
use serde_json::{Value, json};

/// DashScope reports a missing model as `InvalidParameter` with a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct QwenSpec;

impl ProviderSpec for QwenSpec {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn classify_http_error(
        &self,
        status: u16,
        body_text: &str,
        headers: &HeaderMap,
    ) -> Option<InvokeError> {
        if status != 400 {
            return None;
        }
        let message = serde_json::from_str::<Value>(body_text)
            .ok()
            .and_then(|body| extract_vendor_error(&body).0)?;
        if !signals_missing_model(&message) {
            return None;
        }
        let generic = crate::error::classify_http_error(PROVIDER_ID, status, body_text, headers);
        generic.detail().cloned().map(InvokeError::model_not_found)
    }

    fn classify_body_error(&self, body: &Value) -> Option<InvokeError> {
        body_error(body)
    }
}

/// A non-empty string `code` without `output` is a failure.
fn body_error(body: &Value) -> Option<InvokeError> {
    let code = body.get("code").and_then(Value::as_str)?;
    if code.is_empty() || body.get("output").is_some() {
        return None;
    }
    Some(classify_event_error(PROVIDER_ID, body))
}

fn multimodal_content(content: &MessageContent) -> Value {
    match content {
        MessageContent::Text(t) => json!([{"text": t}]),
        MessageContent::Parts(parts) => Value::Array(
            parts
                .iter()
                .map(|p| match p {
                    ContentPart::Text { text } => json!({"text": text}),
                    ContentPart::Image {
                        source: ImageSource::Base64 { media_type, data },
                    } => json!({"image": data_url(media_type, data)}),
                    ContentPart::Image {
                        source: ImageSource::Path { path, .. },
                    } => json!({"image": path}),
                })
                .collect(),
        ),
    }
}

/// Body for the generation endpoints. Images must already be inlined.
pub fn build_generation_body(
    model: &str,
    messages: &[Message],
    options: &GenerationOptions,
    multimodal: bool,
    stream: bool,
) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|m| {
            let content = if multimodal {
                multimodal_content(&m.content)
            } else {
                Value::String(m.text())
            };
            json!({"role": m.role, "content": content})
        })
        .collect();

    let mut parameters = filter_options(PROVIDER_ID, options, ALLOWED_OPTIONS);
    parameters.insert("result_format".into(), json!("message"));
    if stream {
        parameters.insert("incremental_output".into(), Value::Bool(true));
    }
    let mut input = json!({"messages": messages});
    if let Some(system) = options.get_str("system") {
        input["system"] = json!(system);
    }
    json!({"model": model, "input": input, "parameters": parameters})
}

/// `content` is a string on the text endpoint and a list of parts on the
/// multimodal one.
fn content_text(content: Option<&Value>) -> String {
    match content {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect(),
        _ => String::new(),
    }
}

fn choices_of(value: &Value) -> Vec<Choice> {
    value
        .pointer("/output/choices")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .enumerate()
                .map(|(i, c)| {
                    let msg = c.get("message").unwrap_or(&Value::Null);
                    Choice::new(
                        i as u32,
                        Message::new(
                            msg.get("role").and_then(Value::as_str).unwrap_or("assistant"),
                            content_text(msg.get("content")),
                        ),
                        c.get("finish_reason")
                            .and_then(Value::as_str)
                            .filter(|s| !s.is_empty() && *s != "null")
                            .map(str::to_string),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn canonical(value: &Value, model: &str, choices: Vec<Choice>) -> CanonicalResponse {
    CanonicalResponse {
        id: value.get("request_id").and_then(Value::as_str).unwrap_or_default().to_string(),
        model: model.to_string(),
        created: None,
        choices,
        usage: Usage::from_json_fields(value.get("usage"), "input_tokens", "output_tokens", "total_tokens"),
    }
}

pub fn parse_generation_response(value: &Value, requested_model: &str) -> Result<CanonicalResponse, InvokeError> {
    if value.get("output").is_none() {
        return Err(InvokeError::generic("response has no 'output' object"));
    }
    Ok(canonical(value, requested_model, choices_of(value)))
}

#[derive(Debug, Clone)]
pub struct QwenEventConverter {
    model: String,
}

impl QwenEventConverter {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

impl StreamEventConverter for QwenEventConverter {
    fn convert(&mut self, event: Value) -> Result<Option<CanonicalChunk>, InvokeError> {
        if let Some(err) = body_error(&event) {
            return Err(err);
        }
        let choices: Vec<Choice> = choices_of(&event)
            .into_iter()
            .filter(|c| !c.message.text().is_empty() || c.finish_reason.is_some())
            .collect();
        let chunk = canonical(&event, &self.model, choices);
        if chunk.choices.is_empty() && chunk.usage.is_empty() {
            return Ok(None);
        }
        Ok(Some(chunk))
    }
}
