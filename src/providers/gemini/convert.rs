//! Conversion between canonical messages and `contents`/`parts`.

use super::{ALLOWED_OPTIONS, PROVIDER_ID};
use crate::error::{ErrorDetail, InvokeError, classify_event_error};
use crate::execution::ProviderSpec;
use crate::streaming::StreamEventConverter;
use crate::types::{
    CanonicalChunk, CanonicalResponse, Choice, ContentPart, GenerationOptions, ImageSource,
    Message, MessageContent, Usage,
};
use crate::utils::filter_options;
use reqwest::header::HeaderMap;
use serde_json::{Map, Value, json};

/// Option name to `generationConfig` field.
pub(crate) const GENERATION_CONFIG_KEYS: &[(&str, &str)] = &[
    ("temperature", "temperature"),
    ("top_p", "topP"),
    ("top_k", "topK"),
    ("max_tokens", "maxOutputTokens"),
    ("max_output_tokens", "maxOutputTokens"),
    ("stop", "stopSequences"),
    ("stop_sequences", "stopSequences"),
    ("candidate_count", "candidateCount"),
    ("response_mime_type", "responseMimeType"),
];

/// Option name to top-level request field.
pub(crate) const TOP_LEVEL_KEYS: &[(&str, &str)] = &[
    ("safety_settings", "safetySettings"),
    ("tools", "tools"),
    ("tool_config", "toolConfig"),
];

/// A 400 carrying `API_KEY_INVALID` is an authorization failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiSpec;

impl ProviderSpec for GeminiSpec {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn classify_http_error(
        &self,
        status: u16,
        body_text: &str,
        headers: &HeaderMap,
    ) -> Option<InvokeError> {
        if status != 400 || !body_text.contains("API_KEY_INVALID") {
            return None;
        }
        let generic = crate::error::classify_http_error(PROVIDER_ID, status, body_text, headers);
        generic.detail().cloned().map(InvokeError::Authorization)
    }
}

/// `models/{id}` resource path; fully qualified names pass through.
pub(crate) fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn part_to_gemini(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text { text } => json!({"text": text}),
        ContentPart::Image {
            source: ImageSource::Base64 { media_type, data },
        } => json!({"inline_data": {"mime_type": media_type, "data": data}}),
        ContentPart::Image {
            source: ImageSource::Path { path, media_type },
        } => json!({"file_data": {"file_uri": path, "mime_type": media_type}}),
    }
}

/// `(systemInstruction, contents)`. Images must already be inlined.
pub(crate) fn to_contents(messages: &[Message]) -> (Option<Value>, Vec<Value>) {
    let mut system = Vec::new();
    let mut contents = Vec::new();
    for m in messages {
        if m.role == "system" {
            system.push(json!({"text": m.text()}));
            continue;
        }
        let role = if m.role == "assistant" || m.role == "model" { "model" } else { "user" };
        let parts: Vec<Value> = match &m.content {
            MessageContent::Text(t) => vec![json!({"text": t})],
            MessageContent::Parts(parts) => parts.iter().map(part_to_gemini).collect(),
        };
        contents.push(json!({"role": role, "parts": parts}));
    }
    let system = (!system.is_empty()).then(|| json!({"parts": system}));
    (system, contents)
}

/// Body for `:generateContent` and `:streamGenerateContent`.
pub fn build_generate_body(messages: &[Message], options: &GenerationOptions) -> Value {
    let (system, contents) = to_contents(messages);
    let mut body = Map::new();
    body.insert("contents".into(), Value::Array(contents));
    if let Some(system) = system {
        body.insert("systemInstruction".into(), system);
    }

    let mut config = Map::new();
    for (key, value) in filter_options(PROVIDER_ID, options, ALLOWED_OPTIONS) {
        if let Some((_, field)) = GENERATION_CONFIG_KEYS.iter().find(|(k, _)| *k == key) {
            let value = match (*field, value) {
                ("stopSequences", Value::String(s)) => json!([s]),
                (_, v) => v,
            };
            config.insert((*field).to_string(), value);
        } else if let Some((_, field)) = TOP_LEVEL_KEYS.iter().find(|(k, _)| *k == key) {
            body.insert((*field).to_string(), value);
        }
    }
    if !config.is_empty() {
        body.insert("generationConfig".into(), Value::Object(config));
    }
    Value::Object(body)
}

fn usage_of(value: &Value) -> Usage {
    Usage::from_json_fields(
        value.get("usageMetadata"),
        "promptTokenCount",
        "candidatesTokenCount",
        "totalTokenCount",
    )
}

fn candidates_of(value: &Value) -> Vec<Choice> {
    value
        .get("candidates")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .enumerate()
                .map(|(i, c)| {
                    let text: String = c
                        .pointer("/content/parts")
                        .and_then(Value::as_array)
                        .map(|parts| {
                            parts
                                .iter()
                                .filter_map(|p| p.get("text").and_then(Value::as_str))
                                .collect()
                        })
                        .unwrap_or_default();
                    Choice::new(
                        c.get("index").and_then(Value::as_u64).map(|n| u32::try_from(n).unwrap_or(u32::MAX)).unwrap_or(i as u32),
                        Message::assistant(text),
                        c.get("finishReason").and_then(Value::as_str).map(str::to_string),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn blocked_prompt(value: &Value) -> Option<InvokeError> {
    let reason = value.pointer("/promptFeedback/blockReason")?.as_str()?;
    Some(InvokeError::BadRequest(
        ErrorDetail::new(format!("prompt blocked: {reason}"))
            .with_code(Some(reason.to_string()))
            .with_details(json!({"provider": PROVIDER_ID, "response": value})),
    ))
}

fn canonical(value: &Value, model: &str, choices: Vec<Choice>) -> CanonicalResponse {
    CanonicalResponse {
        id: value.get("responseId").and_then(Value::as_str).unwrap_or_default().to_string(),
        model: value
            .get("modelVersion")
            .and_then(Value::as_str)
            .unwrap_or(model)
            .to_string(),
        created: None,
        choices,
        usage: usage_of(value),
    }
}

pub fn parse_generate_response(value: &Value, requested_model: &str) -> Result<CanonicalResponse, InvokeError> {
    let choices = candidates_of(value);
    if choices.is_empty()
        && let Some(err) = blocked_prompt(value)
    {
        return Err(err);
    }
    Ok(canonical(value, requested_model, choices))
}

#[derive(Debug, Clone)]
pub struct GeminiEventConverter {
    model: String,
}

impl GeminiEventConverter {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

impl StreamEventConverter for GeminiEventConverter {
    fn convert(&mut self, event: Value) -> Result<Option<CanonicalChunk>, InvokeError> {
        if event.get("error").is_some() {
            return Err(classify_event_error(PROVIDER_ID, &event));
        }
        let choices: Vec<Choice> = candidates_of(&event)
            .into_iter()
            .filter(|c| !c.message.text().is_empty() || c.finish_reason.is_some())
            .collect();
        if choices.is_empty()
            && let Some(err) = blocked_prompt(&event)
        {
            return Err(err);
        }
        let chunk = canonical(&event, &self.model, choices);
        if chunk.choices.is_empty() && chunk.usage.is_empty() {
            return Ok(None);
        }
        Ok(Some(chunk))
    }
}
