//! Request and response shaping for `/v1/messages`.

use super::{ALLOWED_OPTIONS, DEFAULT_MAX_TOKENS, PROVIDER_ID};
use crate::error::InvokeError;
use crate::types::{
    CanonicalResponse, Choice, ContentPart, GenerationOptions, ImageSource, Message,
    MessageContent, Usage,
};
use crate::utils::filter_options;
use serde_json::{Value, json};

fn content_to_anthropic(content: &MessageContent) -> Value {
    match content {
        MessageContent::Text(t) => Value::String(t.clone()),
        MessageContent::Parts(parts) => Value::Array(
            parts
                .iter()
                .map(|p| match p {
                    ContentPart::Text { text } => json!({"type": "text", "text": text}),
                    ContentPart::Image {
                        source: ImageSource::Base64 { media_type, data },
                    } => json!({
                        "type": "image",
                        "source": {"type": "base64", "media_type": media_type, "data": data}
                    }),
                    ContentPart::Image {
                        source: ImageSource::Path { path, .. },
                    } => json!({"type": "image", "source": {"type": "url", "url": path}}),
                })
                .collect(),
        ),
    }
}

/// Split `system` messages out of the conversation. Returns the joined
/// system text and the remaining messages in Anthropic shape.
pub(super) fn split_system(messages: &[Message]) -> (Option<String>, Vec<Value>) {
    let mut system = Vec::new();
    let mut rest = Vec::new();
    for m in messages {
        if m.role == "system" {
            system.push(m.text());
        } else {
            rest.push(json!({"role": m.role, "content": content_to_anthropic(&m.content)}));
        }
    }
    let system = (!system.is_empty()).then(|| system.join("\n"));
    (system, rest)
}

/// Body for `/v1/messages`. Images must already be inlined.
pub fn build_messages_body(
    model: &str,
    messages: &[Message],
    options: &GenerationOptions,
    stream: bool,
) -> Value {
    let (system, messages) = split_system(messages);
    let mut body = filter_options(PROVIDER_ID, options, ALLOWED_OPTIONS);
    if !body.contains_key("system")
        && let Some(system) = system
    {
        body.insert("system".into(), Value::String(system));
    }
    body.entry("max_tokens").or_insert(json!(DEFAULT_MAX_TOKENS));
    body.insert("model".into(), json!(model));
    body.insert("messages".into(), Value::Array(messages));
    if stream {
        body.insert("stream".into(), Value::Bool(true));
    }
    Value::Object(body)
}

pub(super) fn usage_of(value: Option<&Value>) -> Usage {
    Usage::from_json_fields(value, "input_tokens", "output_tokens", "total_tokens")
}

pub fn parse_messages_response(value: &Value, requested_model: &str) -> Result<CanonicalResponse, InvokeError> {
    let blocks = value
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| InvokeError::generic("response has no 'content' array"))?;
    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();
    let role = value.get("role").and_then(Value::as_str).unwrap_or("assistant");

    Ok(CanonicalResponse {
        id: value.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
        model: value
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(requested_model)
            .to_string(),
        created: None,
        choices: vec![Choice::new(
            0,
            Message::new(role, text),
            value.get("stop_reason").and_then(Value::as_str).map(str::to_string),
        )],
        usage: usage_of(value.get("usage")),
    })
}
