use crate::error::{InvokeError, classify_event_error};
use crate::streaming::StreamEventConverter;
use crate::types::{
    CanonicalChunk, CanonicalResponse, Choice, ContentPart, GenerationOptions, ImageSource,
    Message, MessageContent, Usage,
};
use crate::utils::{data_url, filter_options, inline_images};
use serde_json::{Value, json};

/// Messages in chat-completions shape. Images must already be inlined.
pub fn to_openai_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            let content = match &m.content {
                MessageContent::Text(t) => Value::String(t.clone()),
                MessageContent::Parts(parts) => Value::Array(
                    parts
                        .iter()
                        .map(|p| match p {
                            ContentPart::Text { text } => json!({"type": "text", "text": text}),
                            ContentPart::Image { source } => {
                                let url = match source {
                                    ImageSource::Base64 { media_type, data } => {
                                        data_url(media_type, data)
                                    }
                                    ImageSource::Path { path, .. } => path.clone(),
                                };
                                json!({"type": "image_url", "image_url": {"url": url}})
                            }
                        })
                        .collect(),
                ),
            };
            json!({"role": m.role, "content": content})
        })
        .collect()
}

/// Request body for `chat/completions`.
pub async fn build_chat_body(
    provider: &str,
    model: &str,
    messages: &[Message],
    options: &GenerationOptions,
    allowed: &[&str],
    stream: bool,
) -> Result<Value, InvokeError> {
    let messages = inline_images(messages).await?;
    let mut body = filter_options(provider, options, allowed);
    body.insert("model".into(), json!(model));
    body.insert("messages".into(), Value::Array(to_openai_messages(&messages)));
    if stream {
        body.insert("stream".into(), Value::Bool(true));
    }
    Ok(Value::Object(body))
}

fn usage_of(value: &Value) -> Usage {
    Usage::from_json_fields(
        value.get("usage"),
        "prompt_tokens",
        "completion_tokens",
        "total_tokens",
    )
}

/// Normalize a non-streaming chat-completions response.
pub fn parse_chat_response(value: &Value, requested_model: &str) -> Result<CanonicalResponse, InvokeError> {
    let choices = value
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| InvokeError::generic("response has no 'choices' array"))?;

    let choices = choices
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let msg = c.get("message").unwrap_or(&Value::Null);
            let role = msg.get("role").and_then(Value::as_str).unwrap_or("assistant");
            let text = msg.get("content").and_then(Value::as_str).unwrap_or_default();
            Choice::new(
                c.get("index").and_then(Value::as_u64).map(|n| u32::try_from(n).unwrap_or(u32::MAX)).unwrap_or(i as u32),
                Message::new(role, text),
                c.get("finish_reason").and_then(Value::as_str).map(str::to_string),
            )
        })
        .collect();

    Ok(CanonicalResponse {
        id: value.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
        model: value
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(requested_model)
            .to_string(),
        created: None,
        choices,
        usage: usage_of(value),
    }
    .with_created_unix(value.get("created").and_then(Value::as_i64)))
}

/// Converts `chat.completion.chunk` events into canonical chunks.
#[derive(Debug, Clone)]
pub struct OpenAiChunkConverter {
    provider: &'static str,
    model: String,
}

impl OpenAiChunkConverter {
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

impl StreamEventConverter for OpenAiChunkConverter {
    fn convert(&mut self, event: Value) -> Result<Option<CanonicalChunk>, InvokeError> {
        if event.get("error").is_some() {
            return Err(classify_event_error(self.provider, &event));
        }

        let choices: Vec<Choice> = event
            .get("choices")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .enumerate()
                    .filter_map(|(i, c)| {
                        let delta = c.get("delta")?;
                        let text = delta.get("content").and_then(Value::as_str).unwrap_or_default();
                        let finish = c.get("finish_reason").and_then(Value::as_str).map(str::to_string);
                        if text.is_empty() && finish.is_none() {
                            return None;
                        }
                        let role = delta.get("role").and_then(Value::as_str).unwrap_or("assistant");
                        Some(Choice::new(
                            c.get("index").and_then(Value::as_u64).map(|n| u32::try_from(n).unwrap_or(u32::MAX)).unwrap_or(i as u32),
                            Message::new(role, text),
                            finish,
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let usage = usage_of(&event);
        if choices.is_empty() && usage.is_empty() {
            return Ok(None);
        }

        Ok(Some(
            CanonicalChunk {
                id: event.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
                model: event
                    .get("model")
                    .and_then(Value::as_str)
                    .unwrap_or(self.model.as_str())
                    .to_string(),
                created: None,
                choices,
                usage,
            }
            .with_created_unix(event.get("created").and_then(Value::as_i64)),
        ))
    }
}
