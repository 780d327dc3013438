//! Chat payloads, response parsing and `base_resp` error codes.

use super::{ALLOWED_OPTIONS, DEFAULT_BOT_NAME, DEFAULT_USER_NAME, PROVIDER_ID};
use crate::error::{ErrorDetail, InvokeError};
use crate::execution::ProviderSpec;
use crate::streaming::StreamEventConverter;
use crate::types::{CanonicalChunk, CanonicalResponse, Choice, GenerationOptions, Message, Usage};
use crate::utils::filter_options;
use serde_json::{Value, json};

const PRO_MODEL: &str = "abab5.5-chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEndpoint {
    ChatCompletion,
    ChatCompletionPro,
}

impl ChatEndpoint {
    pub fn for_model(model: &str) -> Self {
        if model == PRO_MODEL {
            Self::ChatCompletionPro
        } else {
            Self::ChatCompletion
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::ChatCompletion => "text/chatcompletion",
            Self::ChatCompletionPro => "text/chatcompletion_pro",
        }
    }
}

/// Map a non-zero `base_resp.status_code` to an error.
pub fn base_resp_error(body: &Value) -> Option<InvokeError> {
    let code = body.pointer("/base_resp/status_code")?.as_i64()?;
    if code == 0 {
        return None;
    }
    let message = body
        .pointer("/base_resp/status_msg")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();
    let detail = ErrorDetail::new(message)
        .with_code(Some(code.to_string()))
        .with_details(json!({"provider": PROVIDER_ID, "response": body}));
    Some(match code {
        1004 | 2049 => InvokeError::Authorization(detail),
        1002 | 1039 => InvokeError::RateLimit {
            detail,
            retry_after: None,
        },
        1000 | 1013 => InvokeError::ServerUnavailable(detail),
        _ => InvokeError::BadRequest(detail),
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxSpec;

impl ProviderSpec for MinimaxSpec {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn classify_body_error(&self, body: &Value) -> Option<InvokeError> {
        base_resp_error(body)
    }
}

fn sender_type(role: &str) -> &'static str {
    if role == "assistant" { "BOT" } else { "USER" }
}

pub fn build_chat_body(
    endpoint: ChatEndpoint,
    model: &str,
    messages: &[Message],
    options: &GenerationOptions,
    stream: bool,
) -> Value {
    let bot_name = options.get_str("bot_name").unwrap_or(DEFAULT_BOT_NAME);
    let user_name = options.get_str("user_name").unwrap_or(DEFAULT_USER_NAME);

    let system: Vec<String> = messages
        .iter()
        .filter(|m| m.role == "system")
        .map(Message::text)
        .collect();
    let turns: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| {
            let sender = sender_type(&m.role);
            match endpoint {
                ChatEndpoint::ChatCompletion => json!({"sender_type": sender, "text": m.text()}),
                ChatEndpoint::ChatCompletionPro => {
                    let name = if sender == "BOT" { bot_name } else { user_name };
                    json!({"sender_type": sender, "sender_name": name, "text": m.text()})
                }
            }
        })
        .collect();

    let mut body = filter_options(PROVIDER_ID, options, ALLOWED_OPTIONS);
    body.insert("model".into(), json!(model));
    body.insert("messages".into(), Value::Array(turns));
    match endpoint {
        ChatEndpoint::ChatCompletion => {
            if !system.is_empty() {
                body.insert("prompt".into(), json!(system.join("\n")));
            }
        }
        ChatEndpoint::ChatCompletionPro => {
            body.insert(
                "bot_setting".into(),
                json!([{"bot_name": bot_name, "content": system.join("\n")}]),
            );
            body.insert(
                "reply_constraints".into(),
                json!({"sender_type": "BOT", "sender_name": bot_name}),
            );
        }
    }
    if stream {
        body.insert("stream".into(), Value::Bool(true));
    }
    Value::Object(body)
}

/// Text of one `choices[]` entry: v1 uses `text` (or `delta` when
/// streaming), pro uses `messages[].text`.
fn choice_text(choice: &Value) -> String {
    if let Some(messages) = choice.get("messages").and_then(Value::as_array) {
        return messages
            .iter()
            .filter_map(|m| m.get("text").and_then(Value::as_str))
            .collect();
    }
    choice
        .get("text")
        .or_else(|| choice.get("delta"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn finish_of(choice: &Value) -> Option<String> {
    choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn usage_of(value: &Value) -> Usage {
    Usage::from_json_fields(value.get("usage"), "prompt_tokens", "completion_tokens", "total_tokens")
}

pub fn parse_chat_response(value: &Value, requested_model: &str) -> CanonicalResponse {
    let choices: Vec<Choice> = value
        .get("choices")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .enumerate()
                .map(|(i, c)| {
                    let index = c.get("index").and_then(Value::as_u64).map(|n| u32::try_from(n).unwrap_or(u32::MAX)).unwrap_or(i as u32);
                    Choice::new(index, Message::assistant(choice_text(c)), finish_of(c))
                })
                .collect()
        })
        .unwrap_or_default();
    let choices = if choices.is_empty() {
        let reply = value.get("reply").and_then(Value::as_str).unwrap_or_default();
        vec![Choice::new(0, Message::assistant(reply), None)]
    } else {
        choices
    };

    CanonicalResponse {
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
    .with_created_unix(value.get("created").and_then(Value::as_i64))
}

/// The closing event repeats the whole reply in `reply`; its text is not
/// emitted again, only its finish reason and usage.
#[derive(Debug, Clone)]
pub struct MinimaxEventConverter {
    model: String,
}

impl MinimaxEventConverter {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

impl StreamEventConverter for MinimaxEventConverter {
    fn convert(&mut self, event: Value) -> Result<Option<CanonicalChunk>, InvokeError> {
        if let Some(err) = base_resp_error(&event) {
            return Err(err);
        }
        let is_final = event.get("reply").is_some();
        let choices: Vec<Choice> = event
            .get("choices")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .enumerate()
                    .filter_map(|(i, c)| {
                        let text = if is_final { String::new() } else { choice_text(c) };
                        let finish = finish_of(c);
                        if text.is_empty() && finish.is_none() {
                            return None;
                        }
                        Some(Choice::new(i as u32, Message::assistant(text), finish))
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
                model: self.model.clone(),
                created: None,
                choices,
                usage,
            }
            .with_created_unix(event.get("created").and_then(Value::as_i64)),
        ))
    }
}
