//! Anthropic SSE event conversion
//!
//! `message_start` carries the id and model that later deltas inherit.
//! Only `content_block_delta` text and `message_delta` stop reasons or
//! usage produce chunks; `ping` and block start/stop events are skipped.

use super::PROVIDER_ID;
use super::transformers::usage_of;
use crate::error::{InvokeError, classify_event_error};
use crate::streaming::StreamEventConverter;
use crate::types::{CanonicalChunk, Choice, Message, Usage};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct AnthropicEventConverter {
    id: String,
    model: String,
    prompt_tokens: Option<u32>,
}

impl AnthropicEventConverter {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            model: model.into(),
            prompt_tokens: None,
        }
    }

    fn chunk(&self, text: &str, finish_reason: Option<String>, usage: Usage) -> CanonicalChunk {
        CanonicalChunk {
            id: self.id.clone(),
            model: self.model.clone(),
            created: None,
            choices: vec![Choice::new(0, Message::assistant(text), finish_reason)],
            usage,
        }
    }
}

impl StreamEventConverter for AnthropicEventConverter {
    fn convert(&mut self, event: Value) -> Result<Option<CanonicalChunk>, InvokeError> {
        match event.get("type").and_then(Value::as_str).unwrap_or_default() {
            "message_start" => {
                if let Some(message) = event.get("message") {
                    if let Some(id) = message.get("id").and_then(Value::as_str) {
                        self.id = id.to_string();
                    }
                    if let Some(model) = message.get("model").and_then(Value::as_str) {
                        self.model = model.to_string();
                    }
                    self.prompt_tokens = usage_of(message.get("usage")).prompt_tokens;
                }
                Ok(None)
            }
            "content_block_delta" => {
                let text = event
                    .pointer("/delta/text")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if text.is_empty() {
                    return Ok(None);
                }
                Ok(Some(self.chunk(text, None, Usage::default())))
            }
            "message_delta" => {
                let finish = event
                    .pointer("/delta/stop_reason")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let output = usage_of(event.get("usage")).completion_tokens;
                let usage = if output.is_some() {
                    Usage::new(self.prompt_tokens, output, None)
                } else {
                    Usage::default()
                };
                if finish.is_none() && usage.is_empty() {
                    return Ok(None);
                }
                Ok(Some(self.chunk("", finish, usage)))
            }
            "error" => Err(classify_event_error(PROVIDER_ID, &event)),
            _ => Ok(None),
        }
    }
}
