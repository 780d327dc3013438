//! Legacy `chat` endpoint shapes and error codes.

use super::PROVIDER_ID;
use crate::error::{ErrorDetail, InvokeError};
use crate::execution::ProviderSpec;
use crate::standards::openai::classify_openai_compatible_http_error;
use crate::streaming::StreamEventConverter;
use crate::types::{CanonicalChunk, CanonicalResponse, Choice, Message, Usage};
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Map a non-zero legacy `code` to an error.
pub fn legacy_body_error(body: &Value) -> Option<InvokeError> {
    let code = body.get("code")?.as_i64()?;
    if code == 0 {
        return None;
    }
    let message = body
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();
    let detail = ErrorDetail::new(message)
        .with_code(Some(code.to_string()))
        .with_details(serde_json::json!({"provider": PROVIDER_ID, "response": body}));
    Some(match code {
        10102..=10105 => InvokeError::Authorization(detail),
        10000 => InvokeError::ServerUnavailable(detail),
        _ => InvokeError::BadRequest(detail),
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BaichuanSpec;

impl ProviderSpec for BaichuanSpec {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn classify_http_error(
        &self,
        status: u16,
        body_text: &str,
        headers: &HeaderMap,
    ) -> Option<InvokeError> {
        classify_openai_compatible_http_error(PROVIDER_ID, status, body_text, headers)
    }

    fn classify_body_error(&self, body: &Value) -> Option<InvokeError> {
        legacy_body_error(body)
    }
}

fn legacy_usage(value: &Value) -> Usage {
    Usage::from_json_fields(value.get("usage"), "prompt_tokens", "answer_tokens", "total_tokens")
}

fn legacy_choices(value: &Value) -> Vec<Choice> {
    value
        .pointer("/data/messages")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .enumerate()
                .map(|(i, m)| {
                    Choice::new(
                        i as u32,
                        Message::new(
                            m.get("role").and_then(Value::as_str).unwrap_or("assistant"),
                            m.get("content").and_then(Value::as_str).unwrap_or_default(),
                        ),
                        m.get("finish_reason")
                            .and_then(Value::as_str)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_legacy_response(value: &Value, requested_model: &str, request_id: Option<&str>) -> CanonicalResponse {
    CanonicalResponse {
        id: request_id.unwrap_or_default().to_string(),
        model: requested_model.to_string(),
        created: None,
        choices: legacy_choices(value),
        usage: legacy_usage(value),
    }
}

/// Converter for the JSON-lines `stream/chat` endpoint.
#[derive(Debug, Clone)]
pub struct LegacyChunkConverter {
    model: String,
}

impl LegacyChunkConverter {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

impl StreamEventConverter for LegacyChunkConverter {
    fn convert(&mut self, event: Value) -> Result<Option<CanonicalChunk>, InvokeError> {
        if let Some(err) = legacy_body_error(&event) {
            return Err(err);
        }
        let chunk = parse_legacy_response(&event, &self.model, None);
        if chunk.choices.iter().all(|c| c.message.content.is_empty() && c.finish_reason.is_none())
            && chunk.usage.is_empty()
        {
            return Ok(None);
        }
        Ok(Some(chunk))
    }
}
