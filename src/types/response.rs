//! Canonical response shapes

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

impl Usage {
    /// `total` is derived from the parts when the vendor omits it.
    pub fn new(prompt: Option<u32>, completion: Option<u32>, total: Option<u32>) -> Self {
        let total = total.or(match (prompt, completion) {
            (Some(p), Some(c)) => Some(p + c),
            _ => None,
        });
        Self {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: total,
        }
    }

    /// Read `u32` counters from a JSON object by field name.
    pub fn from_json_fields(
        value: Option<&serde_json::Value>,
        prompt_key: &str,
        completion_key: &str,
        total_key: &str,
    ) -> Self {
        let Some(v) = value else {
            return Self::default();
        };
        let read = |k: &str| v.get(k).and_then(|n| n.as_u64()).map(|n| u32::try_from(n).unwrap_or(u32::MAX));
        Self::new(read(prompt_key), read(completion_key), read(total_key))
    }

    pub fn is_empty(&self) -> bool {
        self.prompt_tokens.is_none() && self.completion_tokens.is_none() && self.total_tokens.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    pub finish_reason: Option<String>,
}

impl Choice {
    pub fn new(index: u32, message: Message, finish_reason: Option<String>) -> Self {
        Self {
            index,
            message,
            finish_reason,
        }
    }
}

/// Vendor-independent generation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResponse {
    pub id: String,
    pub model: String,
    /// `None` when the vendor did not send a timestamp.
    pub created: Option<DateTime<Utc>>,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

/// One incremental delta of a streamed generation.
pub type CanonicalChunk = CanonicalResponse;

impl CanonicalResponse {
    /// Text of the first choice.
    pub fn text(&self) -> Option<String> {
        self.choices.first().map(|c| c.message.text())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.finish_reason.as_deref())
    }

    /// Single-choice assistant response, the common vendor case.
    pub fn single(
        id: impl Into<String>,
        model: impl Into<String>,
        text: impl Into<String>,
        finish_reason: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            created: None,
            choices: vec![Choice::new(0, Message::assistant(text), finish_reason)],
            usage: Usage::default(),
        }
    }

    pub fn with_created_unix(mut self, secs: Option<i64>) -> Self {
        self.created = secs.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0));
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }
}
