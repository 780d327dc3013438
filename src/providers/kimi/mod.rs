//! Kimi (Moonshot) adapter
//!
//! OpenAI-style chat completions plus Moonshot's context caching and tag
//! APIs, which are exposed as inherent methods on [`KimiAdapter`].

mod caching;
mod client;

pub use caching::{CacheListQuery, KimiCacheRequest, KimiCacheUpdate};
pub use client::KimiAdapter;

pub const PROVIDER_ID: &str = "kimi";
pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.cn/v1/";

/// Options forwarded into the chat-completions payload.
pub const ALLOWED_OPTIONS: &[&str] = &[
    "max_tokens",
    "temperature",
    "top_p",
    "n",
    "presence_penalty",
    "frequency_penalty",
    "stop",
    "tools",
    "tool_choice",
    "response_format",
    "user",
];
