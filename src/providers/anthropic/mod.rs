//! Anthropic Messages API adapter

mod client;
mod streaming;
mod transformers;

pub use client::AnthropicAdapter;
pub use streaming::AnthropicEventConverter;
pub use transformers::{build_messages_body, parse_messages_response};

pub const PROVIDER_ID: &str = "anthropic";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Options forwarded into the `/v1/messages` payload.
pub const ALLOWED_OPTIONS: &[&str] = &[
    "max_tokens",
    "metadata",
    "stop_sequences",
    "system",
    "temperature",
    "top_k",
    "top_p",
    "tools",
    "tool_choice",
];

/// Option key turned into the `anthropic-beta` header instead of a body field.
pub const BETA_OPTION: &str = "anthropic-beta";
