//! Doubao (Volcengine Ark) adapter

mod client;

pub use client::DoubaoAdapter;

pub const PROVIDER_ID: &str = "doubao";
pub const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3/";

pub const ALLOWED_OPTIONS: &[&str] = &[
    "max_tokens",
    "temperature",
    "top_p",
    "stop",
    "frequency_penalty",
    "presence_penalty",
    "logprobs",
    "top_logprobs",
    "logit_bias",
    "tools",
    "tool_choice",
    "response_format",
];

/// Options accepted by `context/create`.
pub const CONTEXT_OPTIONS: &[&str] = &["mode", "ttl", "truncation_strategy"];

/// Options accepted by `embeddings`.
pub const EMBEDDING_OPTIONS: &[&str] = &["encoding_format", "dimensions"];
