//! Baichuan adapter
//!
//! `Baichuan2*` models use the OpenAI-style `chat/completions` endpoint.
//! Older models use the legacy `chat` / `stream/chat` endpoints, which
//! answer with `{code, msg, data: {messages}}` and stream JSON lines.

mod client;
mod files;
mod legacy;

pub use client::BaichuanAdapter;
pub use legacy::{BaichuanSpec, LegacyChunkConverter, parse_legacy_response};

pub const PROVIDER_ID: &str = "baichuan";
pub const DEFAULT_BASE_URL: &str = "https://api.baichuan-ai.com/v1/";
pub const DEFAULT_FILE_PURPOSE: &str = "knowledge-base";

pub const ALLOWED_OPTIONS: &[&str] = &[
    "max_tokens",
    "temperature",
    "top_p",
    "top_k",
    "with_search_enhance",
    "knowledge_base",
    "tools",
    "tool_choice",
];

pub const EMBEDDING_OPTIONS: &[&str] = &[];

/// Endpoint family for a model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEndpoint {
    OpenAiCompatible,
    Legacy,
}

impl ChatEndpoint {
    pub fn for_model(model: &str) -> Self {
        if model.starts_with("Baichuan2") {
            Self::OpenAiCompatible
        } else {
            Self::Legacy
        }
    }

    pub fn path(&self, stream: bool) -> &'static str {
        match (self, stream) {
            (Self::OpenAiCompatible, _) => "chat/completions",
            (Self::Legacy, false) => "chat",
            (Self::Legacy, true) => "stream/chat",
        }
    }
}
