//! Google Gemini (Generative Language API) adapter
//!
//! The API key travels as the `key` query parameter. Streaming uses
//! `:streamGenerateContent?alt=sse`, whose events are complete
//! `GenerateContentResponse` objects.

mod client;
mod convert;

pub use client::GeminiAdapter;
pub use convert::{GeminiEventConverter, GeminiSpec, build_generate_body, parse_generate_response};

pub const PROVIDER_ID: &str = "gemini";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Options accepted from the caller. Each one lands either in
/// `generationConfig` or at the top level of the request.
pub const ALLOWED_OPTIONS: &[&str] = &[
    "temperature",
    "top_p",
    "top_k",
    "max_tokens",
    "max_output_tokens",
    "stop",
    "stop_sequences",
    "candidate_count",
    "response_mime_type",
    "safety_settings",
    "tools",
    "tool_config",
];

/// Options forwarded on each `batchEmbedContents` request entry.
pub const EMBEDDING_OPTIONS: &[&str] = &["task_type", "title", "output_dimensionality"];
