//! OpenAI-style chat completions
//!
//! Kimi, Doubao and the Baichuan2 models speak this wire format. Vendors
//! differ only in base URL, allow-list and a few extra endpoints.

pub mod chat;
pub mod errors;

pub use chat::{OpenAiChunkConverter, build_chat_body, parse_chat_response, to_openai_messages};
pub use errors::{OpenAiCompatibleSpec, classify_openai_compatible_http_error};
