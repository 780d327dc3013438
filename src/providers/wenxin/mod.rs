//! Baidu Wenxin (ERNIE) adapter
//!
//! Calls are authorized with an OAuth access token passed as the
//! `access_token` query parameter. The token is fetched once, when the
//! adapter is built, unless the credentials already carry one.

mod auth;
mod client;

pub use auth::fetch_access_token;
pub use client::{WenxinAdapter, WenxinEventConverter, WenxinSpec, wenxin_body_error};

pub const PROVIDER_ID: &str = "wenxin";
pub const DEFAULT_BASE_URL: &str = "https://aip.baidubce.com";
pub const CHAT_PATH_PREFIX: &str = "rpc/2.0/ai_custom/v1/wenxinworkshop/chat/";

/// Options forwarded into the chat payload.
pub const ALLOWED_OPTIONS: &[&str] = &[
    "temperature",
    "top_p",
    "penalty_score",
    "stop",
    "max_output_tokens",
    "disable_search",
    "enable_citation",
    "response_format",
    "user_id",
    "functions",
    "tool_choice",
];

/// Known model names and their endpoint slugs.
pub const MODEL_ENDPOINTS: &[(&str, &str)] = &[
    ("ERNIE-Bot", "completions"),
    ("ERNIE-Bot-turbo", "eb-instant"),
    ("BLOOMZ-7B", "bloomz_7b1"),
    ("ERNIE-4.0-8K", "completions_pro"),
    ("ERNIE-Speed-8K", "ernie_speed"),
    ("ERNIE-Lite-8K", "ernie-lite-8k"),
];

/// Endpoint slug for `model`. Names outside the table are taken to be a
/// custom deployment slug.
pub fn endpoint_for(model: &str) -> &str {
    MODEL_ENDPOINTS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, slug)| *slug)
        .unwrap_or(model)
}
