//! MiniMax adapter
//!
//! Every call carries the `GroupId` query parameter. `abab5.5-chat` is
//! served by the `chatcompletion_pro` endpoint, whose message shape names
//! senders and takes the system prompt as `bot_setting`.

mod chat;
mod client;
mod files;

pub use chat::{ChatEndpoint, MinimaxEventConverter, MinimaxSpec, build_chat_body, parse_chat_response};
pub use client::MinimaxAdapter;

pub const PROVIDER_ID: &str = "minimax";
pub const DEFAULT_BASE_URL: &str = "https://api.minimax.chat/v1/";
pub const DEFAULT_BOT_NAME: &str = "MM Assistant";
pub const DEFAULT_USER_NAME: &str = "User";
pub const DEFAULT_EMBEDDING_TYPE: &str = "db";
pub const DEFAULT_FILE_PURPOSE: &str = "retrieval";

/// Options forwarded into the chat payload.
pub const ALLOWED_OPTIONS: &[&str] = &[
    "tokens_to_generate",
    "temperature",
    "top_p",
    "mask_sensitive_info",
    "role_meta",
    "functions",
    "plugins",
    "sample_messages",
    "skip_info_mask",
];
