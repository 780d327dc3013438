//! Alibaba Qwen (DashScope) adapter

mod client;
mod transformers;

pub use client::QwenAdapter;
pub use transformers::{QwenEventConverter, QwenSpec, build_generation_body, parse_generation_response};

pub const PROVIDER_ID: &str = "qwen";
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1/services/aigc/";
pub const TEXT_GENERATION_PATH: &str = "text-generation/generation";
pub const MULTIMODAL_GENERATION_PATH: &str = "multimodal-generation/generation";

/// Options forwarded into `parameters`.
pub const ALLOWED_OPTIONS: &[&str] = &[
    "temperature",
    "top_p",
    "top_k",
    "repetition_penalty",
    "max_tokens",
    "stop",
    "seed",
    "enable_search",
    "tools",
    "tool_choice",
];

/// Models served without a listing endpoint.
pub const MODEL_CATALOG: &[(&str, &str)] = &[
    ("qwen-turbo", "Qwen-Turbo"),
    ("qwen-plus", "Qwen-Plus"),
    ("qwen-max", "Qwen-Max"),
    ("qwen-max-longcontext", "Qwen-Max-LongContext"),
    ("qwen-vl-plus", "Qwen-VL-Plus"),
];

/// Vision and audio models use the multimodal endpoint and message shape.
pub fn is_multimodal(model: &str) -> bool {
    model.starts_with("qwen-vl") || model.starts_with("qwen-audio")
}
