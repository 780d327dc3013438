//! Vendor adapters
//!
//! One module per vendor. Each module exposes its `PROVIDER_ID`,
//! `DEFAULT_BASE_URL` and `ALLOWED_OPTIONS` constants next to its adapter.

pub mod anthropic;
pub mod baichuan;
pub mod doubao;
pub mod gemini;
pub mod kimi;
pub mod minimax;
pub mod qwen;
pub mod wenxin;

pub use anthropic::AnthropicAdapter;
pub use baichuan::BaichuanAdapter;
pub use doubao::DoubaoAdapter;
pub use gemini::GeminiAdapter;
pub use kimi::KimiAdapter;
pub use minimax::MinimaxAdapter;
pub use qwen::QwenAdapter;
pub use wenxin::WenxinAdapter;
