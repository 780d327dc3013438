//! # OneSdk - A Unified Client over LLM Vendor APIs
//!
//! OneSdk exposes one method surface (`generate`, `stream_generate`,
//! `count_tokens`, model listing, embeddings, files) over Anthropic, Qwen,
//! Kimi, Doubao, Baichuan, MiniMax, Gemini and Wenxin. The vendor is picked
//! once, by identifier, when the facade is built.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Capability Separation**: generation is required; model listing,
//!   embeddings and file management are optional traits reached through
//!   typed accessors.
//! - **Canonical Shapes**: every vendor response, stream event and failure
//!   is mapped onto one response, chunk and error taxonomy.
//! - **Streaming**: SSE and JSON-lines bodies are reassembled lazily into a
//!   chunk stream that can be cancelled.
//! - **HTTP Customization**: timeouts, proxy and headers via `HttpConfig`,
//!   or a custom `HttpTransport`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use onesdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OneSdk::builder()
//!         .provider("anthropic")
//!         .api_key("your-api-key")
//!         .model("claude-3-5-sonnet-20241022")
//!         .build()
//!         .await?;
//!
//!     let response = client.chat(vec![Message::user("Hello, world!")]).await?;
//!     if let Some(text) = response.text() {
//!         println!("Response: {text}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use onesdk::prelude::*;
//!
//! # async fn demo(client: OneSdk) -> Result<(), InvokeError> {
//! let request = GenerationRequest::new(vec![Message::user("Tell me a story")])
//!     .with_option("max_tokens", 256);
//! let mut stream = client.stream_generate(request).await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.text().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod execution;
pub mod observability;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod standards;
pub mod streaming;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::{ErrorDetail, ErrorKind, InvokeError};
pub use provider::{OneSdk, OneSdkBuilder};
pub use registry::{ProviderRegistry, global_registry};
pub use streaming::{CancelHandle, ChunkStream, ChunkStreamHandle};

/// Common imports.
pub mod prelude {
    pub use crate::error::{ErrorKind, InvokeError};
    pub use crate::provider::{OneSdk, OneSdkBuilder};
    pub use crate::streaming::{ChunkStream, ChunkStreamHandle};
    pub use crate::traits::{
        EmbeddingCapability, FileManagementCapability, GenerationCapability,
        ModelListingCapability, ProviderAdapter, ProviderCapabilities,
    };
    pub use crate::types::{
        CanonicalChunk, CanonicalResponse, ContentPart, Credentials, FileUpload,
        GenerationOptions, GenerationRequest, HttpConfig, Message, ModelInfo, TokenCount,
        TokenCountQuality, Usage,
    };
}
