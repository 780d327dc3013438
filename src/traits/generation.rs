//! Required generation capability

use crate::error::InvokeError;
use crate::streaming::ChunkStream;
use crate::types::{CanonicalResponse, GenerationOptions, Message, TokenCount};
use async_trait::async_trait;

/// The one interface every adapter implements.
///
/// `model` is only checked for non-emptiness; vendors reject unknown names.
/// `messages` is validated before any network call.
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    /// One outbound HTTP call, no retries.
    async fn generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CanonicalResponse, InvokeError>;

    /// One long-lived streamed HTTP call. Dropping the stream closes it.
    async fn stream_generate(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChunkStream, InvokeError>;

    async fn count_tokens(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<TokenCount, InvokeError>;
}
