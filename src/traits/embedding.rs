//! Embedding capability trait

use crate::error::InvokeError;
use crate::types::{EmbeddingResponse, GenerationOptions};
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingCapability: Send + Sync {
    async fn create_embedding(
        &self,
        model: &str,
        input: &[String],
        options: &GenerationOptions,
    ) -> Result<EmbeddingResponse, InvokeError>;
}
