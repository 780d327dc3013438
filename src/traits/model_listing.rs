//! Model listing capability trait

use crate::error::InvokeError;
use crate::types::ModelInfo;
use async_trait::async_trait;

#[async_trait]
pub trait ModelListingCapability: Send + Sync {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, InvokeError>;
    async fn get_model(&self, model_id: &str) -> Result<ModelInfo, InvokeError>;
}

/// Look a model up in a listing, failing with `ModelNotFound`.
pub fn find_model(models: Vec<ModelInfo>, model_id: &str) -> Result<ModelInfo, InvokeError> {
    models
        .into_iter()
        .find(|m| m.id == model_id)
        .ok_or_else(|| {
            InvokeError::model_not_found(crate::error::ErrorDetail::new(format!(
                "Model '{model_id}' not found"
            )))
        })
}
