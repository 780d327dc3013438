//! The OneSdk facade
//!
//! One facade instance wraps exactly one adapter, picked by provider id at
//! construction. Every call is forwarded through the adapter's capability
//! accessors; a missing capability surfaces as `UnsupportedOperation`.
//!
//! The only cross-cutting policy lives here: when `generate` or
//! `stream_generate` fail with `ModelNotFound`, the facade lists the
//! provider's models (when it can) and attaches the identifiers to the
//! error.

mod builder;

pub use builder::OneSdkBuilder;

use crate::error::InvokeError;
use crate::registry::global_registry;
use crate::streaming::{ChunkStream, ChunkStreamHandle, make_cancellable_stream_handle_from_future};
use crate::traits::{
    EmbeddingCapability, FileManagementCapability, ModelListingCapability, ProviderAdapter,
    ProviderCapabilities,
};
use crate::types::{
    CanonicalResponse, Credentials, EmbeddingResponse, FileDeleteResponse, FileObject,
    FileUpload, GenerationOptions, GenerationRequest, Message, ModelInfo, TokenCount,
};
use futures::StreamExt;
use std::sync::Arc;

/// Unified client over one vendor adapter.
#[derive(Clone)]
pub struct OneSdk {
    adapter: Arc<dyn ProviderAdapter>,
    current_model: Option<String>,
}

static_assertions::assert_impl_all!(OneSdk: Send, Sync, Clone);

impl std::fmt::Debug for OneSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneSdk")
            .field("provider", &self.adapter.provider_id())
            .field("current_model", &self.current_model)
            .field("capabilities", &self.adapter.capabilities())
            .finish()
    }
}

impl OneSdk {
    /// Build a facade for `provider` with the default HTTP settings.
    pub async fn new(provider: &str, credentials: Credentials) -> Result<Self, InvokeError> {
        Self::builder()
            .provider(provider)
            .credentials(credentials)
            .build()
            .await
    }

    pub fn builder() -> OneSdkBuilder {
        OneSdkBuilder::new()
    }

    /// Wrap an already constructed adapter.
    pub fn from_adapter(adapter: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            adapter,
            current_model: None,
        }
    }

    /// Identifiers accepted by [`OneSdk::new`], sorted.
    pub fn list_providers() -> Vec<String> {
        global_registry().list()
    }

    pub fn provider_id(&self) -> &'static str {
        self.adapter.provider_id()
    }

    pub fn capabilities(&self) -> ProviderCapabilities {
        self.adapter.capabilities()
    }

    pub fn supports(&self, capability: &str) -> bool {
        self.adapter.capabilities().supports(capability)
    }

    /// Default model for requests that leave `model` unset.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.current_model = Some(model.into());
    }

    pub fn current_model(&self) -> Option<&str> {
        self.current_model.as_deref()
    }

    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }

    /// Reach the concrete adapter for provider-specific APIs.
    ///
    /// ```rust,no_run
    /// # async fn demo(sdk: onesdk::OneSdk) {
    /// use onesdk::providers::{KimiAdapter, kimi::CacheListQuery};
    /// if let Some(kimi) = sdk.downcast_adapter::<KimiAdapter>() {
    ///     let _ = kimi.list_caches(&CacheListQuery::default()).await;
    /// }
    /// # }
    /// ```
    pub fn downcast_adapter<T: 'static>(&self) -> Option<&T> {
        self.adapter.as_any().downcast_ref::<T>()
    }

    fn resolve_model(&self, model: Option<&str>) -> Result<String, InvokeError> {
        model
            .filter(|m| !m.trim().is_empty())
            .or(self.current_model.as_deref())
            .map(str::to_string)
            .ok_or_else(|| {
                InvokeError::invalid_parameter(
                    "model is required: pass one on the request or call set_model",
                )
            })
    }

    fn unsupported(&self, operation: &str) -> InvokeError {
        InvokeError::unsupported(self.provider_id(), operation)
    }

    fn model_listing(&self, operation: &str) -> Result<&dyn ModelListingCapability, InvokeError> {
        self.adapter
            .as_model_listing_capability()
            .ok_or_else(|| self.unsupported(operation))
    }

    fn embedding(&self) -> Result<&dyn EmbeddingCapability, InvokeError> {
        self.adapter
            .as_embedding_capability()
            .ok_or_else(|| self.unsupported("create_embedding"))
    }

    fn files(&self, operation: &str) -> Result<&dyn FileManagementCapability, InvokeError> {
        self.adapter
            .as_file_management_capability()
            .ok_or_else(|| self.unsupported(operation))
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<CanonicalResponse, InvokeError> {
        let model = self.resolve_model(request.model.as_deref())?;
        match self
            .adapter
            .generate(&model, &request.messages, &request.options)
            .await
        {
            Err(e @ InvokeError::ModelNotFound { .. }) => {
                Err(self.augment_model_not_found(e, &model).await)
            }
            other => other,
        }
    }

    /// Convenience for a plain message list with no options.
    pub async fn chat(&self, messages: Vec<Message>) -> Result<CanonicalResponse, InvokeError> {
        self.generate(GenerationRequest::new(messages)).await
    }

    pub async fn stream_generate(
        &self,
        request: GenerationRequest,
    ) -> Result<ChunkStream, InvokeError> {
        let model = self.resolve_model(request.model.as_deref())?;
        let stream = match self
            .adapter
            .stream_generate(&model, &request.messages, &request.options)
            .await
        {
            Ok(stream) => stream,
            Err(e @ InvokeError::ModelNotFound { .. }) => {
                return Err(self.augment_model_not_found(e, &model).await);
            }
            Err(e) => return Err(e),
        };

        let sdk = self.clone();
        let mut inner = stream;
        Ok(Box::pin(async_stream::stream! {
            while let Some(item) = inner.next().await {
                match item {
                    Err(e @ InvokeError::ModelNotFound { .. }) => {
                        yield Err(sdk.augment_model_not_found(e, &model).await);
                        break;
                    }
                    other => yield other,
                }
            }
        }))
    }

    /// Like [`OneSdk::stream_generate`], with a handle that aborts the
    /// request or the running stream.
    ///
    /// A missing model still fails here, before anything is sent.
    pub fn stream_generate_with_cancel(
        &self,
        mut request: GenerationRequest,
    ) -> Result<ChunkStreamHandle, InvokeError> {
        request.model = Some(self.resolve_model(request.model.as_deref())?);
        let sdk = self.clone();
        Ok(make_cancellable_stream_handle_from_future(async move {
            sdk.stream_generate(request).await
        }))
    }

    pub async fn count_tokens(
        &self,
        model: Option<&str>,
        messages: &[Message],
    ) -> Result<TokenCount, InvokeError> {
        let model = self.resolve_model(model)?;
        self.adapter.count_tokens(&model, messages).await
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, InvokeError> {
        self.model_listing("list_models")?.list_models().await
    }

    pub async fn get_model_info(&self, model_id: &str) -> Result<ModelInfo, InvokeError> {
        self.model_listing("get_model_info")?.get_model(model_id).await
    }

    pub async fn create_embedding(
        &self,
        model: &str,
        input: &[String],
        options: &GenerationOptions,
    ) -> Result<EmbeddingResponse, InvokeError> {
        self.embedding()?.create_embedding(model, input, options).await
    }

    pub async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, InvokeError> {
        self.files("upload_file")?.upload_file(upload).await
    }

    pub async fn list_files(&self, purpose: Option<&str>) -> Result<Vec<FileObject>, InvokeError> {
        self.files("list_files")?.list_files(purpose).await
    }

    pub async fn get_file_info(&self, file_id: &str) -> Result<FileObject, InvokeError> {
        self.files("get_file_info")?.get_file_info(file_id).await
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<FileDeleteResponse, InvokeError> {
        self.files("delete_file")?.delete_file(file_id).await
    }

    pub async fn get_file_content(&self, file_id: &str) -> Result<Vec<u8>, InvokeError> {
        self.files("get_file_content")?.get_file_content(file_id).await
    }

    /// Attach the provider's current model ids to a `ModelNotFound`.
    ///
    /// A failed listing never replaces the original error.
    async fn augment_model_not_found(&self, error: InvokeError, model: &str) -> InvokeError {
        let mut detail = match error {
            InvokeError::ModelNotFound { detail, .. } => detail,
            other => return other,
        };
        let Some(listing) = self.adapter.as_model_listing_capability() else {
            return InvokeError::model_not_found(detail);
        };

        match listing.list_models().await {
            Ok(models) => {
                let ids: Vec<String> = models.into_iter().map(|m| m.id).collect();
                detail.message = format!(
                    "Model '{model}' not found. Available models: [{}]",
                    ids.join(", ")
                );
                InvokeError::ModelNotFound {
                    detail,
                    available_models: Some(ids),
                }
            }
            Err(list_err) => {
                tracing::debug!(
                    provider = self.provider_id(),
                    model,
                    error = %list_err,
                    "model listing for ModelNotFound enrichment failed"
                );
                InvokeError::model_not_found(detail)
            }
        }
    }
}
