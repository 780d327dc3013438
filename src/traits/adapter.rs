//! Provider adapter interface
//!
//! Identity plus typed accessors for the optional capabilities. The facade
//! asks an adapter for a capability instead of probing for methods.

use super::capabilities::ProviderCapabilities;
use super::embedding::EmbeddingCapability;
use super::files::FileManagementCapability;
use super::generation::GenerationCapability;
use super::model_listing::ModelListingCapability;

pub trait ProviderAdapter: GenerationCapability + Send + Sync {
    /// Canonical provider id (e.g. "anthropic", "kimi").
    fn provider_id(&self) -> &'static str;

    fn capabilities(&self) -> ProviderCapabilities;

    /// Get as Any for downcasting to the concrete adapter.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Returns None by default. Adapters that list models override this to
    /// return Some(self).
    fn as_model_listing_capability(&self) -> Option<&dyn ModelListingCapability> {
        None
    }

    /// Returns None by default. Adapters that support embeddings override
    /// this to return Some(self).
    fn as_embedding_capability(&self) -> Option<&dyn EmbeddingCapability> {
        None
    }

    /// Returns None by default. Adapters that manage files override this to
    /// return Some(self).
    fn as_file_management_capability(&self) -> Option<&dyn FileManagementCapability> {
        None
    }
}
