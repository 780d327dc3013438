//! Provider registry
//!
//! Maps provider identifiers to factories. Lookup is case-insensitive and
//! happens once, when a facade is constructed.

pub mod factory;

pub use factory::{BuildContext, ProviderFactory};

use crate::error::InvokeError;
use crate::traits::ProviderAdapter;
use crate::types::Credentials;
use factory::{
    AnthropicFactory, BaichuanFactory, DoubaoFactory, GeminiFactory, KimiFactory, MinimaxFactory,
    QwenFactory, WenxinFactory,
};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    by_id: HashMap<String, Arc<dyn ProviderFactory>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.list())
            .finish()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in vendor.
    pub fn with_builtin_providers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AnthropicFactory));
        registry.register(Arc::new(QwenFactory));
        registry.register(Arc::new(KimiFactory));
        registry.register(Arc::new(DoubaoFactory));
        registry.register(Arc::new(BaichuanFactory));
        registry.register(Arc::new(MinimaxFactory));
        registry.register(Arc::new(GeminiFactory));
        registry.register(Arc::new(WenxinFactory));
        registry
    }

    /// Register a factory; a later registration for the same id wins.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.by_id
            .insert(factory.provider_id().to_ascii_lowercase(), factory);
    }

    pub fn resolve(&self, provider_id: &str) -> Option<&Arc<dyn ProviderFactory>> {
        self.by_id.get(&provider_id.to_ascii_lowercase())
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.resolve(provider_id).is_some()
    }

    /// Registered identifiers, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.by_id.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn build(
        &self,
        provider_id: &str,
        credentials: &Credentials,
        ctx: &BuildContext,
    ) -> Result<Arc<dyn ProviderAdapter>, InvokeError> {
        let factory = self.resolve(provider_id).ok_or_else(|| {
            InvokeError::invalid_parameter(format!("Unsupported provider: {provider_id}"))
        })?;
        factory.build(credentials, ctx).await
    }
}

static GLOBAL: OnceLock<ProviderRegistry> = OnceLock::new();

/// Process-wide registry of the built-in providers.
pub fn global_registry() -> &'static ProviderRegistry {
    GLOBAL.get_or_init(ProviderRegistry::with_builtin_providers)
}
