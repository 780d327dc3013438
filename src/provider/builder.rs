//! OneSdk builder
//!
//! Collects the provider id, credentials and HTTP settings, then resolves the
//! adapter through the registry in one async step.

use super::OneSdk;
use crate::error::InvokeError;
use crate::execution::http::HttpTransport;
use crate::registry::{BuildContext, ProviderRegistry, global_registry};
use crate::types::{Credentials, HttpConfig};
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct OneSdkBuilder {
    provider: Option<String>,
    credentials: Credentials,
    http_config: HttpConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    model: Option<String>,
    registry: Option<ProviderRegistry>,
}

impl std::fmt::Debug for OneSdkBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneSdkBuilder")
            .field("provider", &self.provider)
            .field("credentials", &self.credentials)
            .field("http_config", &self.http_config)
            .field("custom_transport", &self.transport.is_some())
            .field("model", &self.model)
            .finish()
    }
}

impl OneSdkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider identifier, matched case-insensitively.
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.credentials.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.credentials.base_url = Some(base_url.into());
        self
    }

    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Replace the reqwest transport, e.g. with a recording transport in tests.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Default model used when a request names none.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Resolve against a custom registry instead of the built-in one.
    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub async fn build(self) -> Result<OneSdk, InvokeError> {
        let provider = self
            .provider
            .ok_or_else(|| InvokeError::invalid_parameter("provider is required"))?;

        let mut ctx = BuildContext::new(self.http_config);
        if let Some(transport) = self.transport {
            ctx = ctx.with_transport(transport);
        }

        let adapter = match &self.registry {
            Some(registry) => registry.build(&provider, &self.credentials, &ctx).await?,
            None => global_registry().build(&provider, &self.credentials, &ctx).await?,
        };

        let mut sdk = OneSdk::from_adapter(adapter);
        if let Some(model) = self.model {
            sdk.set_model(model);
        }
        Ok(sdk)
    }
}
