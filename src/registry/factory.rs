//! Provider factories
//!
//! A factory turns a credential bag into a ready adapter. Construction is
//! async so vendors that authenticate up front (Wenxin's OAuth exchange)
//! fit the same shape as the rest.

use crate::error::InvokeError;
use crate::execution::http::{HttpTransport, ReqwestTransport};
use crate::providers::{
    AnthropicAdapter, BaichuanAdapter, DoubaoAdapter, GeminiAdapter, KimiAdapter, MinimaxAdapter,
    QwenAdapter, WenxinAdapter, anthropic, baichuan, doubao, gemini, kimi, minimax, qwen, wenxin,
};
use crate::traits::ProviderAdapter;
use crate::types::{Credentials, HttpConfig};
use async_trait::async_trait;
use std::sync::Arc;

/// Shared inputs for adapter construction.
#[derive(Clone, Default)]
pub struct BuildContext {
    pub http_config: HttpConfig,
    /// Overrides the reqwest transport built from `http_config`.
    pub transport: Option<Arc<dyn HttpTransport>>,
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("http_config", &self.http_config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl BuildContext {
    pub fn new(http_config: HttpConfig) -> Self {
        Self {
            http_config,
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// The custom transport, or a reqwest transport for `http_config`.
    pub fn transport(&self) -> Result<Arc<dyn HttpTransport>, InvokeError> {
        match &self.transport {
            Some(t) => Ok(t.clone()),
            None => Ok(Arc::new(ReqwestTransport::from_config(&self.http_config)?)),
        }
    }
}

#[async_trait]
pub trait ProviderFactory: Send + Sync {
    fn provider_id(&self) -> &'static str;

    async fn build(
        &self,
        credentials: &Credentials,
        ctx: &BuildContext,
    ) -> Result<Arc<dyn ProviderAdapter>, InvokeError>;
}

/// Factory for adapters whose constructor needs no I/O.
macro_rules! sync_factory {
    ($factory:ident, $id:expr, $adapter:ty) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $factory;

        #[async_trait]
        impl ProviderFactory for $factory {
            fn provider_id(&self) -> &'static str {
                $id
            }

            async fn build(
                &self,
                credentials: &Credentials,
                ctx: &BuildContext,
            ) -> Result<Arc<dyn ProviderAdapter>, InvokeError> {
                Ok(Arc::new(<$adapter>::new(credentials, ctx.transport()?)?))
            }
        }
    };
}

sync_factory!(AnthropicFactory, anthropic::PROVIDER_ID, AnthropicAdapter);
sync_factory!(QwenFactory, qwen::PROVIDER_ID, QwenAdapter);
sync_factory!(KimiFactory, kimi::PROVIDER_ID, KimiAdapter);
sync_factory!(DoubaoFactory, doubao::PROVIDER_ID, DoubaoAdapter);
sync_factory!(BaichuanFactory, baichuan::PROVIDER_ID, BaichuanAdapter);
sync_factory!(MinimaxFactory, minimax::PROVIDER_ID, MinimaxAdapter);
sync_factory!(GeminiFactory, gemini::PROVIDER_ID, GeminiAdapter);

#[derive(Debug, Clone, Copy, Default)]
pub struct WenxinFactory;

#[async_trait]
impl ProviderFactory for WenxinFactory {
    fn provider_id(&self) -> &'static str {
        wenxin::PROVIDER_ID
    }

    async fn build(
        &self,
        credentials: &Credentials,
        ctx: &BuildContext,
    ) -> Result<Arc<dyn ProviderAdapter>, InvokeError> {
        Ok(Arc::new(WenxinAdapter::new(credentials, ctx.transport()?).await?))
    }
}
