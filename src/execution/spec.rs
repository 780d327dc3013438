//! Per-vendor error hooks
//!
//! A [`ProviderSpec`] lets an adapter look at a failed response before the
//! generic status table in [`crate::error::classify_http_error`] runs.

use crate::error::InvokeError;
use reqwest::header::HeaderMap;

pub trait ProviderSpec: Send + Sync {
    fn id(&self) -> &'static str;

    /// Vendor pre-check for non-2xx responses. `None` falls back to the
    /// generic table.
    fn classify_http_error(
        &self,
        _status: u16,
        _body_text: &str,
        _headers: &HeaderMap,
    ) -> Option<InvokeError> {
        None
    }

    /// Vendor pre-check for failures reported inside a 2xx JSON body.
    fn classify_body_error(&self, _body: &serde_json::Value) -> Option<InvokeError> {
        None
    }
}

/// Spec with no vendor hooks.
#[derive(Debug, Clone, Copy)]
pub struct BasicSpec(pub &'static str);

impl ProviderSpec for BasicSpec {
    fn id(&self) -> &'static str {
        self.0
    }
}

/// Run the vendor hook, then the generic table.
pub fn classify_with_spec(
    spec: &dyn ProviderSpec,
    status: u16,
    body_text: &str,
    headers: &HeaderMap,
) -> InvokeError {
    spec.classify_http_error(status, body_text, headers)
        .unwrap_or_else(|| crate::error::classify_http_error(spec.id(), status, body_text, headers))
}
