use crate::error::{ErrorKind, InvokeError, classify_http_error, parse_retry_after};
use crate::execution::ProviderSpec;
use reqwest::header::HeaderMap;

/// Refine the generic classification using the OpenAI error envelope
/// `{ "error": { "message", "type", "code" } }`.
///
/// Returns `None` when the envelope is absent or its `type` does not change
/// the outcome, so callers fall back to the generic table.
pub fn classify_openai_compatible_http_error(
    provider: &str,
    status: u16,
    body_text: &str,
    headers: &HeaderMap,
) -> Option<InvokeError> {
    let json: serde_json::Value = serde_json::from_str(body_text).ok()?;
    let error_type = json.pointer("/error/type")?.as_str()?;

    let kind = match error_type {
        "authentication_error" | "invalid_authentication_error" | "permission_denied_error" => {
            ErrorKind::Authorization
        }
        "rate_limit_error" | "rate_limit_reached_error" | "engine_overloaded_error" => {
            ErrorKind::RateLimit
        }
        "server_error" => ErrorKind::ServerUnavailable,
        _ => return None,
    };

    let base = classify_http_error(provider, status, body_text, headers);
    if base.kind() == kind || base.kind() == ErrorKind::ModelNotFound {
        return None;
    }
    let detail = base.detail()?.clone();
    Some(match InvokeError::from_kind(kind, detail) {
        InvokeError::RateLimit { detail, .. } => InvokeError::RateLimit {
            detail,
            retry_after: parse_retry_after(headers),
        },
        other => other,
    })
}

/// Spec for OpenAI-compatible vendors.
#[derive(Debug, Clone, Copy)]
pub struct OpenAiCompatibleSpec(pub &'static str);

impl ProviderSpec for OpenAiCompatibleSpec {
    fn id(&self) -> &'static str {
        self.0
    }

    fn classify_http_error(
        &self,
        status: u16,
        body_text: &str,
        headers: &HeaderMap,
    ) -> Option<InvokeError> {
        classify_openai_compatible_http_error(self.0, status, body_text, headers)
    }
}
