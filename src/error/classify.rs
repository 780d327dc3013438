//! HTTP failure classification
//!
//! Maps non-2xx responses and transport failures onto the canonical
//! [`InvokeError`] kinds. Everything here is pure: no I/O, no retries, no
//! hidden state, so classifying the same input twice yields equal errors.

use super::types::{ErrorDetail, InvokeError};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::HeaderMap;
use std::time::Duration;

lazy_static! {
    /// Error codes such as `model_not_found` or `ModelNotExist`.
    static ref MODEL_NOT_FOUND_CODE: Regex =
        Regex::new(r"(?i)model[\s_.-]?(not[\s_-]?found|not[\s_-]?exists?|does[\s_-]?not[\s_-]?exist)")
            .expect("static regex");
    /// Vendor messages; the gap between the two phrases is bounded.
    static ref MODEL_NOT_FOUND_MESSAGE: Regex = Regex::new(
        r"(?i)\bmodels?\b[^\n]{0,80}?\b(not[\s_-]?found|does\s?n[o']t\s+exist|not\s+exists?)\b|\bnot[\s_-]?found\b[^\n]{0,20}?\bmodels?\b|\bno\s+such\s+model\b"
    )
    .expect("static regex");
    static ref MODEL_WORD: Regex = Regex::new(r"(?i)\bmodels?\b").expect("static regex");
}

const REQUEST_ID_HEADERS: [&str; 5] = [
    "x-request-id",
    "request-id",
    "x-trace-id",
    "x-tt-logid",
    "x-goog-request-id",
];

/// Classify an HTTP failure using the generic status-code table.
///
/// Vendor-specific pre-checks run before this (see
/// `execution::ProviderSpec::classify_http_error`); this is the fallback
/// every adapter shares.
pub fn classify_http_error(
    provider_id: &str,
    status: u16,
    body_text: &str,
    headers: &HeaderMap,
) -> InvokeError {
    let parsed = serde_json::from_str::<serde_json::Value>(body_text).ok();
    let (vendor_message, vendor_code) = parsed
        .as_ref()
        .map(extract_vendor_error)
        .unwrap_or((None, None));

    let body_sample: String = body_text.chars().take(200).collect();
    let message = vendor_message.unwrap_or_else(|| {
        if body_sample.trim().is_empty() {
            format!("provider={provider_id} http={status}")
        } else {
            body_sample.clone()
        }
    });

    let request_ids: Vec<String> = REQUEST_ID_HEADERS
        .iter()
        .filter_map(|k| {
            headers
                .get(*k)
                .and_then(|v| v.to_str().ok())
                .map(|v| format!("{k}={v}"))
        })
        .collect();
    let details = match parsed {
        Some(json) => serde_json::json!({
            "provider": provider_id,
            "status": status,
            "response": json,
            "request_ids": request_ids,
        }),
        None => serde_json::json!({
            "provider": provider_id,
            "status": status,
            "raw": body_text,
            "request_ids": request_ids,
        }),
    };

    let code = vendor_code.as_deref().unwrap_or_default();
    let missing_model = MODEL_NOT_FOUND_CODE.is_match(code)
        || (status == 404
            && (signals_missing_model(&message)
                || (code.to_ascii_lowercase().contains("not_found") && MODEL_WORD.is_match(&message))));
    let detail = ErrorDetail::new(message)
        .with_status(status)
        .with_code(vendor_code)
        .with_details(details);

    if missing_model {
        return InvokeError::model_not_found(detail);
    }

    match status {
        429 => InvokeError::RateLimit {
            detail,
            retry_after: parse_retry_after(headers),
        },
        401 | 403 => InvokeError::Authorization(detail),
        500.. => InvokeError::ServerUnavailable(detail),
        400..=499 => InvokeError::BadRequest(detail),
        _ => InvokeError::Generic(detail),
    }
}

/// Classify a failure that happened before any HTTP status was available.
pub fn classify_transport_error(provider_id: &str, err: &reqwest::Error) -> InvokeError {
    let message = format!("provider={provider_id} {err}");
    if err.is_timeout() {
        InvokeError::timeout(message)
    } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
        InvokeError::connection(message)
    } else {
        InvokeError::generic(message)
    }
}

/// Classify an error carried by a 2xx body or a stream event, where no
/// useful HTTP status exists. Well-known vendor error types pick the kind;
/// anything else is `Generic`.
pub fn classify_event_error(provider_id: &str, body: &serde_json::Value) -> InvokeError {
    let (message, code) = extract_vendor_error(body);
    let message = message.unwrap_or_else(|| format!("provider={provider_id} error event"));
    let detail = ErrorDetail::new(message.clone())
        .with_code(code.clone())
        .with_details(serde_json::json!({"provider": provider_id, "response": body}));
    let code_lower = code.as_deref().unwrap_or_default().to_ascii_lowercase();
    match code_lower.as_str() {
        "overloaded_error" | "server_error" | "internal" | "unavailable" => {
            InvokeError::ServerUnavailable(detail)
        }
        c if c == "rate_limit_error" || c == "resource_exhausted" || c.starts_with("throttling") => {
            InvokeError::RateLimit {
                detail,
                retry_after: None,
            }
        }
        "authentication_error" | "permission_error" | "invalidapikey" | "unauthenticated" => {
            InvokeError::Authorization(detail)
        }
        "invalid_request_error" | "invalidparameter" | "invalid_argument" => {
            if signals_missing_model(&message) {
                InvokeError::model_not_found(detail)
            } else {
                InvokeError::BadRequest(detail)
            }
        }
        c if MODEL_NOT_FOUND_CODE.is_match(c) || signals_missing_model(&message) => {
            InvokeError::model_not_found(detail)
        }
        _ => InvokeError::Generic(detail),
    }
}

/// Whether a vendor message reads like a "model not found" rejection.
pub fn signals_missing_model(message: &str) -> bool {
    MODEL_NOT_FOUND_MESSAGE.is_match(message)
}

/// Parse a `Retry-After` header given in (possibly fractional) seconds.
///
/// HTTP-date values are ignored: turning them into a delay would depend on
/// the current clock.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get("retry-after")?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(Duration::from_secs_f64)
}

/// Pull a message and an error code out of the common vendor envelopes.
pub fn extract_vendor_error(body: &serde_json::Value) -> (Option<String>, Option<String>) {
    if let Some(err) = body.get("error") {
        if let Some(text) = err.as_str() {
            return (Some(text.to_string()), None);
        }
        if err.is_object() {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string);
            let code = err
                .get("code")
                .and_then(|c| c.as_str())
                .or_else(|| err.get("status").and_then(|s| s.as_str()))
                .or_else(|| err.get("type").and_then(|t| t.as_str()))
                .map(str::to_string)
                .or_else(|| err.get("code").and_then(value_as_code));
            return (message, code);
        }
    }

    let message = ["message", "error_msg", "msg"]
        .iter()
        .find_map(|k| body.get(*k).and_then(|v| v.as_str()))
        .or_else(|| body.pointer("/base_resp/status_msg").and_then(|v| v.as_str()))
        .map(str::to_string);
    let code = ["code", "error_code"]
        .iter()
        .find_map(|k| body.get(*k).and_then(value_as_code))
        .or_else(|| body.pointer("/base_resp/status_code").and_then(value_as_code));
    (message, code)
}

fn value_as_code(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
