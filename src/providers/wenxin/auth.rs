use super::PROVIDER_ID;
use crate::error::{ErrorDetail, InvokeError};
use crate::execution::{ExecRequest, HttpExecutor};
use crate::utils::join_url;
use serde_json::Value;

/// Exchange the API key and secret key for an access token
/// (`grant_type=client_credentials`).
pub async fn fetch_access_token(
    executor: &HttpExecutor,
    base_url: &str,
    api_key: &str,
    secret_key: &str,
) -> Result<String, InvokeError> {
    let request = ExecRequest::get(join_url(base_url, "oauth/2.0/token"))
        .query("grant_type", "client_credentials")
        .query("client_id", api_key)
        .query("client_secret", secret_key);
    let raw = executor.send_json(request).await?;
    if let Some(description) = raw.get("error_description").and_then(Value::as_str) {
        return Err(InvokeError::Authorization(
            ErrorDetail::new(description.to_string())
                .with_code(raw.get("error").and_then(Value::as_str).map(str::to_string)),
        ));
    }
    raw.get("access_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            InvokeError::Authorization(ErrorDetail::new(format!(
                "provider={PROVIDER_ID} token response has no access_token"
            )))
        })
}
