use crate::error::InvokeError;
use crate::types::HttpConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Build a `reqwest::Client` from an [`HttpConfig`].
pub fn build_http_client(cfg: &HttpConfig) -> Result<reqwest::Client, InvokeError> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = cfg.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = cfg.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(proxy_url) = &cfg.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| InvokeError::invalid_parameter(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }
    if let Some(user_agent) = &cfg.user_agent {
        builder = builder.user_agent(user_agent);
    }
    if !cfg.headers.is_empty() {
        let mut headers = HeaderMap::new();
        for (k, v) in &cfg.headers {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                InvokeError::invalid_parameter(format!("Invalid header name '{k}': {e}"))
            })?;
            let value = HeaderValue::from_str(v).map_err(|e| {
                InvokeError::invalid_parameter(format!("Invalid header value for '{k}': {e}"))
            })?;
            headers.insert(name, value);
        }
        builder = builder.default_headers(headers);
    }

    builder
        .build()
        .map_err(|e| InvokeError::generic(format!("Failed to build HTTP client: {e}")))
}
