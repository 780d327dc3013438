//! Provider credentials
//!
//! A flat bag of vendor secrets handed to an adapter at construction.
//! Secrets are wrapped in [`SecretString`] so they never show up in `Debug`
//! output or logs.

use crate::error::InvokeError;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub api_key: Option<SecretString>,
    pub secret_key: Option<SecretString>,
    pub access_token: Option<SecretString>,
    pub group_id: Option<String>,
    pub base_url: Option<String>,
    /// Vendor-specific keys not covered above.
    pub extra: HashMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a key/value map. `api_url` is accepted for `base_url`.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        let mut creds = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "api_key" => creds.api_key = Some(SecretString::from(value)),
                "secret_key" => creds.secret_key = Some(SecretString::from(value)),
                "access_token" => creds.access_token = Some(SecretString::from(value)),
                "group_id" => creds.group_id = Some(value),
                "base_url" | "api_url" => creds.base_url = Some(value),
                _ => {
                    creds.extra.insert(key, value);
                }
            }
        }
        creds
    }

    /// Read the vendor's conventional environment variables.
    pub fn from_env(provider: &str) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        let mut creds = Self::default();
        let (key_var, secret_var, group_var) = match provider.to_ascii_lowercase().as_str() {
            "anthropic" => ("ANTHROPIC_API_KEY", None, None),
            "qwen" => ("DASHSCOPE_API_KEY", None, None),
            "kimi" => ("MOONSHOT_API_KEY", None, None),
            "doubao" => ("DOUBAO_API_KEY", None, None),
            "baichuan" => ("BAICHUAN_API_KEY", None, None),
            "minimax" => ("MINIMAX_API_KEY", None, Some("MINIMAX_GROUP_ID")),
            "gemini" => ("GEMINI_API_KEY", None, None),
            "wenxin" => ("WENXIN_API_KEY", Some("WENXIN_SECRET_KEY"), None),
            _ => return creds,
        };
        creds.api_key = var(key_var).map(SecretString::from);
        creds.secret_key = secret_var.and_then(var).map(SecretString::from);
        creds.group_id = group_var.and_then(var);
        creds
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_secret_key(mut self, key: impl Into<String>) -> Self {
        self.secret_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn require_api_key(&self, provider: &str) -> Result<String, InvokeError> {
        require_secret(self.api_key.as_ref(), provider, "api_key")
    }

    pub fn require_secret_key(&self, provider: &str) -> Result<String, InvokeError> {
        require_secret(self.secret_key.as_ref(), provider, "secret_key")
    }

    pub fn require_group_id(&self, provider: &str) -> Result<String, InvokeError> {
        self.group_id
            .clone()
            .filter(|g| !g.is_empty())
            .ok_or_else(|| missing(provider, "group_id"))
    }

    pub fn access_token_value(&self) -> Option<String> {
        self.access_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Base URL override, or the vendor default.
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

fn require_secret(
    secret: Option<&SecretString>,
    provider: &str,
    key: &str,
) -> Result<String, InvokeError> {
    secret
        .map(|s| s.expose_secret().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing(provider, key))
}

fn missing(provider: &str, key: &str) -> InvokeError {
    InvokeError::invalid_parameter(format!(
        "Missing required credential '{key}' for provider {provider}"
    ))
}
