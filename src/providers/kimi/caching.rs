//! Moonshot context caching and cache tags.

use super::client::KimiAdapter;
use crate::error::InvokeError;
use crate::execution::ExecRequest;
use crate::standards::openai::to_openai_messages;
use crate::types::Message;
use crate::utils::inline_images;
use reqwest::Method;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Body of `POST caching`.
#[derive(Debug, Clone, Default)]
pub struct KimiCacheRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Option<Value>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub metadata: BTreeMap<String, String>,
    /// Absolute expiry (unix seconds); takes precedence over `ttl`.
    pub expired_at: Option<i64>,
    pub ttl: Option<u64>,
}

/// Body of `PUT caching/{id}`.
#[derive(Debug, Clone, Default)]
pub struct KimiCacheUpdate {
    pub metadata: BTreeMap<String, String>,
    pub expired_at: Option<i64>,
    pub ttl: Option<u64>,
}

/// Pagination for cache and tag listings.
#[derive(Debug, Clone)]
pub struct CacheListQuery {
    pub limit: u32,
    pub order: String,
    pub after: Option<String>,
    pub before: Option<String>,
    /// Sent as `metadata[key]=value`; only used for cache listings.
    pub metadata: BTreeMap<String, String>,
}

impl Default for CacheListQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            order: "desc".to_string(),
            after: None,
            before: None,
            metadata: BTreeMap::new(),
        }
    }
}

impl CacheListQuery {
    fn apply(&self, mut request: ExecRequest, with_metadata: bool) -> ExecRequest {
        request = request
            .query("limit", self.limit.to_string())
            .query("order", self.order.clone());
        if let Some(after) = &self.after {
            request = request.query("after", after.clone());
        }
        if let Some(before) = &self.before {
            request = request.query("before", before.clone());
        }
        if with_metadata {
            for (k, v) in &self.metadata {
                request = request.query(format!("metadata[{k}]"), v.clone());
            }
        }
        request
    }
}

fn insert_expiry(body: &mut Map<String, Value>, expired_at: Option<i64>, ttl: Option<u64>) {
    if let Some(at) = expired_at {
        body.insert("expired_at".into(), json!(at));
    } else if let Some(ttl) = ttl {
        body.insert("ttl".into(), json!(ttl));
    }
}

impl KimiAdapter {
    async fn call(&self, request: ExecRequest) -> Result<Value, InvokeError> {
        self.executor.send_json(self.authed(request)).await
    }

    pub async fn create_cache(&self, request: KimiCacheRequest) -> Result<Value, InvokeError> {
        crate::utils::validate_request(&request.model, &request.messages)?;
        let messages = inline_images(&request.messages).await?;
        let mut body = Map::new();
        body.insert("model".into(), json!(request.model));
        body.insert("messages".into(), Value::Array(to_openai_messages(&messages)));
        if let Some(tools) = request.tools {
            body.insert("tools".into(), tools);
        }
        if let Some(name) = request.name {
            body.insert("name".into(), json!(name));
        }
        if let Some(description) = request.description {
            body.insert("description".into(), json!(description));
        }
        if !request.metadata.is_empty() {
            body.insert("metadata".into(), json!(request.metadata));
        }
        insert_expiry(&mut body, request.expired_at, request.ttl);
        self.call(ExecRequest::post_json(self.url("caching"), Value::Object(body)))
            .await
    }

    pub async fn list_caches(&self, query: &CacheListQuery) -> Result<Value, InvokeError> {
        self.call(query.apply(ExecRequest::get(self.url("caching")), true))
            .await
    }

    pub async fn get_cache(&self, cache_id: &str) -> Result<Value, InvokeError> {
        self.call(ExecRequest::get(self.url(&format!("caching/{cache_id}"))))
            .await
    }

    pub async fn update_cache(&self, cache_id: &str, update: KimiCacheUpdate) -> Result<Value, InvokeError> {
        let mut body = Map::new();
        if !update.metadata.is_empty() {
            body.insert("metadata".into(), json!(update.metadata));
        }
        insert_expiry(&mut body, update.expired_at, update.ttl);
        let mut request = ExecRequest::new(Method::PUT, self.url(&format!("caching/{cache_id}")));
        request.body = crate::execution::http::HttpBody::Json(Value::Object(body));
        self.call(request).await
    }

    pub async fn delete_cache(&self, cache_id: &str) -> Result<Value, InvokeError> {
        self.call(ExecRequest::delete(self.url(&format!("caching/{cache_id}"))))
            .await
    }

    pub async fn create_tag(&self, tag: &str, cache_id: &str) -> Result<Value, InvokeError> {
        let body = json!({"tag": tag, "cache_id": cache_id});
        self.call(ExecRequest::post_json(self.url("caching/refs/tags"), body))
            .await
    }

    pub async fn list_tags(&self, query: &CacheListQuery) -> Result<Value, InvokeError> {
        self.call(query.apply(ExecRequest::get(self.url("caching/refs/tags")), false))
            .await
    }

    pub async fn get_tag(&self, tag: &str) -> Result<Value, InvokeError> {
        self.call(ExecRequest::get(self.url(&format!("caching/refs/tags/{tag}"))))
            .await
    }

    pub async fn delete_tag(&self, tag: &str) -> Result<Value, InvokeError> {
        self.call(ExecRequest::delete(self.url(&format!("caching/refs/tags/{tag}"))))
            .await
    }

    /// Cache content behind a tag.
    pub async fn get_tag_content(&self, tag: &str) -> Result<Value, InvokeError> {
        self.call(ExecRequest::get(
            self.url(&format!("caching/refs/tags/{tag}/content")),
        ))
        .await
    }
}
