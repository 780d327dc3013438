//! Request execution
//!
//! [`HttpExecutor`] turns an [`ExecRequest`] into one transport call,
//! checks the status, and classifies failures through the provider's
//! [`ProviderSpec`]. Adapters build requests; the executor owns the rest.

use super::http::{
    HttpBody, HttpRequestContext, HttpTransport, HttpTransportRequest, HttpTransportResponse,
    HttpTransportStreamBody, MultipartForm,
};
use super::spec::{ProviderSpec, classify_with_spec};
use crate::error::InvokeError;
use futures::StreamExt;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

/// Upper bound on how much of a failed stream body is read for classification.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// `application/json` exactly; event streams and NDJSON are left alone.
fn is_plain_json(headers: &HeaderMap) -> bool {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// An adapter-side request description.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: HttpBody,
}

impl ExecRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: HttpBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        let mut req = Self::new(Method::POST, url);
        req.body = HttpBody::Json(body);
        req
    }

    pub fn post_multipart(url: impl Into<String>, form: MultipartForm) -> Self {
        let mut req = Self::new(Method::POST, url);
        req.body = HttpBody::Multipart(form);
        req
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("authorization", format!("Bearer {token}"))
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    fn into_transport(self, provider_id: &str, stream: bool) -> Result<HttpTransportRequest, InvokeError> {
        let mut headers = HeaderMap::new();
        for (k, v) in &self.headers {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                InvokeError::invalid_parameter(format!("Invalid header name '{k}': {e}"))
            })?;
            let value = HeaderValue::from_str(v).map_err(|_| {
                InvokeError::invalid_parameter(format!("Invalid header value for '{k}'"))
            })?;
            headers.insert(name, value);
        }
        Ok(HttpTransportRequest {
            ctx: HttpRequestContext::new(provider_id, &self.url, stream),
            method: self.method,
            url: self.url,
            headers,
            query: self.query,
            body: self.body,
        })
    }
}

#[derive(Clone)]
pub struct HttpExecutor {
    spec: Arc<dyn ProviderSpec>,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("provider", &self.spec.id())
            .finish_non_exhaustive()
    }
}

impl HttpExecutor {
    pub fn new(spec: Arc<dyn ProviderSpec>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { spec, transport }
    }

    pub fn provider_id(&self) -> &'static str {
        self.spec.id()
    }

    pub fn spec(&self) -> &dyn ProviderSpec {
        self.spec.as_ref()
    }

    /// Vendor hook first, then the generic status table.
    pub fn classify(&self, status: u16, body_text: &str, headers: &HeaderMap) -> InvokeError {
        classify_with_spec(self.spec.as_ref(), status, body_text, headers)
    }

    /// Send and return the raw 2xx response.
    pub async fn send(&self, request: ExecRequest) -> Result<HttpTransportResponse, InvokeError> {
        let request = request.into_transport(self.provider_id(), false)?;
        tracing::debug!(
            target: "onesdk::http",
            provider = %request.ctx.provider_id,
            url = %request.ctx.url,
            stream = false,
            request_id = %request.ctx.request_id,
            "sending request"
        );
        let resp = self.transport.execute(request).await?;
        if !resp.is_success() {
            let error = self.classify(resp.status, &resp.text(), &resp.headers);
            tracing::debug!(
                target: "onesdk::http",
                provider = self.provider_id(),
                status = resp.status,
                kind = ?error.kind(),
                "request failed"
            );
            return Err(error);
        }
        Ok(resp)
    }

    /// Send and decode a JSON body, running the in-body error pre-check.
    pub async fn send_json(&self, request: ExecRequest) -> Result<serde_json::Value, InvokeError> {
        let resp = self.send(request).await?;
        let value: serde_json::Value = serde_json::from_slice(&resp.body).map_err(|e| {
            InvokeError::generic(format!(
                "provider={} invalid JSON response: {e}",
                self.provider_id()
            ))
        })?;
        self.check_body(value)
    }

    pub async fn send_bytes(&self, request: ExecRequest) -> Result<Vec<u8>, InvokeError> {
        Ok(self.send(request).await?.body)
    }

    /// Reject a 2xx body that carries a vendor error.
    pub fn check_body(&self, value: serde_json::Value) -> Result<serde_json::Value, InvokeError> {
        match self.spec.classify_body_error(&value) {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }

    /// A stream request answered with a plain JSON document: read it whole,
    /// reject a vendor error, and hand the value on as one compact line.
    async fn buffer_json_stream(
        &self,
        mut body: HttpTransportStreamBody,
    ) -> Result<HttpTransportStreamBody, InvokeError> {
        let mut buf = Vec::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        let line = match serde_json::from_slice::<serde_json::Value>(&buf) {
            Ok(value) => {
                let value = self.check_body(value)?;
                let mut line = value.to_string().into_bytes();
                line.push(b'\n');
                line
            }
            // several JSON lines under a JSON content type
            Err(_) => buf,
        };
        tracing::debug!(
            target: "onesdk::http",
            provider = self.provider_id(),
            bytes = line.len(),
            "stream answered with a JSON body"
        );
        Ok(Box::pin(futures::stream::once(async move { Ok(line) })))
    }

    /// Open a streamed request. A non-2xx status is read, classified and
    /// returned as an error; the stream itself is never handed out.
    pub async fn open_stream(
        &self,
        request: ExecRequest,
    ) -> Result<HttpTransportStreamBody, InvokeError> {
        let request = request.into_transport(self.provider_id(), true)?;
        tracing::debug!(
            target: "onesdk::http",
            provider = %request.ctx.provider_id,
            url = %request.ctx.url,
            stream = true,
            request_id = %request.ctx.request_id,
            "sending request"
        );
        let resp = self.transport.execute_stream(request).await?;
        if (200..300).contains(&resp.status) {
            if is_plain_json(&resp.headers) {
                return self.buffer_json_stream(resp.body).await;
            }
            return Ok(resp.body);
        }

        let mut body = Vec::new();
        let mut chunks = resp.body;
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => body.extend_from_slice(&bytes),
                Err(_) => break,
            }
            if body.len() >= MAX_ERROR_BODY {
                break;
            }
        }
        let error = self.classify(resp.status, &String::from_utf8_lossy(&body), &resp.headers);
        tracing::debug!(
            target: "onesdk::http",
            provider = self.provider_id(),
            status = resp.status,
            kind = ?error.kind(),
            "stream request failed"
        );
        Err(error)
    }
}
