//! HTTP transport abstraction
//!
//! Adapters never touch `reqwest` directly; they hand a fully prepared
//! request to an [`HttpTransport`]. Tests substitute a recording transport
//! through the same seam.
//!
//! Non-2xx statuses come back as ordinary responses. Only failures with no
//! status (DNS, refused connection, deadline) are errors, and those are
//! already classified as `Connection` or `Timeout`.

use crate::error::{InvokeError, classify_transport_error};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::Method;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, HeaderMap, HeaderValue};
use std::pin::Pin;

/// Describes one outbound request for logging and spies.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub request_id: String,
    pub provider_id: String,
    pub url: String,
    pub stream: bool,
}

impl HttpRequestContext {
    pub fn new(provider_id: &str, url: &str, stream: bool) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            provider_id: provider_id.to_string(),
            url: url.to_string(),
            stream,
        }
    }
}

/// File part of a multipart form.
#[derive(Debug, Clone)]
pub struct MultipartFile {
    pub field: String,
    pub filename: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file: Option<MultipartFile>,
}

impl MultipartForm {
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, file: MultipartFile) -> Self {
        self.file = Some(file);
        self
    }
}

#[derive(Debug, Clone)]
pub enum HttpBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl HttpBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub ctx: HttpRequestContext,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: HttpBody,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpTransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Byte chunks of a streamed body. Dropping it releases the connection.
pub type HttpTransportStreamBody =
    Pin<Box<dyn Stream<Item = Result<Vec<u8>, InvokeError>> + Send>>;

pub struct HttpTransportStreamResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: HttpTransportStreamBody,
}

impl std::fmt::Debug for HttpTransportStreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportStreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, InvokeError>;

    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportStreamResponse, InvokeError>;
}

/// Default transport backed by a shared `reqwest::Client` (connection pool).
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    stream_disable_compression: bool,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            stream_disable_compression: true,
        }
    }

    pub fn from_config(config: &crate::types::HttpConfig) -> Result<Self, InvokeError> {
        Ok(Self {
            client: super::client::build_http_client(config)?,
            stream_disable_compression: config.stream_disable_compression,
        })
    }

    fn build(&self, request: HttpTransportRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        match request.body {
            HttpBody::Empty => builder,
            HttpBody::Json(body) => builder.json(&body),
            HttpBody::Multipart(form) => builder.multipart(into_reqwest_form(form)),
        }
    }
}

fn into_reqwest_form(form: MultipartForm) -> reqwest::multipart::Form {
    let mut out = reqwest::multipart::Form::new();
    for (name, value) in form.fields {
        out = out.text(name, value);
    }
    if let Some(file) = form.file {
        let part = reqwest::multipart::Part::bytes(file.content.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)
            .unwrap_or_else(|_| {
                reqwest::multipart::Part::bytes(file.content).file_name(file.filename)
            });
        out = out.part(file.field, part);
    }
    out
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, InvokeError> {
        let provider = request.ctx.provider_id.clone();
        let resp = self
            .build(request)
            .send()
            .await
            .map_err(|e| classify_transport_error(&provider, &e))?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| classify_transport_error(&provider, &e))?
            .to_vec();
        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_stream(
        &self,
        mut request: HttpTransportRequest,
    ) -> Result<HttpTransportStreamResponse, InvokeError> {
        let provider = request.ctx.provider_id.clone();
        if !request.headers.contains_key(ACCEPT) {
            request
                .headers
                .insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        }
        if self.stream_disable_compression {
            request
                .headers
                .insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        }
        let resp = self
            .build(request)
            .send()
            .await
            .map_err(|e| classify_transport_error(&provider, &e))?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes_stream().map(move |chunk| {
            chunk
                .map(|b| b.to_vec())
                .map_err(|e| classify_transport_error(&provider, &e))
        });
        Ok(HttpTransportStreamResponse {
            status,
            headers,
            body: Box::pin(body),
        })
    }
}
