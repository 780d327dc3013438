//! Test support: a recording transport and fixture helpers

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use onesdk::InvokeError;
use onesdk::execution::http::{
    HttpTransport, HttpTransportRequest, HttpTransportResponse, HttpTransportStreamResponse,
};
use reqwest::header::HeaderMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Canned reply for one `execute_stream` call.
pub struct StreamReply {
    pub status: u16,
    pub headers: HeaderMap,
    pub chunks: Vec<Vec<u8>>,
    /// Keep the body open after the chunks instead of ending it.
    pub hold_open: bool,
}

/// Records every request and answers from queues of canned replies.
#[derive(Default)]
pub struct SpyTransport {
    requests: Mutex<Vec<HttpTransportRequest>>,
    replies: Mutex<VecDeque<HttpTransportResponse>>,
    stream_replies: Mutex<VecDeque<StreamReply>>,
    body_dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl SpyTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.reply_with_headers(status, body, HeaderMap::new())
    }

    pub fn reply_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.reply(status, &body.to_string())
    }

    pub fn reply_with_headers(&self, status: u16, body: &str, headers: HeaderMap) -> &Self {
        self.replies.lock().unwrap().push_back(HttpTransportResponse {
            status,
            headers,
            body: body.as_bytes().to_vec(),
        });
        self
    }

    /// Queue a streamed body split into the given byte chunks.
    pub fn reply_stream(&self, status: u16, chunks: Vec<Vec<u8>>) -> &Self {
        self.reply_stream_with_headers(status, HeaderMap::new(), chunks)
    }

    pub fn reply_stream_with_headers(&self, status: u16, headers: HeaderMap, chunks: Vec<Vec<u8>>) -> &Self {
        self.stream_replies.lock().unwrap().push_back(StreamReply {
            status,
            headers,
            chunks,
            hold_open: false,
        });
        self
    }

    pub fn reply_stream_held_open(&self, chunks: Vec<Vec<u8>>) -> &Self {
        self.stream_replies.lock().unwrap().push_back(StreamReply {
            status: 200,
            headers: HeaderMap::new(),
            chunks,
            hold_open: true,
        });
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpTransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpTransportRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one request")
    }

    pub fn body_dropped(&self) -> bool {
        self.body_dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for SpyTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, InvokeError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| InvokeError::connection("no canned reply"))
    }

    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportStreamResponse, InvokeError> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .stream_replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| InvokeError::connection("no canned stream reply"))?;

        let flag = DropFlag(self.body_dropped.clone());
        let chunks = futures::stream::iter(reply.chunks.into_iter().map(Ok::<Vec<u8>, InvokeError>));
        let body = if reply.hold_open {
            chunks.chain(futures::stream::pending()).boxed()
        } else {
            chunks.boxed()
        };
        let body = body.map(move |chunk| {
            let _alive = &flag;
            chunk
        });
        Ok(HttpTransportStreamResponse {
            status: reply.status,
            headers: reply.headers,
            body: Box::pin(body),
        })
    }
}

/// A transport whose every call fails before any status is available.
pub struct UnreachableTransport;

#[async_trait]
impl HttpTransport for UnreachableTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, InvokeError> {
        Err(InvokeError::connection(format!("connection refused: {}", request.url)))
    }

    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportStreamResponse, InvokeError> {
        Err(InvokeError::timeout(format!("deadline exceeded: {}", request.url)))
    }
}

/// Read a fixture under `tests/fixtures/`.
pub fn fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read(&path).unwrap_or_else(|e| panic!("read {path}: {e}"))
}

/// Split bytes into fixed-size chunks so events straddle chunk boundaries.
pub fn split_every(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    bytes.chunks(size).map(<[u8]>::to_vec).collect()
}

pub fn json_body(request: &HttpTransportRequest) -> serde_json::Value {
    request
        .body
        .as_json()
        .cloned()
        .expect("request carries a JSON body")
}

pub fn query_value(request: &HttpTransportRequest, key: &str) -> Option<String> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}
