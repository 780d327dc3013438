//! HTTP plumbing: client construction and the transport seam.

pub mod client;
pub mod transport;

pub use client::build_http_client;
pub use transport::{
    HttpBody, HttpRequestContext, HttpTransport, HttpTransportRequest, HttpTransportResponse,
    HttpTransportStreamBody, HttpTransportStreamResponse, MultipartFile, MultipartForm,
    ReqwestTransport,
};
