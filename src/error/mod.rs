//! Error Handling Module
//!
//! This module provides the canonical error taxonomy shared by every provider:
//! - Core error types (`InvokeError`, `ErrorKind`, `ErrorDetail`)
//! - The pure HTTP/transport classifier (`classify_http_error`)
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust
//! use onesdk::error::{classify_http_error, ErrorKind};
//! use reqwest::header::HeaderMap;
//!
//! let error = classify_http_error("kimi", 401, "{}", &HeaderMap::new());
//! assert_eq!(error.kind(), ErrorKind::Authorization);
//! ```

// Module declarations
pub mod classify;
mod conversions;
pub mod types;

// Re-exports for public API
pub use classify::*;
pub use types::*;
