//! Execution layer
//!
//! - `http`: the transport seam and the default reqwest transport
//! - `spec`: per-vendor error classification hooks
//! - `executor`: status checks, classification and JSON decoding

pub mod executor;
pub mod http;
pub mod spec;

pub use executor::{ExecRequest, HttpExecutor};
pub use spec::{BasicSpec, ProviderSpec, classify_with_spec};
