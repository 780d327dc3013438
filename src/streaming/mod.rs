//! Streaming
//!
//! Vendor framing, event conversion and cancellation for
//! streamed generations.

pub mod cancel;
pub mod reassembler;

use crate::error::InvokeError;
use crate::types::CanonicalChunk;
use futures::Stream;
use std::pin::Pin;

/// Lazy, finite, non-restartable sequence of canonical chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<CanonicalChunk, InvokeError>> + Send>>;

pub use cancel::{CancelHandle, ChunkStreamHandle, make_cancellable_stream_handle_from_future};
pub use reassembler::{LineFraming, StreamEventConverter, reassemble};
