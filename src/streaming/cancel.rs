//! Cancellation utilities
//!
//! First-class cancellation handles for chunk streams.

use super::ChunkStream;
use crate::error::InvokeError;
use futures::StreamExt;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. The wrapped stream ends at its next poll and
    /// drops the transport body, which closes the HTTP connection.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A chunk stream paired with its cancel handle.
pub struct ChunkStreamHandle {
    pub stream: ChunkStream,
    pub cancel: CancelHandle,
}

impl std::fmt::Debug for ChunkStreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStreamHandle")
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

/// Wrap a handshake future so that cancellation aborts the handshake as
/// well as the chunk stream it produces.
pub fn make_cancellable_stream_handle_from_future<F>(future: F) -> ChunkStreamHandle
where
    F: Future<Output = Result<ChunkStream, InvokeError>> + Send + 'static,
{
    let cancel = CancelHandle::new();
    let token = cancel.token.clone();
    let handshake = Box::pin(future);

    let s = async_stream::stream! {
        let res = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            res = handshake => res,
        };

        let mut inner = match res {
            Ok(s) => s,
            Err(e) => {
                yield Err(e);
                return;
            }
        };

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                item = inner.next() => {
                    let Some(item) = item else { break };
                    yield item;
                }
            }
        }
    };

    ChunkStreamHandle {
        stream: Box::pin(s),
        cancel,
    }
}
