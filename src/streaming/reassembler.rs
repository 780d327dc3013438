//! Stream reassembly
//!
//! Turns a vendor's line-oriented byte stream into a lazy sequence of
//! [`CanonicalChunk`]s. The body is read through
//! `StreamReader` + `FramedRead<_, LinesCodec>`, so lines split across
//! chunks and multibyte characters are joined before framing applies:
//!
//! - `ServerSentEvents`: `data:` lines carry one JSON event each; blank
//!   lines, `event:`/`id:` fields, comments and the `[DONE]` sentinel are
//!   skipped. A line that is itself a bare JSON object is passed through,
//!   since vendors answer a failed stream request with a plain error body.
//! - `JsonLines`: every non-empty line is a bare JSON object.
//!
//! A line that is not valid JSON is logged and dropped. A transport error
//! or a vendor error event is yielded once and ends the sequence. The
//! sequence otherwise ends at EOF. Dropping it drops the transport body.

use super::ChunkStream;
use crate::error::InvokeError;
use crate::execution::http::HttpTransportStreamBody;
use crate::types::CanonicalChunk;
use futures::StreamExt;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFraming {
    ServerSentEvents,
    JsonLines,
}

impl LineFraming {
    /// Payload of a line, or `None` when the line carries no event.
    pub fn payload<'a>(&self, line: &'a str) -> Option<&'a str> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let payload = match self {
            Self::ServerSentEvents if line.starts_with('{') => line,
            Self::ServerSentEvents => line.strip_prefix("data:")?.trim(),
            Self::JsonLines => line,
        };
        if payload.is_empty() || payload == "[DONE]" {
            None
        } else {
            Some(payload)
        }
    }
}

/// Per-vendor event normalization.
pub trait StreamEventConverter: Send + 'static {
    /// `Ok(None)` skips events with no user-visible delta. `Err` ends the
    /// stream after being yielded.
    fn convert(&mut self, event: serde_json::Value) -> Result<Option<CanonicalChunk>, InvokeError>;
}

impl<F> StreamEventConverter for F
where
    F: FnMut(serde_json::Value) -> Result<Option<CanonicalChunk>, InvokeError> + Send + 'static,
{
    fn convert(&mut self, event: serde_json::Value) -> Result<Option<CanonicalChunk>, InvokeError> {
        self(event)
    }
}

enum LineOutcome {
    Skip,
    Chunk(CanonicalChunk),
    Fail(InvokeError),
}

fn process_line<C: StreamEventConverter>(
    provider: &str,
    framing: LineFraming,
    converter: &mut C,
    line: &str,
) -> LineOutcome {
    let Some(payload) = framing.payload(line) else {
        return LineOutcome::Skip;
    };
    let event = match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(v) => v,
        Err(e) => {
            let sample: String = payload.chars().take(120).collect();
            tracing::warn!(
                target: "onesdk::stream",
                provider,
                line = %sample,
                error = %e,
                "dropping unparseable stream line"
            );
            return LineOutcome::Skip;
        }
    };
    match converter.convert(event) {
        Ok(Some(chunk)) => LineOutcome::Chunk(chunk),
        Ok(None) => LineOutcome::Skip,
        Err(e) => LineOutcome::Fail(e),
    }
}

/// Recover the transport error carried through the reader, or describe the
/// codec failure.
fn read_error(provider: &str, error: LinesCodecError) -> InvokeError {
    let io = match error {
        LinesCodecError::Io(io) => io,
        other => {
            return InvokeError::generic(format!("provider={provider} stream read failed: {other}"));
        }
    };
    let text = io.to_string();
    match io.into_inner().map(|inner| inner.downcast::<InvokeError>()) {
        Some(Ok(err)) => *err,
        _ => InvokeError::generic(format!("provider={provider} stream read failed: {text}")),
    }
}

/// Build the canonical chunk stream over a transport body.
pub fn reassemble<C: StreamEventConverter>(
    provider: &'static str,
    body: HttpTransportStreamBody,
    framing: LineFraming,
    converter: C,
) -> ChunkStream {
    let bytes = body.map(|chunk| {
        chunk
            .map(bytes::Bytes::from)
            .map_err(std::io::Error::other)
    });
    let mut lines = FramedRead::new(StreamReader::new(bytes), LinesCodec::new());
    let mut converter = converter;

    let s = async_stream::stream! {
        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    yield Err(read_error(provider, e));
                    break;
                }
            };
            match process_line(provider, framing, &mut converter, &line) {
                LineOutcome::Skip => {}
                LineOutcome::Chunk(chunk) => yield Ok(chunk),
                LineOutcome::Fail(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    };
    Box::pin(s)
}
