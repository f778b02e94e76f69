//! Decoded events as a `Stream`

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::stream::{Stream, StreamExt};
use tracing::{debug, warn};

use super::source::{BodySource, ChunkStream};
use crate::config::DecoderConfig;
use crate::decoder::{SseDecoder, SseEvent};
use crate::error::{Result, SseError};

/// A stream of decoded events read from a body
///
/// Implements `Stream<Item = Result<SseEvent, SseError>>`, for callers that
/// prefer pulling events over registering handlers.
///
/// # Lifecycle
///
/// - Every event completed by a chunk is yielded before the next chunk is read
/// - When the body ends, a trailing event without a closing blank line is
///   yielded last
/// - A read error is yielded once, then the stream ends
///
/// # Example
///
/// ```ignore
/// let mut events = SseEventStream::new(response)?;
///
/// while let Some(event) = events.next().await {
///     let event = event?;
///     println!("{}: {}", event.event_type, event.payload);
/// }
/// ```
pub struct SseEventStream {
    /// The underlying body; `None` once it has ended or failed
    body: Option<ChunkStream>,

    /// SSE parser
    decoder: SseDecoder,

    /// Decoded events not yet yielded
    buffered: VecDeque<SseEvent>,
}

impl SseEventStream {
    /// Start reading events from `source` with the default configuration
    pub fn new<S: BodySource>(source: S) -> Result<Self> {
        Self::with_config(source, DecoderConfig::default())
    }

    /// Start reading events from `source`
    pub fn with_config<S: BodySource>(source: S, config: DecoderConfig) -> Result<Self> {
        let body = source.into_body().ok_or(SseError::StreamUnavailable)?;

        debug!("Opened SSE event stream");

        Ok(Self {
            body: Some(body),
            decoder: SseDecoder::with_config(config),
            buffered: VecDeque::new(),
        })
    }
}

impl Stream for SseEventStream {
    type Item = Result<SseEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            // First, check if we have buffered events
            if let Some(event) = this.buffered.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            let Some(body) = this.body.as_mut() else {
                return Poll::Ready(None);
            };

            match ready!(body.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => {
                    this.buffered.extend(this.decoder.feed(&chunk));
                }
                Some(Err(e)) => {
                    warn!("SSE stream read failed: {}", e);
                    this.body = None;
                    return Poll::Ready(Some(Err(e)));
                }
                None => {
                    debug!("SSE body ended");
                    this.body = None;
                    this.buffered.extend(this.decoder.finish());
                }
            }
        }
    }
}

impl std::fmt::Debug for SseEventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseEventStream")
            .field("open", &self.body.is_some())
            .field("buffered", &self.buffered.len())
            .finish()
    }
}
