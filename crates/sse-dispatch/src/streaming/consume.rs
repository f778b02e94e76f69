//! Consume a body and dispatch its events to handlers

use futures::StreamExt;
use tracing::{debug, warn};

use super::source::BodySource;
use crate::config::DecoderConfig;
use crate::decoder::SseDecoder;
use crate::error::{Result, SseError};
use crate::handlers::Handlers;

/// Counts for one consumed stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeSummary {
    /// Completed events (events with at least one data line)
    pub events: usize,
    /// Events for which a callback ran
    pub dispatched: usize,
}

/// Read `source` to the end, running the matching handler for every event
///
/// Events are dispatched synchronously, in the order they complete, as soon
/// as the chunk that completes them arrives. A trailing event without a
/// closing blank line is dispatched after the stream ends.
///
/// # Errors
///
/// - [`SseError::StreamUnavailable`] if the source has no body; nothing is
///   dispatched.
/// - [`SseError::Stream`] if reading a chunk fails. Events completed before
///   the failure have already been dispatched.
///
/// # Example
///
/// ```no_run
/// use sse_dispatch::{consume_sse, Handlers};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let response = reqwest::get("http://localhost:8080/events").await?;
///
/// let mut handlers = Handlers::new()
///     .on("progress", |payload| println!("progress: {}", payload))
///     .on("message", |payload| println!("message: {}", payload));
///
/// consume_sse(response, &mut handlers).await?;
/// # Ok(())
/// # }
/// ```
pub async fn consume_sse<S: BodySource>(
    source: S,
    handlers: &mut Handlers<'_>,
) -> Result<ConsumeSummary> {
    consume_sse_with_config(source, handlers, DecoderConfig::default()).await
}

/// [`consume_sse`] with an explicit decoder configuration
///
/// Unmatched event types fall back to `config.default_event_type`.
pub async fn consume_sse_with_config<S: BodySource>(
    source: S,
    handlers: &mut Handlers<'_>,
    config: DecoderConfig,
) -> Result<ConsumeSummary> {
    let Some(mut body) = source.into_body() else {
        debug!("SSE source has no readable body");
        return Err(SseError::StreamUnavailable);
    };

    let fallback = config.default_event_type.clone();
    let mut decoder = SseDecoder::with_config(config);
    let mut summary = ConsumeSummary::default();

    debug!("Consuming SSE stream");

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("SSE stream read failed: {}", e);
                return Err(e);
            }
        };

        for event in decoder.feed(&chunk) {
            summary.record(handlers.dispatch_with_fallback(event, &fallback));
        }
    }

    for event in decoder.finish() {
        summary.record(handlers.dispatch_with_fallback(event, &fallback));
    }

    debug!(
        events = summary.events,
        dispatched = summary.dispatched,
        "SSE stream ended"
    );

    Ok(summary)
}

impl ConsumeSummary {
    fn record(&mut self, dispatched: bool) {
        self.events += 1;
        if dispatched {
            self.dispatched += 1;
        }
    }
}
