//! Server-Sent Events decoding and dispatch
//!
//! Decodes an SSE body delivered in arbitrarily-sized chunks and runs a
//! callback per event, chosen by event type.
//!
//! # Example
//!
//! ```rust,no_run
//! use sse_dispatch::{consume_sse, Handlers};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let response = reqwest::get("http://localhost:8080/events").await?;
//!
//!     let mut handlers = Handlers::new()
//!         // `event: progress` events
//!         .on("progress", |payload| println!("progress {}", payload))
//!         // everything else
//!         .on("message", |payload| println!("message {}", payload));
//!
//!     let summary = consume_sse(response, &mut handlers).await?;
//!     println!("{} events", summary.events);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Wire format
//!
//! ```text
//! event: <type>            optional, defaults to "message"
//! data: <payload line>     one or more, joined with "\n"
//!                          blank line ends the event
//! ```
//!
//! Lines starting with `:` are comments. Lines with any other field are
//! ignored. `\n` and `\r\n` line endings are both accepted. Each payload is
//! parsed as JSON when possible and otherwise delivered as text (see
//! [`Payload`]).
//!
//! # Without an HTTP client
//!
//! [`SseDecoder`] is the synchronous core. Feed it chunks from any transport:
//!
//! ```rust
//! use sse_dispatch::{Handlers, SseDecoder};
//!
//! let mut seen = Vec::new();
//! let mut handlers = Handlers::new().on("message", |p| seen.push(p.to_string()));
//!
//! let mut decoder = SseDecoder::new();
//! for chunk in [&b"data: a\nda"[..], b"ta: b\n\ndata: c"] {
//!     for event in decoder.feed(chunk) {
//!         handlers.dispatch(event);
//!     }
//! }
//! for event in decoder.finish() {
//!     handlers.dispatch(event);
//! }
//! drop(handlers);
//!
//! assert_eq!(seen, vec!["a\nb", "c"]);
//! ```
//!
//! # Testing
//!
//! The `testing` module serves scripted SSE bodies over real HTTP:
//!
//! ```rust,ignore
//! use sse_dispatch::testing::{split_every, TestServer};
//!
//! let server = TestServer::serve_chunks(split_every(document, 3)).await?;
//! let response = server.get_events().await?;
//! consume_sse(response, &mut handlers).await?;
//! ```

mod config;
pub mod decoder;
mod error;
mod handlers;
pub mod streaming;
pub mod testing;

pub use config::{DecoderConfig, DEFAULT_EVENT_TYPE};
pub use error::{BoxError, Result, SseError};
pub use handlers::Handlers;

// Re-export the common decoding and streaming types for convenience
pub use decoder::{Payload, SseDecoder, SseEvent};
pub use streaming::{
    consume_sse, consume_sse_with_config, BodySource, ByteStream, ConsumeSummary, SseEventStream,
};
