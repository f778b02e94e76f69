//! Push-based SSE decoding
//!
//! The decoder is synchronous and transport-agnostic: feed it chunks as they
//! arrive and it returns the events they complete.
//!
//! ```
//! use sse_dispatch::decoder::{Payload, SseDecoder};
//!
//! let mut decoder = SseDecoder::new();
//! assert!(decoder.feed(b"event: ping\ndata: 1").is_empty());
//!
//! let events = decoder.finish();
//! assert_eq!(events[0].event_type, "ping");
//! assert_eq!(events[0].payload, Payload::Json(1.into()));
//! ```

mod lines;
mod parser;
mod types;
mod utf8;

pub use lines::LineBuffer;
pub use parser::SseDecoder;
pub use types::{Payload, SseEvent};
pub use utf8::Utf8Decoder;
