//! Async consumption of SSE bodies
//!
//! Two ways to read a body:
//!
//! - [`consume_sse`] drives the body to the end and calls a [`Handlers`]
//!   callback for each event.
//! - [`SseEventStream`] yields the events as a `futures::Stream`.
//!
//! # Example
//!
//! ```no_run
//! use sse_dispatch::{SseEventStream, SseError};
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let response = reqwest::Client::new()
//!     .get("http://localhost:8080/events")
//!     .header("Accept", "text/event-stream")
//!     .send()
//!     .await?;
//!
//! let mut events = SseEventStream::new(response)?;
//! while let Some(event) = events.next().await {
//!     match event {
//!         Ok(event) => println!("{} {}", event.event_type, event.payload),
//!         Err(SseError::Stream(e)) => {
//!             eprintln!("Stream error: {}", e);
//!             break;
//!         }
//!         Err(e) => return Err(e.into()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Handlers`]: crate::Handlers

mod consume;
mod events;
mod source;

pub use consume::{consume_sse, consume_sse_with_config, ConsumeSummary};
pub use events::SseEventStream;
pub use source::{BodySource, ByteStream, ChunkStream};
