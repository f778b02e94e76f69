//! Handler table keyed by event type

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::config::DEFAULT_EVENT_TYPE;
use crate::decoder::{Payload, SseEvent};

type Callback<'a> = Box<dyn FnMut(Payload) + Send + 'a>;

/// Callbacks to run for decoded events, looked up by event type
///
/// An event whose type has no callback falls back to the `"message"`
/// callback. Events matching neither are dropped.
///
/// ```
/// use sse_dispatch::Handlers;
///
/// let mut progress = Vec::new();
/// let handlers = Handlers::new()
///     .on("progress", |payload| progress.push(payload))
///     .on("message", |payload| println!("{}", payload));
/// # drop(handlers);
/// ```
#[derive(Default)]
pub struct Handlers<'a> {
    callbacks: HashMap<String, Callback<'a>>,
}

impl<'a> Handlers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for an event type (builder form)
    pub fn on<F>(mut self, event_type: impl Into<String>, callback: F) -> Self
    where
        F: FnMut(Payload) + Send + 'a,
    {
        self.insert(event_type, callback);
        self
    }

    /// Register a callback, replacing any existing one for the same type
    pub fn insert<F>(&mut self, event_type: impl Into<String>, callback: F)
    where
        F: FnMut(Payload) + Send + 'a,
    {
        self.callbacks.insert(event_type.into(), Box::new(callback));
    }

    /// Remove the callback for an event type, returning whether one existed
    pub fn remove(&mut self, event_type: &str) -> bool {
        self.callbacks.remove(event_type).is_some()
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.callbacks.contains_key(event_type)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run the callback for an event, falling back to `"message"`
    ///
    /// Returns whether a callback ran.
    pub fn dispatch(&mut self, event: SseEvent) -> bool {
        self.dispatch_with_fallback(event, DEFAULT_EVENT_TYPE)
    }

    /// Run the callback for an event, falling back to `fallback`
    pub fn dispatch_with_fallback(&mut self, event: SseEvent, fallback: &str) -> bool {
        let key = if self.callbacks.contains_key(&event.event_type) {
            event.event_type.as_str()
        } else {
            fallback
        };

        match self.callbacks.get_mut(key) {
            Some(callback) => {
                callback(event.payload);
                true
            }
            None => {
                trace!("No handler for SSE event '{}'", event.event_type);
                false
            }
        }
    }
}

impl fmt::Debug for Handlers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("event_types", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}
