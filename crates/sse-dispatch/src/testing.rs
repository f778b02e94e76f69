//! Test utilities for sse-dispatch
//!
//! Provides an HTTP server that replays scripted SSE bodies chunk by chunk,
//! plus helpers for cutting documents into chunks.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use futures::stream;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Path of the scripted SSE endpoint
pub const EVENTS_PATH: &str = "/events";

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start a server from an axum Router
    pub async fn start(router: Router) -> std::io::Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        // Spawn the server
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Serve `chunks` as the body of [`EVENTS_PATH`], written one at a time
    pub async fn serve_chunks(chunks: Vec<Bytes>) -> std::io::Result<Self> {
        let router = Router::new().route(
            EVENTS_PATH,
            get(move || {
                let chunks = chunks.clone();
                async move {
                    let body = stream::iter(chunks.into_iter().map(Ok::<_, Infallible>));
                    event_stream_response(Body::from_stream(body))
                }
            }),
        );
        Self::start(router).await
    }

    /// Serve [`EVENTS_PATH`] from a channel, so a test decides when each
    /// chunk is written. Dropping the sender ends the body.
    ///
    /// The body can be requested once; later requests get an empty body.
    pub async fn serve_channel() -> std::io::Result<(Self, mpsc::UnboundedSender<Bytes>)> {
        let (tx, rx) = mpsc::unbounded_channel::<Bytes>();
        let rx = Arc::new(Mutex::new(Some(rx)));

        let router = Router::new().route(
            EVENTS_PATH,
            get(move || {
                let rx = rx.lock().take();
                async move {
                    let body = stream::unfold(rx, |rx| async move {
                        let mut rx = rx?;
                        let chunk = rx.recv().await?;
                        Some((Ok::<_, Infallible>(chunk), Some(rx)))
                    });
                    event_stream_response(Body::from_stream(body))
                }
            }),
        );
        Ok((Self::start(router).await?, tx))
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the URL of the scripted SSE endpoint
    pub fn events_url(&self) -> String {
        format!("{}{}", self.base_url(), EVENTS_PATH)
    }

    /// Request the scripted SSE endpoint
    pub async fn get_events(&self) -> reqwest::Result<reqwest::Response> {
        reqwest::Client::new()
            .get(self.events_url())
            .header("Accept", "text/event-stream")
            .send()
            .await
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal if not already done
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Abort the task if still running
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

fn event_stream_response(body: Body) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
}

/// Cut a document into chunks of `size` bytes (the last may be shorter)
///
/// Cuts ignore character and line boundaries.
pub fn split_every(document: &[u8], size: usize) -> Vec<Bytes> {
    document
        .chunks(size.max(1))
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Cut a document at the given byte offsets
///
/// Offsets past the end are clamped; empty chunks are kept.
pub fn split_at_offsets(document: &[u8], offsets: &[usize]) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(offsets.len() + 1);
    let mut start = 0;
    for &offset in offsets {
        let end = offset.clamp(start, document.len());
        chunks.push(Bytes::copy_from_slice(&document[start..end]));
        start = end;
    }
    chunks.push(Bytes::copy_from_slice(&document[start..]));
    chunks
}
