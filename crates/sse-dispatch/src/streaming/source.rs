//! Byte sources the decoder can read from

use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};

use crate::error::{BoxError, Result, SseError};

/// A boxed stream of body chunks
pub type ChunkStream = BoxStream<'static, Result<Bytes>>;

/// Something that may carry a readable body
///
/// Returning `None` means there is nothing to read, which surfaces as
/// [`SseError::StreamUnavailable`].
pub trait BodySource {
    /// Take the body as a stream of chunks
    fn into_body(self) -> Option<ChunkStream>;
}

impl BodySource for reqwest::Response {
    fn into_body(self) -> Option<ChunkStream> {
        Some(self.bytes_stream().map_err(SseError::from).boxed())
    }
}

impl<S: BodySource> BodySource for Option<S> {
    fn into_body(self) -> Option<ChunkStream> {
        self.and_then(BodySource::into_body)
    }
}

/// Any chunk stream, wrapped so it can be used as a [`BodySource`]
pub struct ByteStream {
    inner: ChunkStream,
}

impl ByteStream {
    /// Wrap a fallible stream of chunks
    pub fn new<S, B, E>(stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
        B: Into<Bytes> + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            inner: stream
                .map_ok(Into::<Bytes>::into)
                .map_err(SseError::stream)
                .boxed(),
        }
    }

    /// A stream that yields the given chunks and then ends
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Bytes>,
    {
        let chunks: Vec<Bytes> = chunks.into_iter().map(Into::into).collect();
        Self {
            inner: stream::iter(chunks.into_iter().map(Ok)).boxed(),
        }
    }
}

impl BodySource for ByteStream {
    fn into_body(self) -> Option<ChunkStream> {
        Some(self.inner)
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}
