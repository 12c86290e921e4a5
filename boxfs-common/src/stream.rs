use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_util::{stream, Stream, StreamExt};

/// A stream of content chunks passed between callers, adapters and clients.
pub struct ByteStream {
    inner: Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>,
}

impl ByteStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self { inner: Box::pin(stream) }
    }

    /// A stream yielding `data` as a single chunk.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::new(stream::once(futures_util::future::ready(Ok(data.into()))))
    }

    pub fn empty() -> Self {
        Self::new(stream::empty())
    }

    /// Drain the stream into one buffer.
    pub async fn into_bytes(mut self) -> io::Result<Bytes> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }
}

impl Stream for ByteStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}

impl From<Bytes> for ByteStream {
    fn from(data: Bytes) -> Self {
        Self::from_bytes(data)
    }
}
