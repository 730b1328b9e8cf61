//! Transparent progress instrumentation for readers.

use std::io::{self, Read};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Observer of bytes flowing through a [`ProgressReader`].
pub trait ProgressSink: Send + Sync {
    /// `bytes` more bytes were read.
    fn advance(&self, bytes: u64);

    /// The stream is done. Implementations that render asynchronously
    /// block here until their output has drained.
    fn finish(&self) {}
}

/// Lock-free running byte count.
#[derive(Debug, Default)]
pub struct ByteCounter(AtomicU64);

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes observed so far.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl ProgressSink for ByteCounter {
    fn advance(&self, bytes: u64) {
        self.0.fetch_add(bytes, Ordering::Relaxed);
    }
}

/// Reader decorator that reports every successful read to a sink.
///
/// Bytes and errors from the inner reader are passed through untouched.
pub struct ProgressReader<R> {
    inner: R,
    sink: Arc<dyn ProgressSink>,
}

impl<R> ProgressReader<R> {
    pub fn new(inner: R, sink: Arc<dyn ProgressSink>) -> Self {
        Self { inner, sink }
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for ProgressReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReader")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.sink.advance(n as u64);
        }
        Ok(n)
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ProgressReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();

        let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = poll {
            let n = buf.filled().len() - before;
            if n > 0 {
                this.sink.advance(n as u64);
            }
        }
        poll
    }
}
