//! Instrumented artifact streams for tests.

use std::io::{self, Read, Seek, SeekFrom};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Read counters shared with whoever holds the stream.
#[derive(Debug, Default)]
pub(crate) struct ReadStats {
    reads: AtomicU64,
    largest: AtomicU64,
    bytes: AtomicU64,
}

impl ReadStats {
    /// Number of `read` calls.
    pub(crate) fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Largest buffer a single `read` asked to fill.
    pub(crate) fn largest(&self) -> u64 {
        self.largest.load(Ordering::SeqCst)
    }

    /// Bytes handed out in total, across passes.
    pub(crate) fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::SeqCst)
    }

    fn record(&self, requested: usize, served: usize) {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.largest.fetch_max(requested as u64, Ordering::SeqCst);
        self.bytes.fetch_add(served as u64, Ordering::SeqCst);
    }
}

/// A seekable stream of `len` generated bytes that is never held in memory.
///
/// Byte `i` is `i % 251`, so content depends on position only.
#[derive(Debug)]
pub(crate) struct SyntheticArtifact {
    len: u64,
    pos: u64,
    stats: Arc<ReadStats>,
}

impl SyntheticArtifact {
    pub(crate) fn new(len: u64) -> Self {
        Self {
            len,
            pos: 0,
            stats: Arc::default(),
        }
    }

    pub(crate) fn stats(&self) -> Arc<ReadStats> {
        Arc::clone(&self.stats)
    }

    fn serve(&mut self, buf: &mut [u8]) -> usize {
        let n = (self.len - self.pos).min(buf.len() as u64) as usize;
        for (i, byte) in buf[..n].iter_mut().enumerate() {
            *byte = ((self.pos + i as u64) % 251) as u8;
        }
        self.pos += n as u64;
        self.stats.record(buf.len(), n);
        n
    }
}

impl Read for SyntheticArtifact {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.serve(buf))
    }
}

impl Seek for SyntheticArtifact {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(d) => self.len.checked_add_signed(d),
            SeekFrom::Current(d) => self.pos.checked_add_signed(d),
        };
        match target {
            Some(n) if n <= self.len => {
                self.pos = n;
                Ok(n)
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek outside artifact",
            )),
        }
    }
}

impl AsyncRead for SyntheticArtifact {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let n = this.serve(buf.initialize_unfilled());
        buf.advance(n);
        Poll::Ready(Ok(()))
    }
}
