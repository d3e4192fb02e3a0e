// Forward-only reader with a read-ahead window

use std::io::{self, Read};

const CHUNK_SIZE: usize = 8 * 1024;

/// Wraps a reader so callers can look at upcoming bytes before consuming them.
///
/// The window grows on demand, so `peek(n)` and `take(n)` work for any `n`
/// without seeking the underlying reader.
pub struct LookaheadReader<R> {
    inner: R,
    buffer: Vec<u8>,
    start: usize,
    eof: bool,
}

impl<R: Read> LookaheadReader<R> {
    pub fn new(inner: R) -> Self {
        LookaheadReader {
            inner,
            buffer: Vec::with_capacity(CHUNK_SIZE),
            start: 0,
            eof: false,
        }
    }

    /// Up to `n` upcoming bytes. Fewer than `n` only at end of stream.
    pub fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        self.fill(n)?;
        let len = self.buffered().min(n);
        Ok(&self.buffer[self.start..self.start + len])
    }

    /// Consume exactly `n` bytes, or nothing when the stream ends first.
    pub fn take(&mut self, n: usize) -> io::Result<Option<Vec<u8>>> {
        self.fill(n)?;
        if self.buffered() < n {
            return Ok(None);
        }
        let bytes = self.buffer[self.start..self.start + n].to_vec();
        self.consume(n);
        Ok(Some(bytes))
    }

    pub fn consume(&mut self, n: usize) {
        self.start = (self.start + n).min(self.buffer.len());
    }

    /// Bytes read from the inner reader but not consumed yet.
    pub fn buffered(&self) -> usize {
        self.buffer.len() - self.start
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, n: usize) -> io::Result<()> {
        if self.buffered() >= n || self.eof {
            return Ok(());
        }

        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.start = 0;
        }

        let mut chunk = [0u8; CHUNK_SIZE];
        while self.buffer.len() < n {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(read) => self.buffer.extend_from_slice(&chunk[..read]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
