//! Input wrapper that maps byte offsets to line and column.
//!
//! Keeping a line table for a whole planet file is not an option, so only
//! the most recent chunk is retained. Offsets inside that chunk resolve to
//! a line and column; older offsets resolve to the byte offset alone.

use std::io::{self, Read};

use crate::error::TextPosition;

/// A [`Read`] adapter that remembers the last chunk it passed through.
pub(crate) struct TrackingReader<R> {
    inner: R,
    /// Offset of the first byte of `last`.
    chunk_start: u64,
    /// Newlines before `chunk_start`.
    lines_before: u64,
    /// Bytes between the last newline before `chunk_start` and `chunk_start`.
    column_before: u64,
    last: Vec<u8>,
}

impl<R: Read> TrackingReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            chunk_start: 0,
            lines_before: 0,
            column_before: 0,
            last: Vec::new(),
        }
    }

    /// Total number of bytes read so far.
    pub(crate) fn bytes_read(&self) -> u64 {
        self.chunk_start + self.last.len() as u64
    }

    /// Resolve a byte offset to a position.
    pub(crate) fn position(&self, offset: u64) -> TextPosition {
        let Some(rel) = offset
            .checked_sub(self.chunk_start)
            .filter(|&rel| rel <= self.last.len() as u64)
        else {
            return TextPosition {
                offset,
                ..TextPosition::default()
            };
        };
        let prefix = &self.last[..rel as usize];
        let newlines = prefix.iter().filter(|&&b| b == b'\n').count() as u64;
        let column = match prefix.iter().rposition(|&b| b == b'\n') {
            Some(i) => (prefix.len() - i) as u64,
            None => self.column_before + rel + 1,
        };
        TextPosition {
            offset,
            line: Some(self.lines_before + newlines + 1),
            column: Some(column),
        }
    }

    fn retire_last_chunk(&mut self) {
        self.lines_before += self.last.iter().filter(|&&b| b == b'\n').count() as u64;
        self.column_before = match self.last.iter().rposition(|&b| b == b'\n') {
            Some(i) => (self.last.len() - i - 1) as u64,
            None => self.column_before + self.last.len() as u64,
        };
        self.chunk_start += self.last.len() as u64;
        self.last.clear();
    }
}

impl<R: Read> Read for TrackingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.retire_last_chunk();
            self.last.extend_from_slice(&buf[..n]);
        }
        Ok(n)
    }
}
