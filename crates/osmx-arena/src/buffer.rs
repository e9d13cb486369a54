//! Contiguous record buffer with bump allocation and a commit boundary.
//!
//! A [`Buffer`] is one pre-sized byte region. Records are written
//! back-to-back at the write cursor; [`commit`](Buffer::commit) moves the
//! committed boundary up to the cursor once a record is complete. Readers
//! only ever see the committed prefix.

use std::fmt;

use crate::error::ArenaError;
use crate::item::ObjectIter;
use crate::layout::padded_length;

/// Largest capacity a buffer may reach; record sizes are stored as `u32`.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// A contiguous byte region holding a sequence of serialized records.
///
/// Invariant: `committed <= written <= capacity`. A buffer with capacity 0
/// is the end-of-stream sentinel created by [`Buffer::end_of_stream`].
pub struct Buffer {
    /// Backing storage. Allocated to full capacity at creation.
    data: Vec<u8>,
    /// Bump pointer: next free byte.
    written: usize,
    /// Records before this offset are complete.
    committed: usize,
    /// Grow instead of failing when a write does not fit.
    auto_grow: bool,
}

impl Buffer {
    /// Create a zero-initialised buffer of `capacity` bytes.
    ///
    /// Writes that do not fit fail with [`ArenaError::BufferFull`].
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity.min(MAX_CAPACITY)],
            written: 0,
            committed: 0,
            auto_grow: false,
        }
    }

    /// Create a buffer that doubles its capacity instead of failing.
    pub fn with_auto_grow(capacity: usize) -> Self {
        Self {
            auto_grow: true,
            ..Self::new(capacity)
        }
    }

    /// The empty sentinel that marks the end of a buffer stream.
    pub fn end_of_stream() -> Self {
        Self {
            data: Vec::new(),
            written: 0,
            committed: 0,
            auto_grow: false,
        }
    }

    /// Whether this is the end-of-stream sentinel.
    pub fn is_end_of_stream(&self) -> bool {
        self.data.is_empty()
    }

    /// Reserve `len` zeroed bytes at the write cursor.
    ///
    /// Returns the offset of the reserved region.
    pub fn reserve(&mut self, len: usize) -> Result<usize, ArenaError> {
        let new_written = self
            .written
            .checked_add(len)
            .filter(|&end| end <= MAX_CAPACITY)
            .ok_or(ArenaError::BufferFull {
                requested: len,
                remaining: self.remaining(),
            })?;
        if new_written > self.data.len() {
            if !self.auto_grow {
                return Err(ArenaError::BufferFull {
                    requested: len,
                    remaining: self.remaining(),
                });
            }
            let new_capacity = self.data.len().saturating_mul(2).max(new_written).max(64);
            self.grow(new_capacity);
        }
        let offset = self.written;
        // May hold stale bytes from a rolled-back record.
        self.data[offset..new_written].fill(0);
        self.written = new_written;
        Ok(offset)
    }

    /// Copy `bytes` to the write cursor.
    ///
    /// Returns the offset the bytes were written at.
    pub fn append(&mut self, bytes: &[u8]) -> Result<usize, ArenaError> {
        let offset = self.reserve(bytes.len())?;
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(offset)
    }

    /// Zero-pad the write cursor up to the next alignment boundary.
    ///
    /// Returns the number of padding bytes added.
    pub fn pad_to_alignment(&mut self) -> Result<usize, ArenaError> {
        let padding = padded_length(self.written) - self.written;
        if padding > 0 {
            self.reserve(padding)?;
        }
        Ok(padding)
    }

    /// Mark everything written so far as complete records.
    ///
    /// Returns the new committed boundary.
    pub fn commit(&mut self) -> usize {
        self.committed = self.written;
        self.committed
    }

    /// Discard everything written since the last commit.
    ///
    /// The committed boundary is the checkpoint a failed record is
    /// rolled back to; the discarded bytes are zeroed on their next reuse.
    pub fn rollback(&mut self) {
        self.written = self.committed;
    }

    /// Enlarge the buffer to `new_capacity` bytes, keeping its contents.
    ///
    /// Builders address the buffer by offset, so growing never
    /// invalidates a record that is still being built. Shrinking is
    /// not supported; smaller values are ignored.
    pub fn grow(&mut self, new_capacity: usize) {
        let new_capacity = new_capacity.min(MAX_CAPACITY);
        if new_capacity > self.data.len() {
            tracing::warn!(
                from = self.data.len(),
                to = new_capacity,
                "growing record buffer"
            );
            self.data.resize(new_capacity, 0);
        }
    }

    /// Reset both cursors without deallocating.
    pub fn clear(&mut self) {
        self.written = 0;
        self.committed = 0;
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Offset of the write cursor.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Offset of the committed boundary.
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Free bytes after the write cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.written
    }

    /// Whether the buffer holds no committed records.
    pub fn is_empty(&self) -> bool {
        self.committed == 0
    }

    /// Whether bytes have been written since the last commit.
    pub fn has_uncommitted(&self) -> bool {
        self.written != self.committed
    }

    /// Whether writes grow the buffer instead of failing.
    pub fn is_auto_grow(&self) -> bool {
        self.auto_grow
    }

    /// The committed records as raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.committed]
    }

    /// Iterate over the committed entity records in write order.
    pub fn iter(&self) -> ObjectIter<'_> {
        ObjectIter::new(self.data())
    }

    #[cfg(test)]
    pub(crate) fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.data[offset..offset + len]
    }

    pub(crate) fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.data[offset..offset + len]
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("capacity", &self.data.len())
            .field("written", &self.written)
            .field("committed", &self.committed)
            .field("auto_grow", &self.auto_grow)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Buffer {
    type Item = <ObjectIter<'a> as Iterator>::Item;
    type IntoIter = ObjectIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_advances_cursor() {
        let mut buf = Buffer::new(64);
        assert_eq!(buf.append(b"abc").unwrap(), 0);
        assert_eq!(buf.append(b"de").unwrap(), 3);
        assert_eq!(buf.written(), 5);
        assert_eq!(buf.committed(), 0);
        assert_eq!(buf.remaining(), 59);
    }

    #[test]
    fn append_fails_when_full() {
        let mut buf = Buffer::new(8);
        buf.append(&[1; 6]).unwrap();
        let err = buf.append(&[2; 3]).unwrap_err();
        assert_eq!(
            err,
            ArenaError::BufferFull {
                requested: 3,
                remaining: 2
            }
        );
        // A failed append writes nothing.
        assert_eq!(buf.written(), 6);
    }

    #[test]
    fn exactly_full_append_succeeds() {
        let mut buf = Buffer::new(8);
        buf.append(&[7; 8]).unwrap();
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn commit_exposes_written_bytes() {
        let mut buf = Buffer::new(16);
        buf.append(b"rec1").unwrap();
        assert!(buf.data().is_empty());
        assert!(buf.has_uncommitted());
        buf.commit();
        assert_eq!(buf.data(), b"rec1");
        assert!(!buf.is_empty());
        assert!(!buf.has_uncommitted());
    }

    #[test]
    fn rollback_returns_to_last_commit() {
        let mut buf = Buffer::new(16);
        buf.append(b"keep").unwrap();
        buf.commit();
        buf.append(b"drop").unwrap();
        buf.rollback();
        assert_eq!(buf.written(), 4);
        // Reused bytes come back zeroed.
        let off = buf.reserve(4).unwrap();
        assert_eq!(buf.bytes(off, 4), &[0, 0, 0, 0]);
    }

    #[test]
    fn padding_aligns_cursor() {
        let mut buf = Buffer::new(32);
        buf.append(&[1; 3]).unwrap();
        assert_eq!(buf.pad_to_alignment().unwrap(), 5);
        assert_eq!(buf.written(), 8);
        assert_eq!(buf.pad_to_alignment().unwrap(), 0);
    }

    #[test]
    fn auto_grow_keeps_contents() {
        let mut buf = Buffer::with_auto_grow(8);
        assert!(buf.is_auto_grow());
        assert!(!Buffer::new(8).is_auto_grow());
        buf.append(b"12345678").unwrap();
        buf.commit();
        buf.append(b"9").unwrap();
        assert!(buf.capacity() >= 9);
        assert_eq!(buf.data(), b"12345678");
    }

    #[test]
    fn explicit_grow_ignores_shrink() {
        let mut buf = Buffer::new(16);
        buf.grow(8);
        assert_eq!(buf.capacity(), 16);
        buf.grow(32);
        assert_eq!(buf.capacity(), 32);
    }

    #[test]
    fn sentinel_is_recognised() {
        let eos = Buffer::end_of_stream();
        assert!(eos.is_end_of_stream());
        assert!(eos.is_empty());
        assert!(!Buffer::new(8).is_end_of_stream());
    }

    #[test]
    fn clear_resets_cursors() {
        let mut buf = Buffer::new(16);
        buf.append(b"abc").unwrap();
        buf.commit();
        buf.clear();
        assert_eq!(buf.written(), 0);
        assert!(buf.is_empty());
    }
}
