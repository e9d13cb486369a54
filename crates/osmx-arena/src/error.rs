//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur while writing or reading records in a buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The buffer has no room for the requested write.
    ///
    /// Recoverable: the caller can roll the buffer back to its last
    /// commit and either give up or grow the buffer.
    BufferFull {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still free in the buffer.
        remaining: usize,
    },
    /// A record header points outside the committed region.
    Truncated {
        /// Offset of the offending record.
        offset: usize,
    },
    /// A record header carries an unknown or unexpected item type.
    InvalidItemType {
        /// Offset of the offending record.
        offset: usize,
        /// The discriminant found in the header.
        value: u16,
    },
    /// An inline string is not valid UTF-8.
    InvalidUtf8 {
        /// Offset of the record holding the string.
        offset: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferFull {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "buffer full: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
            Self::Truncated { offset } => {
                write!(f, "record at offset {offset} extends past the committed region")
            }
            Self::InvalidItemType { offset, value } => {
                write!(f, "invalid item type {value:#06x} at offset {offset}")
            }
            Self::InvalidUtf8 { offset } => {
                write!(f, "record at offset {offset} holds a string that is not UTF-8")
            }
        }
    }
}

impl Error for ArenaError {}
