//! Errors produced while reading an OSM XML document.

use std::error::Error;
use std::fmt;
use std::io;

use osmx_arena::ArenaError;

use crate::config::ConfigError;

/// Location of an error in the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextPosition {
    /// Byte offset from the start of the input.
    pub offset: u64,
    /// 1-based line, when the offset lies in the most recently read chunk.
    pub line: Option<u64>,
    /// 1-based column in bytes, known together with `line`.
    pub column: Option<u64>,
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "line {line}, column {column} (byte {})", self.offset)
            }
            _ => write!(f, "byte {}", self.offset),
        }
    }
}

/// Errors from the XML reader.
#[derive(Debug)]
pub enum ReadError {
    /// The tokenizer rejected the input.
    Xml {
        /// Tokenizer message.
        message: String,
        /// Where the tokenizer stopped.
        position: TextPosition,
    },
    /// The root element declares a format version other than 0.6.
    UnsupportedVersion {
        /// The declared version.
        found: String,
    },
    /// Well-formed XML that does not follow the OSM document structure.
    Structure {
        /// What was wrong.
        reason: String,
        /// Where it was found.
        position: TextPosition,
    },
    /// A record could not be written.
    Arena(ArenaError),
    /// Reading the input failed.
    Io(io::Error),
    /// The reader configuration was rejected.
    Config(ConfigError),
    /// The consumer went away before the document was finished.
    Disconnected,
    /// The read was cancelled.
    Cancelled,
    /// The producer ended without publishing a header.
    MetaUnavailable,
    /// The producer thread panicked.
    ProducerPanicked,
    /// The read failed and its error was already returned.
    AlreadyFailed,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml { message, position } => write!(f, "XML error at {position}: {message}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "can only read version 0.6 files, found version {found:?}")
            }
            Self::Structure { reason, position } => {
                write!(f, "unexpected document structure at {position}: {reason}")
            }
            Self::Arena(e) => write!(f, "arena: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Disconnected => write!(f, "consumer disconnected"),
            Self::Cancelled => write!(f, "read cancelled"),
            Self::MetaUnavailable => write!(f, "document header was never published"),
            Self::ProducerPanicked => write!(f, "reader thread panicked"),
            Self::AlreadyFailed => write!(f, "the read already failed"),
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for ReadError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<ConfigError> for ReadError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_prefers_line_and_column() {
        let pos = TextPosition {
            offset: 120,
            line: Some(4),
            column: Some(7),
        };
        assert_eq!(pos.to_string(), "line 4, column 7 (byte 120)");
        let bare = TextPosition {
            offset: 9,
            ..TextPosition::default()
        };
        assert_eq!(bare.to_string(), "byte 9");
    }

    #[test]
    fn arena_errors_keep_their_source() {
        let err = ReadError::from(ArenaError::BufferFull {
            requested: 64,
            remaining: 8,
        });
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("arena: buffer full"));
    }
}
