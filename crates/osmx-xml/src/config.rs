//! Reader configuration, validation, and error types.
//!
//! [`ReaderConfig`] controls buffer sizing, the flush threshold, the depth
//! of the transfer queue and the tokenizer read size.
//! [`validate()`](ReaderConfig::validate) is called by
//! [`XmlInput::open`](crate::XmlInput::open) before the producer thread
//! is spawned.

use std::error::Error;
use std::fmt;

/// Default capacity of each record buffer in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 10_000_000;

/// Default number of sealed buffers the transfer queue may hold.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 100;

/// Default number of bytes requested from the input per read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 10_240;

// ── OverflowPolicy ─────────────────────────────────────────────────

/// What to do when a single entity does not fit in the current buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Roll the buffer back to its last commit and stop with
    /// [`ArenaError::BufferFull`](osmx_arena::ArenaError::BufferFull).
    #[default]
    Fail,
    /// Grow the buffer so the entity fits.
    Grow,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ReaderConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `buffer_capacity` is zero.
    ZeroCapacity,
    /// `max_queue_size` is zero.
    QueueDepthZero,
    /// `read_chunk_size` is zero.
    ChunkSizeZero,
    /// The flush threshold is not smaller than the buffer capacity.
    FlushThresholdTooLarge {
        /// The configured threshold.
        threshold: usize,
        /// The configured buffer capacity.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "buffer_capacity must be at least 1"),
            Self::QueueDepthZero => write!(f, "max_queue_size must be at least 1"),
            Self::ChunkSizeZero => write!(f, "read_chunk_size must be at least 1"),
            Self::FlushThresholdTooLarge {
                threshold,
                capacity,
            } => {
                write!(
                    f,
                    "flush_threshold {threshold} must be below buffer_capacity {capacity}"
                )
            }
        }
    }
}

impl Error for ConfigError {}

// ── ReaderConfig ───────────────────────────────────────────────────

/// Configuration for [`XmlInput`](crate::XmlInput) and
/// [`XmlParser`](crate::XmlParser).
#[derive(Clone, Debug)]
pub struct ReaderConfig {
    /// Capacity of each record buffer in bytes. Default: 10,000,000.
    pub buffer_capacity: usize,
    /// A buffer is handed off once fewer than this many bytes remain.
    /// `None` = 10% of `buffer_capacity`.
    pub flush_threshold: Option<usize>,
    /// Maximum number of sealed buffers waiting for the consumer.
    /// The producer blocks while the queue is full. Default: 100.
    pub max_queue_size: usize,
    /// Bytes requested from the input per read. Default: 10,240.
    pub read_chunk_size: usize,
    /// Behaviour when an entity does not fit. Default: [`OverflowPolicy::Fail`].
    pub overflow: OverflowPolicy,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            flush_threshold: None,
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            overflow: OverflowPolicy::Fail,
        }
    }
}

impl ReaderConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_queue_size == 0 {
            return Err(ConfigError::QueueDepthZero);
        }
        if self.read_chunk_size == 0 {
            return Err(ConfigError::ChunkSizeZero);
        }
        if let Some(threshold) = self.flush_threshold {
            if threshold >= self.buffer_capacity {
                return Err(ConfigError::FlushThresholdTooLarge {
                    threshold,
                    capacity: self.buffer_capacity,
                });
            }
        }
        Ok(())
    }

    /// The flush threshold in bytes, applying the default if unset.
    pub fn resolved_flush_threshold(&self) -> usize {
        self.flush_threshold.unwrap_or(self.buffer_capacity / 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ReaderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolved_flush_threshold(), 1_000_000);
        assert_eq!(config.overflow, OverflowPolicy::Fail);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let base = ReaderConfig::default();
        let cases = [
            (
                ReaderConfig {
                    buffer_capacity: 0,
                    ..base.clone()
                },
                ConfigError::ZeroCapacity,
            ),
            (
                ReaderConfig {
                    max_queue_size: 0,
                    ..base.clone()
                },
                ConfigError::QueueDepthZero,
            ),
            (
                ReaderConfig {
                    read_chunk_size: 0,
                    ..base.clone()
                },
                ConfigError::ChunkSizeZero,
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn threshold_must_fit_in_buffer() {
        let config = ReaderConfig {
            buffer_capacity: 100,
            flush_threshold: Some(100),
            ..ReaderConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FlushThresholdTooLarge {
                threshold: 100,
                capacity: 100
            })
        );
    }

    #[test]
    fn explicit_threshold_wins() {
        let config = ReaderConfig {
            flush_threshold: Some(42),
            ..ReaderConfig::default()
        };
        assert_eq!(config.resolved_flush_threshold(), 42);
    }
}
