//! Error types for the compression crate

use std::fmt;
use thiserror::Error;

/// Result type alias for compression operations
pub type Result<T> = std::result::Result<T, CompressionError>;

/// Failure while deflating or inflating a token payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    /// Encoder could not produce a stream
    #[error("Compression failed at level {level}: {reason}")]
    CompressionFailed {
        /// Effective DEFLATE level
        level: u32,
        /// Underlying encoder error
        reason: String,
    },

    /// Input is not a valid raw DEFLATE stream
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// Inflated output would exceed the caller's ceiling
    #[error("Decompressed size exceeds limit of {limit} bytes")]
    SizeExceeded {
        /// Ceiling in bytes
        limit: usize,
    },
}

impl CompressionError {
    /// Create a `CompressionFailed` error
    #[must_use]
    pub fn compression_failed(level: u32, reason: impl fmt::Display) -> Self {
        Self::CompressionFailed {
            level,
            reason: reason.to_string(),
        }
    }

    /// Create a `DecompressionFailed` error
    #[must_use]
    pub fn decompression_failed(reason: impl fmt::Display) -> Self {
        Self::DecompressionFailed(reason.to_string())
    }

    /// Create a `SizeExceeded` error
    #[inline]
    #[must_use]
    pub fn size_exceeded(limit: usize) -> Self {
        Self::SizeExceeded { limit }
    }
}
