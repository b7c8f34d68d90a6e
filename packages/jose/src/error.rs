//! Error types for JOSE token operations

use std::fmt;
use thiserror::Error;

/// Result type for JOSE operations
pub type Result<T> = std::result::Result<T, JoseError>;

/// JOSE error kinds
///
/// Bad tags, bad padding and failed key unwraps all surface as
/// [`JoseError::AuthenticationFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoseError {
    /// Requested `alg`/`enc`/`zip` name is not registered
    #[error("Unknown algorithm: '{0}'")]
    UnknownAlgorithm(String),

    /// Wrong segment count, invalid base64url or unreadable header
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Key material is not the kind the resolved algorithm works with
    #[error("Key type mismatch: {algorithm} expects {expected}")]
    KeyTypeMismatch {
        /// Algorithm that rejected the key
        algorithm: String,
        /// Kind of key material the algorithm accepts
        expected: &'static str,
    },

    /// Signature, MAC or AEAD tag did not verify
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// A bounded resource went over its ceiling
    #[error("Size exceeded: output is larger than {limit} bytes")]
    SizeExceeded {
        /// Configured ceiling in bytes
        limit: usize,
    },

    /// A KDF would need more iterations than its 32-bit counter allows
    #[error("KDF iteration overflow: {0}")]
    KdfIterationOverflow(String),

    /// Key material has the right type but an unusable shape or length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Engine configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two algorithms were registered under the same name
    #[error("Duplicate algorithm registration: '{0}'")]
    DuplicateAlgorithm(String),

    /// Header JSON could not be produced or read
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Underlying primitive failed while producing a token
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    /// Payload compression filter failed
    #[error("Compression error: {0}")]
    Compression(String),
}

impl JoseError {
    /// Create an unknown algorithm error
    #[inline]
    #[must_use]
    pub fn unknown_algorithm(name: &str) -> Self {
        JoseError::UnknownAlgorithm(name.to_string())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed_token(msg: impl fmt::Display) -> Self {
        JoseError::MalformedToken(msg.to_string())
    }

    /// Create a key type mismatch error
    #[inline]
    #[must_use]
    pub fn key_type_mismatch(algorithm: &str, expected: &'static str) -> Self {
        JoseError::KeyTypeMismatch {
            algorithm: algorithm.to_string(),
            expected,
        }
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl fmt::Display) -> Self {
        JoseError::InvalidKey(msg.to_string())
    }

    /// Create a KDF iteration overflow error
    #[inline]
    #[must_use]
    pub fn kdf_overflow(msg: impl fmt::Display) -> Self {
        JoseError::KdfIterationOverflow(msg.to_string())
    }

    /// Create an invalid configuration error
    #[inline]
    #[must_use]
    pub fn invalid_config(msg: impl fmt::Display) -> Self {
        JoseError::InvalidConfig(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: impl fmt::Display) -> Self {
        JoseError::Serialization(msg.to_string())
    }

    /// Create a crypto error
    #[inline]
    #[must_use]
    pub fn crypto(msg: impl fmt::Display) -> Self {
        JoseError::Crypto(msg.to_string())
    }
}

impl From<serde_json::Error> for JoseError {
    fn from(err: serde_json::Error) -> Self {
        JoseError::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for JoseError {
    fn from(err: base64::DecodeError) -> Self {
        JoseError::MalformedToken(format!("Base64url decode error: {err}"))
    }
}

impl From<cryypt_compression::CompressionError> for JoseError {
    fn from(err: cryypt_compression::CompressionError) -> Self {
        match err {
            cryypt_compression::CompressionError::SizeExceeded { limit } => {
                JoseError::SizeExceeded { limit }
            }
            other => JoseError::Compression(other.to_string()),
        }
    }
}
