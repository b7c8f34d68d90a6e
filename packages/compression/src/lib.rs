//! Payload compression for JOSE tokens
//!
//! Raw DEFLATE (RFC 1951) as selected by the JWE `zip: "DEF"` header. The
//! inflate side always runs against a caller-supplied output ceiling.

pub mod deflate;
pub mod error;

pub use deflate::{compress, decompress_limited};
pub use error::{CompressionError, Result};
