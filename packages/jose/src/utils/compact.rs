//! Compact serialization: dot-joined base64url segments

use super::base64url;
use crate::error::Result;

/// Encode each part as base64url and join with `.`
///
/// Empty parts become empty segments (`a..b`).
pub fn serialize<I, P>(parts: I) -> String
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    parts
        .into_iter()
        .map(|part| base64url::encode(part.as_ref()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a token into its raw (still encoded) segments
///
/// Signatures and AAD are computed over this exact text, never over a
/// re-encoding of the decoded bytes.
#[must_use]
pub fn split(token: &str) -> Vec<&str> {
    token.split('.').collect()
}

/// Split a token and decode every segment
///
/// # Errors
/// Returns `JoseError::MalformedToken` if any segment is not valid base64url.
pub fn parse(token: &str) -> Result<Vec<Vec<u8>>> {
    split(token).into_iter().map(base64url::decode).collect()
}
