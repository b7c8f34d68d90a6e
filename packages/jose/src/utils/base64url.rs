//! Unpadded base64url (RFC 4648 §5) as used by every JOSE segment

use crate::error::{JoseError, Result};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes as base64url without `=` padding
#[inline]
#[must_use]
pub fn encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode a base64url segment
///
/// Trailing `=` padding is tolerated for interop with producers that keep it,
/// but only the exact amount that completes the last 4-character group; the
/// standard `+`/`/` alphabet is rejected.
///
/// # Errors
/// Returns `JoseError::MalformedToken` if the input is not valid base64url.
pub fn decode(data: &str) -> Result<Vec<u8>> {
    let unpadded = data.trim_end_matches('=');
    let padding = data.len() - unpadded.len();
    if padding != 0 && padding != (4 - unpadded.len() % 4) % 4 {
        return Err(JoseError::malformed_token("non-canonical base64url padding"));
    }
    Ok(URL_SAFE_NO_PAD.decode(unpadded)?)
}
