//! Byte array helpers: concatenation, XOR, big-endian integers, randomness

use crate::error::{JoseError, Result};
use rand::{TryRngCore, rngs::OsRng};

/// Generate `byte_count` random bytes from the operating system CSPRNG
///
/// # Errors
/// Returns `JoseError::Crypto` if the OS random source is unavailable.
pub fn random(byte_count: usize) -> Result<Vec<u8>> {
    let mut data = vec![0u8; byte_count];
    OsRng
        .try_fill_bytes(&mut data)
        .map_err(|e| JoseError::crypto(format!("OS random source failed: {e}")))?;
    Ok(data)
}

/// Concatenate byte slices in order
#[must_use]
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let mut result = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for part in parts {
        result.extend_from_slice(part);
    }
    result
}

/// XOR two equally sized byte slices
///
/// # Errors
/// Returns `JoseError::Crypto` when the lengths differ.
pub fn xor(left: &[u8], right: &[u8]) -> Result<Vec<u8>> {
    if left.len() != right.len() {
        return Err(JoseError::crypto(format!(
            "xor expects equal lengths, got {} and {}",
            left.len(),
            right.len()
        )));
    }
    Ok(left.iter().zip(right).map(|(a, b)| a ^ b).collect())
}

/// Big-endian 32-bit encoding
#[inline]
#[must_use]
pub fn u32_to_bytes(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Big-endian 64-bit encoding
#[inline]
#[must_use]
pub fn u64_to_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Split `data` into chunks of `count` bytes; the last chunk may be shorter
///
/// A zero `count` yields the whole input as one chunk.
#[must_use]
pub fn slice(data: &[u8], count: usize) -> Vec<&[u8]> {
    if count == 0 {
        return vec![data];
    }
    data.chunks(count).collect()
}
