//! Raw DEFLATE compression (no zlib or gzip framing)

use crate::{CompressionError, Result};
use flate2::Compression;
use flate2::read::{DeflateDecoder, DeflateEncoder};
use std::io::Read;
use tracing::debug;

/// Compress data with raw DEFLATE
///
/// # Arguments
/// * `data` - The data to compress
/// * `level` - Compression level (0-9, higher is more compression; larger
///   values are clamped to 9)
///
/// # Errors
/// Returns `CompressionError::CompressionFailed` if the encoder fails
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let level = level.min(9);
    let mut encoder = DeflateEncoder::new(data, Compression::new(level));
    let mut compressed = Vec::new();
    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| CompressionError::compression_failed(level, e))?;

    Ok(compressed)
}

/// Inflate raw DEFLATE data, refusing output larger than `limit` bytes
///
/// Reads at most `limit + 1` bytes from the decoder, so a hostile stream is
/// abandoned as soon as it crosses the ceiling instead of being inflated in
/// full.
///
/// # Errors
/// - `CompressionError::SizeExceeded` if the output would be larger than `limit`
/// - `CompressionError::DecompressionFailed` if the stream is not valid DEFLATE
pub fn decompress_limited(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    let ceiling = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut decoder = DeflateDecoder::new(data).take(ceiling);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(CompressionError::decompression_failed)?;

    if decompressed.len() > limit {
        debug!(limit, compressed_len = data.len(), "inflate stopped at ceiling");
        return Err(CompressionError::size_exceeded(limit));
    }

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_stream_has_no_zlib_header() {
        let compressed = compress(b"hello hello hello hello", 6).unwrap();
        // zlib streams start with 0x78
        assert_ne!(compressed[0], 0x78);
        assert_eq!(
            decompress_limited(&compressed, 1024).unwrap(),
            b"hello hello hello hello"
        );
    }

    #[test]
    fn output_exactly_at_limit_is_accepted() {
        let data = vec![b'a'; 4096];
        let compressed = compress(&data, 9).unwrap();
        assert_eq!(decompress_limited(&compressed, 4096).unwrap(), data);
        assert!(matches!(
            decompress_limited(&compressed, 4095),
            Err(CompressionError::SizeExceeded { limit: 4095 })
        ));
    }

    #[test]
    fn garbage_is_a_decompression_error() {
        assert!(matches!(
            decompress_limited(&[0xFF, 0xFF, 0xFF, 0xFF], 1024),
            Err(CompressionError::DecompressionFailed(_))
        ));
    }
}
