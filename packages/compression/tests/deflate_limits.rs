//! Bounded inflate behaviour against decompression bombs

use cryypt_compression::{CompressionError, compress, decompress_limited};
use proptest::prelude::*;

#[test]
fn bomb_is_stopped_at_ceiling() {
    // 64 MiB of zeros compresses to a few tens of KiB
    let bomb = compress(&vec![0u8; 64 * 1024 * 1024], 9).unwrap();
    assert!(bomb.len() < 128 * 1024);

    let result = decompress_limited(&bomb, 250 * 1024);
    assert!(matches!(
        result,
        Err(CompressionError::SizeExceeded { limit }) if limit == 250 * 1024
    ));
}

#[test]
fn zero_limit_accepts_only_empty_output() {
    let empty = compress(b"", 6).unwrap();
    assert!(decompress_limited(&empty, 0).unwrap().is_empty());

    let one = compress(b"x", 6).unwrap();
    assert!(matches!(
        decompress_limited(&one, 0),
        Err(CompressionError::SizeExceeded { limit: 0 })
    ));
}

proptest! {
    #[test]
    fn inflates_what_it_deflated(data in proptest::collection::vec(any::<u8>(), 0..2048), level in 0u32..=9) {
        let compressed = compress(&data, level).unwrap();
        prop_assert_eq!(decompress_limited(&compressed, data.len()).unwrap(), data);
    }
}
