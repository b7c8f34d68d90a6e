//! Left zero-padding of big-endian integers to a fixed bit width

use std::borrow::Cow;

/// Left-pad `data` with zero bytes up to `ceil(bit_size / 8)` bytes
///
/// Input that is already long enough is returned unchanged.
#[must_use]
pub fn align(data: &[u8], bit_size: usize) -> Cow<'_, [u8]> {
    let required = bit_size / 8 + usize::from(bit_size % 8 > 0);

    if data.len() >= required {
        return Cow::Borrowed(data);
    }

    let mut padded = vec![0u8; required - data.len()];
    padded.extend_from_slice(data);
    Cow::Owned(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_input() {
        assert_eq!(align(&[1, 2], 32).as_ref(), &[0, 0, 1, 2]);
    }

    #[test]
    fn rounds_partial_bytes_up() {
        // P-521 coordinates are 66 bytes
        assert_eq!(align(&[7], 521).len(), 66);
    }

    #[test]
    fn leaves_long_input_alone() {
        let data = [9u8; 5];
        assert!(matches!(align(&data, 32), Cow::Borrowed(_)));
    }
}
