//! Key derivation functions
//!
//! Both derivations are generic over the hash primitive supplied by the
//! caller, and both refuse (rather than truncate or wrap) requests whose
//! block counter would not fit in 32 bits. Output is also capped at
//! [`MAX_DERIVED_KEY_BITS`] so the result buffer can be reserved up front.

mod concat;
mod pbkdf2;

pub use concat::{OtherInfo, derive_concat_kdf};
pub use pbkdf2::derive_pbkdf2;

use crate::error::{JoseError, Result};

/// Largest key either derivation produces, in bits (128 KiB)
pub const MAX_DERIVED_KEY_BITS: usize = 1 << 20;

/// Byte length for a bit length, rounding partial bytes up
#[inline]
pub(crate) fn bytes_for_bits(bits: usize) -> usize {
    bits / 8 + usize::from(bits % 8 > 0)
}

pub(crate) fn check_output_bits(kdf: &str, key_bits: usize) -> Result<()> {
    if key_bits > MAX_DERIVED_KEY_BITS {
        return Err(JoseError::kdf_overflow(format!(
            "{kdf} output of {key_bits} bits is over the {MAX_DERIVED_KEY_BITS}-bit ceiling"
        )));
    }
    Ok(())
}
