//! PBKDF2, RFC 2898 §5.2

use crate::error::{JoseError, Result};
use crate::utils::arrays;
use digest::{KeyInit, Mac};
use zeroize::Zeroizing;

/// Derive `key_bits` of key material from a password
///
/// `M` is the pseudorandom function, e.g. `Hmac<Sha256>`. Each output block is
/// `U_1 ^ U_2 ^ ... ^ U_c` with `U_1 = PRF(P, S || INT(i))` and
/// `U_j = PRF(P, U_{j-1})`; the last block is cut to the bytes still needed.
///
/// # Errors
/// - `JoseError::KdfIterationOverflow` if the key is longer than
///   `(2^32 - 1) * hLen` or than [`super::MAX_DERIVED_KEY_BITS`]
/// - `JoseError::InvalidKey` for a zero iteration count or a password the PRF
///   refuses
pub fn derive_pbkdf2<M>(
    password: &[u8],
    salt: &[u8],
    iteration_count: u32,
    key_bits: usize,
) -> Result<Zeroizing<Vec<u8>>>
where
    M: Mac + KeyInit + Clone,
{
    if iteration_count == 0 {
        return Err(JoseError::invalid_key(
            "PBKDF2 iteration count must be positive",
        ));
    }

    super::check_output_bits("PBKDF2", key_bits)?;

    let prf = <M as KeyInit>::new_from_slice(password)
        .map_err(|e| JoseError::invalid_key(format!("PBKDF2 password rejected by PRF: {e}")))?;

    let h_len = <M as digest::OutputSizeUser>::output_size();
    let dk_len = super::bytes_for_bits(key_bits);

    // 1. If dkLen > (2^32 - 1) * hLen, output "derived key too long" and stop.
    if dk_len as u128 > u128::from(u32::MAX) * h_len as u128 {
        return Err(JoseError::kdf_overflow(format!(
            "PBKDF2 derived key of {key_bits} bits is longer than (2^32-1) * hLen"
        )));
    }

    let blocks = dk_len / h_len + usize::from(dk_len % h_len > 0);
    let mut derived = Zeroizing::new(Vec::with_capacity(blocks * h_len));

    for index in 1..=blocks {
        // bounded by the length check above
        let index = u32::try_from(index)
            .map_err(|_| JoseError::kdf_overflow("PBKDF2 block index exceeds 2^32-1"))?;
        let block = f(&prf, salt, iteration_count, index)?;
        derived.extend_from_slice(&block);
    }

    derived.truncate(dk_len);
    Ok(derived)
}

fn f<M: Mac + Clone>(
    prf: &M,
    salt: &[u8],
    iteration_count: u32,
    block_index: u32,
) -> Result<Zeroizing<Vec<u8>>> {
    let mut mac = prf.clone();
    mac.update(salt);
    mac.update(&arrays::u32_to_bytes(block_index));
    let mut u = Zeroizing::new(mac.finalize().into_bytes().to_vec());

    let mut result = u.clone();

    for _ in 2..=iteration_count {
        let mut mac = prf.clone();
        mac.update(&u);
        u = Zeroizing::new(mac.finalize().into_bytes().to_vec());
        result = Zeroizing::new(arrays::xor(&result, &u)?);
    }

    Ok(result)
}
