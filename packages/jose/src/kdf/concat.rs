//! Concat KDF, NIST SP 800-56A §5.8.1 (single-step, hash based)

use crate::error::{JoseError, Result};
use crate::utils::arrays;
use digest::Digest;
use zeroize::Zeroizing;

/// Fixed context fields hashed after the shared secret
///
/// Each field is used as given; JOSE callers length-prefix `algorithm_id`,
/// `party_u_info` and `party_v_info` before handing them over.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtherInfo<'a> {
    /// AlgorithmID
    pub algorithm_id: &'a [u8],
    /// PartyUInfo
    pub party_u_info: &'a [u8],
    /// PartyVInfo
    pub party_v_info: &'a [u8],
    /// SuppPubInfo
    pub supp_pub_info: &'a [u8],
    /// SuppPrivInfo
    pub supp_priv_info: &'a [u8],
}

impl OtherInfo<'_> {
    fn to_bytes(self) -> Vec<u8> {
        arrays::concat(&[
            self.algorithm_id,
            self.party_u_info,
            self.party_v_info,
            self.supp_pub_info,
            self.supp_priv_info,
        ])
    }
}

/// Derive `key_bits` of key material from `shared_secret`
///
/// `K(i) = H(counter_i || Z || OtherInfo)` for `counter = 1, 2, ...`; the
/// concatenated outputs are truncated to the requested length.
///
/// # Errors
/// Returns `JoseError::KdfIterationOverflow` when `key_bits` is over
/// [`super::MAX_DERIVED_KEY_BITS`] or more than `2^32 - 1` hash invocations
/// would be needed. Nothing is allocated in either case.
pub fn derive_concat_kdf<D: Digest>(
    key_bits: usize,
    shared_secret: &[u8],
    other_info: &OtherInfo<'_>,
) -> Result<Zeroizing<Vec<u8>>> {
    super::check_output_bits("Concat KDF", key_bits)?;
    let key_len = super::bytes_for_bits(key_bits);
    let hash_len = <D as Digest>::output_size();
    let reps = key_len / hash_len + usize::from(key_len % hash_len > 0);

    let reps = u32::try_from(reps).map_err(|_| {
        JoseError::kdf_overflow(format!(
            "Concat KDF needs {reps} iterations for {key_bits} bits, more than 2^32-1"
        ))
    })?;

    let other_info = other_info.to_bytes();
    let mut derived = Zeroizing::new(Vec::with_capacity(reps as usize * hash_len));

    for counter in 1..=reps {
        let mut hasher = D::new();
        hasher.update(arrays::u32_to_bytes(counter));
        hasher.update(shared_secret);
        hasher.update(&other_info);
        derived.extend_from_slice(&hasher.finalize());
    }

    derived.truncate(key_len);
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Sha256, Sha512};

    #[test]
    fn truncates_final_block() {
        let info = OtherInfo {
            algorithm_id: b"A256GCM",
            ..OtherInfo::default()
        };
        let one_block = derive_concat_kdf::<Sha256>(256, b"secret", &info).unwrap();
        let uneven = derive_concat_kdf::<Sha256>(320, b"secret", &info).unwrap();

        assert_eq!(uneven.len(), 40);
        assert_eq!(&uneven[..32], one_block.as_slice());
    }

    #[test]
    fn zero_length_yields_empty_key() {
        let test = derive_concat_kdf::<Sha512>(0, b"secret", &OtherInfo::default()).unwrap();
        assert!(test.is_empty());
    }

    #[test]
    fn output_ceiling_is_inclusive() {
        let max = crate::kdf::MAX_DERIVED_KEY_BITS;
        let info = OtherInfo::default();
        let test = derive_concat_kdf::<Sha256>(max, b"z", &info).unwrap();
        assert_eq!(test.len(), max / 8);

        let test = derive_concat_kdf::<Sha256>(max + 1, b"z", &info);
        assert!(matches!(test, Err(JoseError::KdfIterationOverflow(_))));
    }

    #[test]
    fn rejects_counter_overflow_before_allocating() {
        let test = derive_concat_kdf::<Sha256>(usize::MAX, b"z", &OtherInfo::default());
        assert!(matches!(test, Err(JoseError::KdfIterationOverflow(_))));
    }
}
