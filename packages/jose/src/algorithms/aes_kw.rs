//! AES Key Wrap, RFC 3394 (A128KW, A192KW, A256KW)
//!
//! The `wrap`/`unwrap` helpers are shared with ECDH-ES+A*KW and PBES2, which
//! derive the key-encryption key first.

use crate::error::{JoseError, Result};
use crate::traits::JwaAlgorithm;
use crate::types::{Header, KeyMaterial};
use crate::utils::arrays;
use aes::cipher::generic_array::GenericArray;
use aes::{Aes128, Aes192, Aes256};
use aes_kw::Kek;
use zeroize::Zeroizing;

/// Bytes added by wrapping (the 64-bit integrity check value)
pub const WRAP_OVERHEAD: usize = 8;

/// Wrap `cek` under `kek` (16, 24 or 32 bytes)
pub(crate) fn wrap(kek: &[u8], cek: &[u8]) -> Result<Vec<u8>> {
    let mut wrapped = vec![0u8; cek.len() + WRAP_OVERHEAD];
    let outcome = match kek.len() {
        16 => Kek::<Aes128>::new(GenericArray::from_slice(kek)).wrap(cek, &mut wrapped),
        24 => Kek::<Aes192>::new(GenericArray::from_slice(kek)).wrap(cek, &mut wrapped),
        32 => Kek::<Aes256>::new(GenericArray::from_slice(kek)).wrap(cek, &mut wrapped),
        n => {
            return Err(JoseError::invalid_key(format!(
                "AES key wrap needs a 128, 192 or 256 bit key, got {} bits",
                n * 8
            )));
        }
    };
    outcome.map_err(|e| JoseError::crypto(format!("AES key wrap failed: {e}")))?;
    Ok(wrapped)
}

/// Unwrap `encrypted_cek` under `kek`, checking the integrity value
pub(crate) fn unwrap(kek: &[u8], encrypted_cek: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if encrypted_cek.len() < 3 * WRAP_OVERHEAD || encrypted_cek.len() % WRAP_OVERHEAD != 0 {
        return Err(JoseError::crypto("wrapped key has an invalid length"));
    }

    let mut cek = Zeroizing::new(vec![0u8; encrypted_cek.len() - WRAP_OVERHEAD]);
    let outcome = match kek.len() {
        16 => Kek::<Aes128>::new(GenericArray::from_slice(kek)).unwrap(encrypted_cek, cek.as_mut_slice()),
        24 => Kek::<Aes192>::new(GenericArray::from_slice(kek)).unwrap(encrypted_cek, cek.as_mut_slice()),
        32 => Kek::<Aes256>::new(GenericArray::from_slice(kek)).unwrap(encrypted_cek, cek.as_mut_slice()),
        n => {
            return Err(JoseError::invalid_key(format!(
                "AES key wrap needs a 128, 192 or 256 bit key, got {} bits",
                n * 8
            )));
        }
    };
    outcome.map_err(|e| JoseError::crypto(format!("AES key unwrap failed: {e}")))?;
    Ok(cek)
}

/// AES Key Wrap with a shared symmetric key
#[derive(Debug, Clone, Copy)]
pub struct AesKeyWrap {
    name: &'static str,
    kek_size_bits: usize,
}

impl AesKeyWrap {
    /// A128KW
    #[must_use]
    pub const fn a128kw() -> Self {
        Self { name: crate::A128KW, kek_size_bits: 128 }
    }

    /// A192KW
    #[must_use]
    pub const fn a192kw() -> Self {
        Self { name: crate::A192KW, kek_size_bits: 192 }
    }

    /// A256KW
    #[must_use]
    pub const fn a256kw() -> Self {
        Self { name: crate::A256KW, kek_size_bits: 256 }
    }

    fn kek<'k>(&self, key: &'k KeyMaterial) -> Result<&'k [u8]> {
        let kek = key.as_symmetric(self.name)?;
        if kek.len() * 8 != self.kek_size_bits {
            return Err(JoseError::invalid_key(format!(
                "{} expects a {} bit key, got {} bits",
                self.name,
                self.kek_size_bits,
                kek.len() * 8
            )));
        }
        Ok(kek)
    }
}

impl JwaAlgorithm for AesKeyWrap {
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap_new_key(
        &self,
        cek_size_bits: usize,
        key: &KeyMaterial,
        _header: &mut Header,
    ) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        let kek = self.kek(key)?;
        let cek = Zeroizing::new(arrays::random(cek_size_bits / 8)?);
        let encrypted_cek = wrap(kek, &cek)?;
        Ok((cek, encrypted_cek))
    }

    fn unwrap(
        &self,
        encrypted_cek: &[u8],
        key: &KeyMaterial,
        _cek_size_bits: usize,
        _header: &Header,
    ) -> Result<Zeroizing<Vec<u8>>> {
        unwrap(self.kek(key)?, encrypted_cek)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 3394 §4.1
    #[test]
    fn rfc3394_128_bit_kek() {
        let kek = hex!("000102030405060708090A0B0C0D0E0F");
        let data = hex!("00112233445566778899AABBCCDDEEFF");
        let wrapped = wrap(&kek, &data).unwrap();
        assert_eq!(
            wrapped,
            hex!("1FA68B0A8112B447AEF34BD8FB5A7B829D3E862371D2CFE5")
        );
        assert_eq!(unwrap(&kek, &wrapped).unwrap().as_slice(), &data);
    }

    #[test]
    fn tampered_wrap_fails_integrity_check() {
        let kek = [7u8; 32];
        let mut wrapped = wrap(&kek, &[1u8; 32]).unwrap();
        wrapped[3] ^= 1;
        assert!(unwrap(&kek, &wrapped).is_err());
    }

    #[test]
    fn wrong_kek_size_rejected() {
        let alg = AesKeyWrap::a256kw();
        let key = KeyMaterial::symmetric(vec![0u8; 16]);
        assert!(matches!(
            alg.wrap_new_key(256, &key, &mut Header::new()),
            Err(JoseError::InvalidKey(_))
        ));
    }
}
