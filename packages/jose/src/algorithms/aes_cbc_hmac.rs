//! AES-CBC with HMAC-SHA2 authentication (RFC 7518 §5.2)
//!
//! The CEK is split in half: the first half keys the HMAC, the second half
//! keys AES-CBC. The tag is the leading half of
//! `HMAC(AAD || IV || ciphertext || AL)`, where `AL` is the AAD length in
//! bits as a 64-bit big-endian integer. The tag is checked in constant time
//! before any decryption or padding work happens.

use super::ShaSize;
use super::hmac::mac;
use crate::error::{JoseError, Result};
use crate::traits::{EncryptedContent, JweEncryption};
use crate::utils::arrays;
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::Hmac;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use tracing::debug;

/// AES block (and IV) size in bytes
pub const IV_LEN: usize = 16;

/// `AL` for an AAD of `aad_len` bytes
///
/// Computed in 64-bit arithmetic with an explicit overflow check, so the
/// field can never wrap and collide with the length of a different split
/// between AAD and ciphertext.
pub(crate) fn aad_bit_length(aad_len: usize) -> Result<[u8; 8]> {
    u64::try_from(aad_len)
        .ok()
        .and_then(|len| len.checked_mul(8))
        .map(arrays::u64_to_bytes)
        .ok_or(JoseError::SizeExceeded {
            limit: usize::try_from(u64::MAX / 8).unwrap_or(usize::MAX),
        })
}

/// `A128CBC-HS256`, `A192CBC-HS384` or `A256CBC-HS512`
#[derive(Debug, Clone, Copy)]
pub struct AesCbcHmac {
    name: &'static str,
    hash: ShaSize,
}

impl AesCbcHmac {
    /// A128CBC-HS256: 256-bit CEK, 128-bit tag
    #[must_use]
    pub const fn a128cbc_hs256() -> Self {
        Self { name: crate::A128CBC_HS256, hash: ShaSize::Sha256 }
    }

    /// A192CBC-HS384: 384-bit CEK, 192-bit tag
    #[must_use]
    pub const fn a192cbc_hs384() -> Self {
        Self { name: crate::A192CBC_HS384, hash: ShaSize::Sha384 }
    }

    /// A256CBC-HS512: 512-bit CEK, 256-bit tag
    #[must_use]
    pub const fn a256cbc_hs512() -> Self {
        Self { name: crate::A256CBC_HS512, hash: ShaSize::Sha512 }
    }

    /// Split the CEK into `(mac_key, enc_key)`
    fn split_key<'c>(&self, cek: &'c [u8]) -> Option<(&'c [u8], &'c [u8])> {
        if cek.len() * 8 != self.key_size_bits() {
            return None;
        }
        let parts = arrays::slice(cek, cek.len() / 2);
        match *parts.as_slice() {
            [mac_key, enc_key] => Some((mac_key, enc_key)),
            _ => None,
        }
    }

    fn tag(
        &self,
        mac_key: &[u8],
        aad: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
        al: &[u8; 8],
    ) -> Result<Vec<u8>> {
        let parts: [&[u8]; 4] = [aad, iv, ciphertext, al];
        let mut tag = match self.hash {
            ShaSize::Sha256 => mac::<Hmac<Sha256>>(mac_key, &parts)?,
            ShaSize::Sha384 => mac::<Hmac<Sha384>>(mac_key, &parts)?,
            ShaSize::Sha512 => mac::<Hmac<Sha512>>(mac_key, &parts)?,
        };
        tag.truncate(mac_key.len());
        Ok(tag)
    }
}

fn cbc_encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let invalid = |e| JoseError::invalid_key(format!("AES-CBC key or IV rejected: {e}"));
    let ciphertext = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        n => return Err(JoseError::invalid_key(format!("no AES variant for {n} byte keys"))),
    };
    Ok(ciphertext)
}

fn cbc_decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let plaintext = match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| JoseError::AuthenticationFailed)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| JoseError::AuthenticationFailed)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| JoseError::AuthenticationFailed)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        _ => return Err(JoseError::AuthenticationFailed),
    };
    plaintext.map_err(|_| JoseError::AuthenticationFailed)
}

impl JweEncryption for AesCbcHmac {
    fn name(&self) -> &'static str {
        self.name
    }

    fn key_size_bits(&self) -> usize {
        self.hash.bits()
    }

    fn encrypt(&self, aad: &[u8], plaintext: &[u8], cek: &[u8]) -> Result<EncryptedContent> {
        let (mac_key, enc_key) = self.split_key(cek).ok_or_else(|| {
            JoseError::invalid_key(format!(
                "{} expects a {} bit key, got {} bits",
                self.name,
                self.key_size_bits(),
                cek.len() * 8
            ))
        })?;

        let al = aad_bit_length(aad.len())?;
        let iv = arrays::random(IV_LEN)?;
        let ciphertext = cbc_encrypt(enc_key, &iv, plaintext)?;
        let tag = self.tag(mac_key, aad, &iv, &ciphertext, &al)?;

        Ok(EncryptedContent { iv, ciphertext, tag })
    }

    fn decrypt(
        &self,
        aad: &[u8],
        cek: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>> {
        let Some((mac_key, enc_key)) = self.split_key(cek) else {
            debug!(enc = self.name, "content encryption key has the wrong size");
            return Err(JoseError::AuthenticationFailed);
        };
        if iv.len() != IV_LEN {
            debug!(enc = self.name, iv_len = iv.len(), "initialization vector has the wrong size");
            return Err(JoseError::AuthenticationFailed);
        }

        let al = aad_bit_length(aad.len()).map_err(|_| JoseError::AuthenticationFailed)?;
        let expected = self.tag(mac_key, aad, iv, ciphertext, &al)?;

        if !bool::from(expected.as_slice().ct_eq(tag)) {
            debug!(enc = self.name, "authentication tag mismatch");
            return Err(JoseError::AuthenticationFailed);
        }

        cbc_decrypt(enc_key, iv, ciphertext)
    }
}
