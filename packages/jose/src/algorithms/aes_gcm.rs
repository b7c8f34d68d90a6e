//! AES-GCM content encryption (A128GCM, A192GCM, A256GCM)

use crate::error::{JoseError, Result};
use crate::traits::{EncryptedContent, JweEncryption};
use crate::utils::arrays;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit};
use tracing::debug;

type Aes192Gcm = AesGcm<aes::Aes192, U12>;

/// GCM nonce size in bytes
pub const IV_LEN: usize = 12;

/// GCM tag size in bytes
pub const TAG_LEN: usize = 16;

/// AES-GCM with a random 96-bit IV and a 128-bit tag
#[derive(Debug, Clone, Copy)]
pub struct AesGcmEncryption {
    name: &'static str,
    key_size_bits: usize,
}

impl AesGcmEncryption {
    /// A128GCM
    #[must_use]
    pub const fn a128gcm() -> Self {
        Self { name: crate::A128GCM, key_size_bits: 128 }
    }

    /// A192GCM
    #[must_use]
    pub const fn a192gcm() -> Self {
        Self { name: crate::A192GCM, key_size_bits: 192 }
    }

    /// A256GCM
    #[must_use]
    pub const fn a256gcm() -> Self {
        Self { name: crate::A256GCM, key_size_bits: 256 }
    }
}

fn seal<C: Aead + KeyInit>(cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(cek)
        .map_err(|e| JoseError::invalid_key(format!("AES-GCM key rejected: {e}")))?;
    cipher
        .encrypt(GenericArray::from_slice(iv), Payload { msg: plaintext, aad })
        .map_err(|e| JoseError::crypto(format!("AES-GCM encryption failed: {e}")))
}

fn open<C: Aead + KeyInit>(cek: &[u8], iv: &[u8], aad: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(cek).map_err(|_| JoseError::AuthenticationFailed)?;
    cipher
        .decrypt(GenericArray::from_slice(iv), Payload { msg: sealed, aad })
        .map_err(|_| JoseError::AuthenticationFailed)
}

impl JweEncryption for AesGcmEncryption {
    fn name(&self) -> &'static str {
        self.name
    }

    fn key_size_bits(&self) -> usize {
        self.key_size_bits
    }

    fn encrypt(&self, aad: &[u8], plaintext: &[u8], cek: &[u8]) -> Result<EncryptedContent> {
        if cek.len() * 8 != self.key_size_bits {
            return Err(JoseError::invalid_key(format!(
                "{} expects a {} bit key, got {} bits",
                self.name,
                self.key_size_bits,
                cek.len() * 8
            )));
        }

        let iv = arrays::random(IV_LEN)?;
        let mut sealed = match self.key_size_bits {
            128 => seal::<Aes128Gcm>(cek, &iv, aad, plaintext)?,
            192 => seal::<Aes192Gcm>(cek, &iv, aad, plaintext)?,
            _ => seal::<Aes256Gcm>(cek, &iv, aad, plaintext)?,
        };

        let tag = sealed.split_off(sealed.len() - TAG_LEN);
        Ok(EncryptedContent { iv, ciphertext: sealed, tag })
    }

    fn decrypt(
        &self,
        aad: &[u8],
        cek: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>> {
        // from_slice panics on a length mismatch
        if cek.len() * 8 != self.key_size_bits || iv.len() != IV_LEN || tag.len() != TAG_LEN {
            debug!(enc = self.name, "key, IV or tag has the wrong size");
            return Err(JoseError::AuthenticationFailed);
        }

        let sealed = arrays::concat(&[ciphertext, tag]);
        match self.key_size_bits {
            128 => open::<Aes128Gcm>(cek, iv, aad, &sealed),
            192 => open::<Aes192Gcm>(cek, iv, aad, &sealed),
            _ => open::<Aes256Gcm>(cek, iv, aad, &sealed),
        }
    }
}
