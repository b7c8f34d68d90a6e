//! HMAC-SHA2 signatures (HS256, HS384, HS512)

use super::ShaSize;
use crate::error::{JoseError, Result};
use crate::traits::JwsAlgorithm;
use crate::types::KeyMaterial;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

/// HMAC over the secured input with a symmetric key
#[derive(Debug, Clone, Copy)]
pub struct HmacSha {
    name: &'static str,
    hash: ShaSize,
}

impl HmacSha {
    /// HS256
    #[must_use]
    pub const fn hs256() -> Self {
        Self { name: crate::HS256, hash: ShaSize::Sha256 }
    }

    /// HS384
    #[must_use]
    pub const fn hs384() -> Self {
        Self { name: crate::HS384, hash: ShaSize::Sha384 }
    }

    /// HS512
    #[must_use]
    pub const fn hs512() -> Self {
        Self { name: crate::HS512, hash: ShaSize::Sha512 }
    }

    fn mac(&self, secured_input: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        let secret = key.as_symmetric(self.name)?;
        match self.hash {
            ShaSize::Sha256 => mac::<Hmac<Sha256>>(secret, &[secured_input]),
            ShaSize::Sha384 => mac::<Hmac<Sha384>>(secret, &[secured_input]),
            ShaSize::Sha512 => mac::<Hmac<Sha512>>(secret, &[secured_input]),
        }
    }
}

/// HMAC of `parts` concatenated, keyed by `key`
pub(crate) fn mac<M: Mac + KeyInit>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|_| JoseError::invalid_key("Invalid HMAC key"))?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}

impl JwsAlgorithm for HmacSha {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, secured_input: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        self.mac(secured_input, key)
    }

    fn verify(&self, secured_input: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<()> {
        let expected = self.mac(secured_input, key)?;
        if bool::from(expected.as_slice().ct_eq(signature)) {
            Ok(())
        } else {
            Err(JoseError::AuthenticationFailed)
        }
    }
}
