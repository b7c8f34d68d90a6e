//! RSA key encryption (RSA1_5, RSA-OAEP, RSA-OAEP-256)

use crate::error::{JoseError, Result};
use crate::traits::JwaAlgorithm;
use crate::types::{Header, KeyMaterial};
use crate::utils::arrays;
use rsa::rand_core::OsRng;
use rsa::{Oaep, Pkcs1v15Encrypt};
use sha1::Sha1;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

/// RSA encryption padding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaPadding {
    /// RSAES-PKCS1-v1_5
    Pkcs1v15,
    /// RSAES-OAEP with SHA-1 and MGF1-SHA-1
    OaepSha1,
    /// RSAES-OAEP with SHA-256 and MGF1-SHA-256
    OaepSha256,
}

/// RSA encryption of a fresh CEK under the recipient's public key
#[derive(Debug, Clone, Copy)]
pub struct RsaEncryption {
    name: &'static str,
    padding: RsaPadding,
}

impl RsaEncryption {
    /// RSA1_5
    #[must_use]
    pub const fn rsa1_5() -> Self {
        Self { name: crate::RSA1_5, padding: RsaPadding::Pkcs1v15 }
    }

    /// RSA-OAEP
    #[must_use]
    pub const fn rsa_oaep() -> Self {
        Self { name: crate::RSA_OAEP, padding: RsaPadding::OaepSha1 }
    }

    /// RSA-OAEP-256
    #[must_use]
    pub const fn rsa_oaep_256() -> Self {
        Self { name: crate::RSA_OAEP_256, padding: RsaPadding::OaepSha256 }
    }
}

impl JwaAlgorithm for RsaEncryption {
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap_new_key(
        &self,
        cek_size_bits: usize,
        key: &KeyMaterial,
        _header: &mut Header,
    ) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        let public_key = key.as_rsa_public(self.name)?;
        let cek = Zeroizing::new(arrays::random(cek_size_bits / 8)?);

        let encrypted_cek = match self.padding {
            RsaPadding::Pkcs1v15 => public_key.encrypt(&mut OsRng, Pkcs1v15Encrypt, &cek),
            RsaPadding::OaepSha1 => public_key.encrypt(&mut OsRng, Oaep::new::<Sha1>(), &cek),
            RsaPadding::OaepSha256 => public_key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), &cek),
        }
        .map_err(|e| JoseError::crypto(format!("{} key encryption failed: {e}", self.name)))?;

        Ok((cek, encrypted_cek))
    }

    fn unwrap(
        &self,
        encrypted_cek: &[u8],
        key: &KeyMaterial,
        cek_size_bits: usize,
        _header: &Header,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let private_key = key.as_rsa_private(self.name)?;

        let decrypted = match self.padding {
            RsaPadding::Pkcs1v15 => {
                private_key.decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, encrypted_cek)
            }
            RsaPadding::OaepSha1 => {
                private_key.decrypt_blinded(&mut OsRng, Oaep::new::<Sha1>(), encrypted_cek)
            }
            RsaPadding::OaepSha256 => {
                private_key.decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), encrypted_cek)
            }
        }
        .map(Zeroizing::new);

        match (self.padding, decrypted) {
            (_, Ok(cek)) if cek.len() * 8 == cek_size_bits => Ok(cek),
            // RFC 7516 §11.5: carry on with a random CEK so a padding failure
            // is indistinguishable from a tag failure
            (RsaPadding::Pkcs1v15, _) => {
                debug!(alg = self.name, "PKCS#1 v1.5 unwrap failed, substituting random key");
                Ok(Zeroizing::new(arrays::random(cek_size_bits / 8)?))
            }
            (_, Ok(_)) => Err(JoseError::crypto("decrypted key has the wrong size")),
            (_, Err(e)) => Err(JoseError::crypto(format!("{} key decryption failed: {e}", self.name))),
        }
    }
}
