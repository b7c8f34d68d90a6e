//! Password-based key wrapping: PBES2 with HMAC-SHA2 and AES Key Wrap
//! (RFC 7518 §4.8)

use super::{ShaSize, aes_kw};
use crate::config::JoseConfig;
use crate::error::{JoseError, Result};
use crate::kdf::derive_pbkdf2;
use crate::traits::JwaAlgorithm;
use crate::types::{Header, KeyMaterial, fields};
use crate::utils::{arrays, base64url};
use hmac::Hmac;
use serde_json::Value;
use sha2::{Sha256, Sha384, Sha512};
use tracing::debug;
use zeroize::Zeroizing;

/// `PBES2-HS256+A128KW`, `PBES2-HS384+A192KW` or `PBES2-HS512+A256KW`
#[derive(Debug, Clone, Copy)]
pub struct Pbes2 {
    name: &'static str,
    prf: ShaSize,
    iterations: u32,
    salt_size: usize,
    max_iterations: u32,
}

impl Pbes2 {
    /// PBES2-HS256+A128KW
    #[must_use]
    pub fn hs256_a128kw(config: &JoseConfig) -> Self {
        Self::new(crate::PBES2_HS256_A128KW, ShaSize::Sha256, config)
    }

    /// PBES2-HS384+A192KW
    #[must_use]
    pub fn hs384_a192kw(config: &JoseConfig) -> Self {
        Self::new(crate::PBES2_HS384_A192KW, ShaSize::Sha384, config)
    }

    /// PBES2-HS512+A256KW
    #[must_use]
    pub fn hs512_a256kw(config: &JoseConfig) -> Self {
        Self::new(crate::PBES2_HS512_A256KW, ShaSize::Sha512, config)
    }

    fn new(name: &'static str, prf: ShaSize, config: &JoseConfig) -> Self {
        Self {
            name,
            prf,
            iterations: config.pbes2_iterations,
            salt_size: config.pbes2_salt_size,
            max_iterations: config.pbes2_max_iterations,
        }
    }

    /// AES-KW key size is half the PRF output
    fn kek_size_bits(&self) -> usize {
        self.prf.bits() / 2
    }

    fn derive_kek(&self, password: &[u8], p2s: &[u8], p2c: u32) -> Result<Zeroizing<Vec<u8>>> {
        let salt = arrays::concat(&[self.name.as_bytes(), &[0u8][..], p2s]);
        let bits = self.kek_size_bits();
        match self.prf {
            ShaSize::Sha256 => derive_pbkdf2::<Hmac<Sha256>>(password, &salt, p2c, bits),
            ShaSize::Sha384 => derive_pbkdf2::<Hmac<Sha384>>(password, &salt, p2c, bits),
            ShaSize::Sha512 => derive_pbkdf2::<Hmac<Sha512>>(password, &salt, p2c, bits),
        }
    }

    fn iteration_count(&self, header: &Header) -> Result<u32> {
        let p2c = header
            .get(fields::P2C)
            .and_then(Value::as_u64)
            .ok_or_else(|| JoseError::malformed_token("PBES2 token has no numeric 'p2c'"))?;

        match u32::try_from(p2c) {
            Ok(count) if (1..=self.max_iterations).contains(&count) => Ok(count),
            _ => {
                debug!(alg = self.name, p2c, max = self.max_iterations, "'p2c' outside accepted range");
                Err(JoseError::invalid_key(format!(
                    "'p2c' of {p2c} is outside 1..={}",
                    self.max_iterations
                )))
            }
        }
    }
}

impl JwaAlgorithm for Pbes2 {
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap_new_key(
        &self,
        cek_size_bits: usize,
        key: &KeyMaterial,
        header: &mut Header,
    ) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        let password = key.as_password(self.name)?;
        let p2s = arrays::random(self.salt_size)?;
        let kek = self.derive_kek(password, &p2s, self.iterations)?;

        let cek = Zeroizing::new(arrays::random(cek_size_bits / 8)?);
        let encrypted_cek = aes_kw::wrap(&kek, &cek)?;

        header.insert(fields::P2S, base64url::encode(&p2s));
        header.insert(fields::P2C, self.iterations);

        Ok((cek, encrypted_cek))
    }

    fn unwrap(
        &self,
        encrypted_cek: &[u8],
        key: &KeyMaterial,
        _cek_size_bits: usize,
        header: &Header,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let password = key.as_password(self.name)?;
        let p2s = base64url::decode(header.require_str(fields::P2S)?)?;
        let p2c = self.iteration_count(header)?;
        let kek = self.derive_kek(password, &p2s, p2c)?;
        aes_kw::unwrap(&kek, encrypted_cek)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> JoseConfig {
        JoseConfig::standard()
            .with_pbes2_iterations(16)
            .with_pbes2_max_iterations(32)
    }

    #[test]
    fn writes_salt_and_count_headers() {
        let alg = Pbes2::hs384_a192kw(&fast_config());
        let key = KeyMaterial::password(b"Thus from my lips".to_vec());
        let mut header = Header::new();

        let (cek, encrypted) = alg.wrap_new_key(384, &key, &mut header).unwrap();
        assert_eq!(header.get(fields::P2C).and_then(Value::as_u64), Some(16));
        assert_eq!(
            base64url::decode(header.get_str(fields::P2S).unwrap()).unwrap().len(),
            12
        );

        let unwrapped = alg.unwrap(&encrypted, &key, 384, &header).unwrap();
        assert_eq!(unwrapped.as_slice(), cek.as_slice());
    }

    #[test]
    fn oversized_iteration_count_is_refused() {
        let alg = Pbes2::hs256_a128kw(&fast_config());
        let key = KeyMaterial::password(b"pw".to_vec());
        let mut header = Header::new();
        let (_, encrypted) = alg.wrap_new_key(256, &key, &mut header).unwrap();

        header.insert(fields::P2C, 1_000_000_000u64);
        assert!(matches!(
            alg.unwrap(&encrypted, &key, 256, &header),
            Err(JoseError::InvalidKey(_))
        ));
    }

    #[test]
    fn wrong_password_fails_unwrap() {
        let alg = Pbes2::hs512_a256kw(&fast_config());
        let mut header = Header::new();
        let (_, encrypted) = alg
            .wrap_new_key(256, &KeyMaterial::password(b"right".to_vec()), &mut header)
            .unwrap();

        assert!(alg
            .unwrap(&encrypted, &KeyMaterial::password(b"wrong".to_vec()), 256, &header)
            .is_err());
    }
}
