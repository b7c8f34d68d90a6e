//! RSA signatures: RSASSA-PKCS1-v1_5 (RS*) and RSASSA-PSS (PS*)

use super::ShaSize;
use crate::error::{JoseError, Result};
use crate::traits::JwsAlgorithm;
use crate::types::KeyMaterial;
use rsa::rand_core::OsRng;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use rsa::{pkcs1v15, pss};
use sha2::{Sha256, Sha384, Sha512};

/// RSA signature padding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaScheme {
    /// RSASSA-PKCS1-v1_5
    Pkcs1v15,
    /// RSASSA-PSS, salt length equal to the digest length
    Pss,
}

/// RSA signature algorithm
#[derive(Debug, Clone, Copy)]
pub struct RsaSignature {
    name: &'static str,
    scheme: RsaScheme,
    hash: ShaSize,
}

impl RsaSignature {
    /// RS256
    #[must_use]
    pub const fn rs256() -> Self {
        Self::new(crate::RS256, RsaScheme::Pkcs1v15, ShaSize::Sha256)
    }

    /// RS384
    #[must_use]
    pub const fn rs384() -> Self {
        Self::new(crate::RS384, RsaScheme::Pkcs1v15, ShaSize::Sha384)
    }

    /// RS512
    #[must_use]
    pub const fn rs512() -> Self {
        Self::new(crate::RS512, RsaScheme::Pkcs1v15, ShaSize::Sha512)
    }

    /// PS256
    #[must_use]
    pub const fn ps256() -> Self {
        Self::new(crate::PS256, RsaScheme::Pss, ShaSize::Sha256)
    }

    /// PS384
    #[must_use]
    pub const fn ps384() -> Self {
        Self::new(crate::PS384, RsaScheme::Pss, ShaSize::Sha384)
    }

    /// PS512
    #[must_use]
    pub const fn ps512() -> Self {
        Self::new(crate::PS512, RsaScheme::Pss, ShaSize::Sha512)
    }

    const fn new(name: &'static str, scheme: RsaScheme, hash: ShaSize) -> Self {
        Self { name, scheme, hash }
    }
}

impl JwsAlgorithm for RsaSignature {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, secured_input: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        let private_key = key.as_rsa_private(self.name)?.clone();

        let signature = match (self.scheme, self.hash) {
            (RsaScheme::Pkcs1v15, ShaSize::Sha256) => pkcs1v15::SigningKey::<Sha256>::new(private_key)
                .try_sign(secured_input)
                .map(|s| s.to_vec()),
            (RsaScheme::Pkcs1v15, ShaSize::Sha384) => pkcs1v15::SigningKey::<Sha384>::new(private_key)
                .try_sign(secured_input)
                .map(|s| s.to_vec()),
            (RsaScheme::Pkcs1v15, ShaSize::Sha512) => pkcs1v15::SigningKey::<Sha512>::new(private_key)
                .try_sign(secured_input)
                .map(|s| s.to_vec()),
            (RsaScheme::Pss, ShaSize::Sha256) => pss::BlindedSigningKey::<Sha256>::new(private_key)
                .try_sign_with_rng(&mut OsRng, secured_input)
                .map(|s| s.to_vec()),
            (RsaScheme::Pss, ShaSize::Sha384) => pss::BlindedSigningKey::<Sha384>::new(private_key)
                .try_sign_with_rng(&mut OsRng, secured_input)
                .map(|s| s.to_vec()),
            (RsaScheme::Pss, ShaSize::Sha512) => pss::BlindedSigningKey::<Sha512>::new(private_key)
                .try_sign_with_rng(&mut OsRng, secured_input)
                .map(|s| s.to_vec()),
        };

        signature.map_err(|e| JoseError::crypto(format!("{} signing failed: {e}", self.name)))
    }

    fn verify(&self, secured_input: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<()> {
        let public_key = key.as_rsa_public(self.name)?.into_owned();

        let verified = match self.scheme {
            RsaScheme::Pkcs1v15 => {
                let signature = pkcs1v15::Signature::try_from(signature)
                    .map_err(|_| JoseError::AuthenticationFailed)?;
                match self.hash {
                    ShaSize::Sha256 => pkcs1v15::VerifyingKey::<Sha256>::new(public_key)
                        .verify(secured_input, &signature),
                    ShaSize::Sha384 => pkcs1v15::VerifyingKey::<Sha384>::new(public_key)
                        .verify(secured_input, &signature),
                    ShaSize::Sha512 => pkcs1v15::VerifyingKey::<Sha512>::new(public_key)
                        .verify(secured_input, &signature),
                }
            }
            RsaScheme::Pss => {
                let signature = pss::Signature::try_from(signature)
                    .map_err(|_| JoseError::AuthenticationFailed)?;
                match self.hash {
                    ShaSize::Sha256 => pss::VerifyingKey::<Sha256>::new(public_key)
                        .verify(secured_input, &signature),
                    ShaSize::Sha384 => pss::VerifyingKey::<Sha384>::new(public_key)
                        .verify(secured_input, &signature),
                    ShaSize::Sha512 => pss::VerifyingKey::<Sha512>::new(public_key)
                        .verify(secured_input, &signature),
                }
            }
        };

        verified.map_err(|_| JoseError::AuthenticationFailed)
    }
}
