//! ECDSA signatures over NIST curves (ES256, ES384)
//!
//! Signatures use the fixed-width `R || S` form of RFC 7518 §3.4, not DER.

use crate::error::{JoseError, Result};
use crate::traits::JwsAlgorithm;
use crate::types::KeyMaterial;
use p256::ecdsa::signature::{Signer, Verifier};

/// Curve for an ECDSA algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcCurve {
    /// P-256 with SHA-256
    P256,
    /// P-384 with SHA-384
    P384,
}

/// ECDSA signature algorithm
#[derive(Debug, Clone, Copy)]
pub struct Ecdsa {
    name: &'static str,
    curve: EcCurve,
}

impl Ecdsa {
    /// ES256
    #[must_use]
    pub const fn es256() -> Self {
        Self { name: crate::ES256, curve: EcCurve::P256 }
    }

    /// ES384
    #[must_use]
    pub const fn es384() -> Self {
        Self { name: crate::ES384, curve: EcCurve::P384 }
    }
}

impl JwsAlgorithm for Ecdsa {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, secured_input: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        let signature = match self.curve {
            EcCurve::P256 => {
                let signing_key = p256::ecdsa::SigningKey::from(key.as_p256_private(self.name)?);
                let signature: p256::ecdsa::Signature = signing_key
                    .try_sign(secured_input)
                    .map_err(|e| JoseError::crypto(format!("ES256 signing failed: {e}")))?;
                signature.to_bytes().to_vec()
            }
            EcCurve::P384 => {
                let signing_key = p384::ecdsa::SigningKey::from(key.as_p384_private(self.name)?);
                let signature: p384::ecdsa::Signature = signing_key
                    .try_sign(secured_input)
                    .map_err(|e| JoseError::crypto(format!("ES384 signing failed: {e}")))?;
                signature.to_bytes().to_vec()
            }
        };
        Ok(signature)
    }

    fn verify(&self, secured_input: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<()> {
        let verified = match self.curve {
            EcCurve::P256 => {
                let verifying_key =
                    p256::ecdsa::VerifyingKey::from(&key.as_p256_public(self.name)?);
                let signature = p256::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| JoseError::AuthenticationFailed)?;
                verifying_key.verify(secured_input, &signature)
            }
            EcCurve::P384 => {
                let verifying_key =
                    p384::ecdsa::VerifyingKey::from(&key.as_p384_public(self.name)?);
                let signature = p384::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| JoseError::AuthenticationFailed)?;
                verifying_key.verify(secured_input, &signature)
            }
        };

        verified.map_err(|_| JoseError::AuthenticationFailed)
    }
}
