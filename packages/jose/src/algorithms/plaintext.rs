//! Unsecured JWS (`alg: "none"`)

use crate::error::{JoseError, Result};
use crate::traits::JwsAlgorithm;
use crate::types::KeyMaterial;

/// `none`: empty signature, any key accepted
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl JwsAlgorithm for Plaintext {
    fn name(&self) -> &'static str {
        crate::NONE
    }

    fn sign(&self, _secured_input: &[u8], _key: &KeyMaterial) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn verify(&self, _secured_input: &[u8], signature: &[u8], _key: &KeyMaterial) -> Result<()> {
        if signature.is_empty() {
            Ok(())
        } else {
            Err(JoseError::AuthenticationFailed)
        }
    }
}
