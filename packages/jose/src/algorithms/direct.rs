//! Direct key agreement (`alg: "dir"`)

use crate::error::{JoseError, Result};
use crate::traits::JwaAlgorithm;
use crate::types::{Header, KeyMaterial};
use zeroize::Zeroizing;

/// `dir`: the symmetric key is the CEK; the encrypted key segment is empty
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl Direct {
    fn cek(key: &KeyMaterial, cek_size_bits: usize) -> Result<Zeroizing<Vec<u8>>> {
        let cek = key.as_symmetric(crate::DIR)?;
        if cek.len() * 8 != cek_size_bits {
            return Err(JoseError::invalid_key(format!(
                "dir needs a {cek_size_bits} bit key for this content encryption, got {} bits",
                cek.len() * 8
            )));
        }
        Ok(Zeroizing::new(cek.to_vec()))
    }
}

impl JwaAlgorithm for Direct {
    fn name(&self) -> &'static str {
        crate::DIR
    }

    fn wrap_new_key(
        &self,
        cek_size_bits: usize,
        key: &KeyMaterial,
        _header: &mut Header,
    ) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        Ok((Self::cek(key, cek_size_bits)?, Vec::new()))
    }

    fn unwrap(
        &self,
        encrypted_cek: &[u8],
        key: &KeyMaterial,
        cek_size_bits: usize,
        _header: &Header,
    ) -> Result<Zeroizing<Vec<u8>>> {
        if !encrypted_cek.is_empty() {
            return Err(JoseError::malformed_token(
                "dir tokens carry an empty encrypted key segment",
            ));
        }
        Self::cek(key, cek_size_bits)
    }
}
