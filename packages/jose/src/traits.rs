//! Algorithm capability traits
//!
//! The three JOSE extension points. Implementations are registered by
//! [`name`](JwsAlgorithm::name) in an [`AlgorithmRegistry`](crate::AlgorithmRegistry)
//! and must be thread-safe, since a built registry is shared by every caller.

use crate::error::Result;
use crate::types::{Header, KeyMaterial};
use zeroize::Zeroizing;

/// Signature / MAC algorithm (JWS `alg`)
pub trait JwsAlgorithm: Send + Sync + 'static {
    /// Header `alg` value
    fn name(&self) -> &'static str;

    /// Sign the secured input (`header-segment.payload-segment`)
    ///
    /// # Errors
    /// `KeyTypeMismatch` for unsupported key material, `InvalidKey` or
    /// `Crypto` if the primitive rejects the key.
    fn sign(&self, secured_input: &[u8], key: &KeyMaterial) -> Result<Vec<u8>>;

    /// Verify a signature over the secured input
    ///
    /// # Errors
    /// `AuthenticationFailed` when the signature does not match.
    fn verify(&self, secured_input: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<()>;
}

/// Key management algorithm (JWE `alg`)
pub trait JwaAlgorithm: Send + Sync + 'static {
    /// Header `alg` value
    fn name(&self) -> &'static str;

    /// Produce a content encryption key and its encrypted form
    ///
    /// May add algorithm parameters (`epk`, `p2s`, `p2c`) to `header`
    /// before it is serialized.
    ///
    /// # Errors
    /// `KeyTypeMismatch` for unsupported key material, `InvalidKey` for a key
    /// of the wrong size.
    fn wrap_new_key(
        &self,
        cek_size_bits: usize,
        key: &KeyMaterial,
        header: &mut Header,
    ) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)>;

    /// Recover the content encryption key
    ///
    /// # Errors
    /// Any failure; the decrypt pipeline reports all of them as
    /// `AuthenticationFailed`.
    fn unwrap(
        &self,
        encrypted_cek: &[u8],
        key: &KeyMaterial,
        cek_size_bits: usize,
        header: &Header,
    ) -> Result<Zeroizing<Vec<u8>>>;
}

/// Output of content encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedContent {
    /// Initialization vector
    pub iv: Vec<u8>,
    /// Ciphertext
    pub ciphertext: Vec<u8>,
    /// Authentication tag
    pub tag: Vec<u8>,
}

/// Content encryption algorithm (JWE `enc`)
pub trait JweEncryption: Send + Sync + 'static {
    /// Header `enc` value
    fn name(&self) -> &'static str;

    /// Content encryption key size in bits
    fn key_size_bits(&self) -> usize;

    /// Encrypt and authenticate `plaintext`, binding `aad`
    ///
    /// # Errors
    /// `InvalidKey` if `cek` has the wrong length.
    fn encrypt(&self, aad: &[u8], plaintext: &[u8], cek: &[u8]) -> Result<EncryptedContent>;

    /// Check the tag and decrypt
    ///
    /// # Errors
    /// `AuthenticationFailed` for any tag, padding or length problem.
    fn decrypt(
        &self,
        aad: &[u8],
        cek: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>>;
}
