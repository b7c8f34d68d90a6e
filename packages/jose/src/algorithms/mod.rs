//! Built-in algorithm implementations
//!
//! JWS signers, JWA key managers and JWE content encryptors registered by
//! [`RegistryBuilder::with_defaults`](crate::RegistryBuilder::with_defaults).

pub mod aes_cbc_hmac;
pub mod aes_gcm;
pub mod aes_kw;
pub mod direct;
pub mod ecdh;
pub mod ecdsa;
pub mod hmac;
pub mod pbes2;
pub mod plaintext;
pub mod rsa;
pub mod rsa_encryption;

pub use aes_cbc_hmac::AesCbcHmac;
pub use aes_gcm::AesGcmEncryption;
pub use aes_kw::AesKeyWrap;
pub use direct::Direct;
pub use ecdh::EcdhEs;
pub use ecdsa::Ecdsa;
pub use hmac::HmacSha;
pub use pbes2::Pbes2;
pub use plaintext::Plaintext;
pub use rsa::RsaSignature;
pub use rsa_encryption::RsaEncryption;

/// SHA-2 output size selecting a hash or PRF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaSize {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl ShaSize {
    /// Digest length in bits
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            ShaSize::Sha256 => 256,
            ShaSize::Sha384 => 384,
            ShaSize::Sha512 => 512,
        }
    }
}
