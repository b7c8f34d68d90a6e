//! JOSE engine: compact JWS and JWE tokens
//!
//! This crate provides:
//! - JWS signing and verification (`none`, HS*, RS*, PS*, ES256, ES384)
//! - JWE encryption and decryption with `dir`, RSA, AES key wrap, ECDH-ES and
//!   PBES2 key management over AES-CBC-HMAC and AES-GCM content encryption
//! - An extensible algorithm registry frozen before use
//! - Concat KDF and PBKDF2 over caller-chosen hash primitives
//! - Optional DEFLATE payload compression with a bounded inflate
//!
//! ```no_run
//! use cryypt_jose::{KeyMaterial, decode, sign};
//!
//! # fn main() -> cryypt_jose::Result<()> {
//! let key = KeyMaterial::symmetric(b"a shared secret".to_vec());
//! let token = sign(br#"{"hello": "world"}"#, cryypt_jose::HS256, &key)?;
//! let (payload, header) = decode(&token, &key)?;
//! assert_eq!(header.alg(), Some("HS256"));
//! # Ok(()) }
//! ```

pub mod algorithms;
pub mod config;
mod error;
pub mod kdf;
mod pipeline;
pub mod registry;
pub mod traits;
mod types;
pub mod utils;

pub use config::JoseConfig;
pub use error::{JoseError, Result};
pub use pipeline::Jose;
pub use registry::{AlgorithmRegistry, RegistryBuilder};
pub use traits::{EncryptedContent, JwaAlgorithm, JweEncryption, JwsAlgorithm};
pub use types::{Compression, Header, KeyMaterial, TokenOptions, fields};

use once_cell::sync::Lazy;

/// Unsecured JWS
pub const NONE: &str = "none";
/// HMAC using SHA-256
pub const HS256: &str = "HS256";
/// HMAC using SHA-384
pub const HS384: &str = "HS384";
/// HMAC using SHA-512
pub const HS512: &str = "HS512";
/// RSASSA-PKCS1-v1_5 using SHA-256
pub const RS256: &str = "RS256";
/// RSASSA-PKCS1-v1_5 using SHA-384
pub const RS384: &str = "RS384";
/// RSASSA-PKCS1-v1_5 using SHA-512
pub const RS512: &str = "RS512";
/// RSASSA-PSS using SHA-256
pub const PS256: &str = "PS256";
/// RSASSA-PSS using SHA-384
pub const PS384: &str = "PS384";
/// RSASSA-PSS using SHA-512
pub const PS512: &str = "PS512";
/// ECDSA using P-256 and SHA-256
pub const ES256: &str = "ES256";
/// ECDSA using P-384 and SHA-384
pub const ES384: &str = "ES384";

/// Direct use of a shared symmetric key as the CEK
pub const DIR: &str = "dir";
/// RSAES-PKCS1-v1_5
pub const RSA1_5: &str = "RSA1_5";
/// RSAES OAEP using default parameters
pub const RSA_OAEP: &str = "RSA-OAEP";
/// RSAES OAEP using SHA-256 and MGF1 with SHA-256
pub const RSA_OAEP_256: &str = "RSA-OAEP-256";
/// AES Key Wrap with a 128-bit key
pub const A128KW: &str = "A128KW";
/// AES Key Wrap with a 192-bit key
pub const A192KW: &str = "A192KW";
/// AES Key Wrap with a 256-bit key
pub const A256KW: &str = "A256KW";
/// ECDH-ES using Concat KDF
pub const ECDH_ES: &str = "ECDH-ES";
/// ECDH-ES using Concat KDF and A128KW
pub const ECDH_ES_A128KW: &str = "ECDH-ES+A128KW";
/// ECDH-ES using Concat KDF and A192KW
pub const ECDH_ES_A192KW: &str = "ECDH-ES+A192KW";
/// ECDH-ES using Concat KDF and A256KW
pub const ECDH_ES_A256KW: &str = "ECDH-ES+A256KW";
/// PBES2 with HMAC SHA-256 and A128KW
pub const PBES2_HS256_A128KW: &str = "PBES2-HS256+A128KW";
/// PBES2 with HMAC SHA-384 and A192KW
pub const PBES2_HS384_A192KW: &str = "PBES2-HS384+A192KW";
/// PBES2 with HMAC SHA-512 and A256KW
pub const PBES2_HS512_A256KW: &str = "PBES2-HS512+A256KW";

/// AES-128-CBC with HMAC-SHA-256
pub const A128CBC_HS256: &str = "A128CBC-HS256";
/// AES-192-CBC with HMAC-SHA-384
pub const A192CBC_HS384: &str = "A192CBC-HS384";
/// AES-256-CBC with HMAC-SHA-512
pub const A256CBC_HS512: &str = "A256CBC-HS512";
/// AES-GCM with a 128-bit key
pub const A128GCM: &str = "A128GCM";
/// AES-GCM with a 192-bit key
pub const A192GCM: &str = "A192GCM";
/// AES-GCM with a 256-bit key
pub const A256GCM: &str = "A256GCM";

static DEFAULT_ENGINE: Lazy<Result<Jose>> = Lazy::new(Jose::new);

fn default_engine() -> Result<&'static Jose> {
    DEFAULT_ENGINE.as_ref().map_err(Clone::clone)
}

/// Sign with the default engine
///
/// # Errors
/// See [`Jose::sign`].
pub fn sign(payload: impl AsRef<[u8]>, alg: &str, key: &KeyMaterial) -> Result<String> {
    default_engine()?.sign(payload, alg, key)
}

/// Encrypt with the default engine
///
/// # Errors
/// See [`Jose::encrypt`].
pub fn encrypt(
    payload: impl AsRef<[u8]>,
    alg: &str,
    enc: &str,
    key: &KeyMaterial,
) -> Result<String> {
    default_engine()?.encrypt(payload, alg, enc, key)
}

/// Verify or decrypt with the default engine
///
/// # Errors
/// See [`Jose::decode`].
pub fn decode(token: &str, key: &KeyMaterial) -> Result<(Vec<u8>, Header)> {
    default_engine()?.decode(token, key)
}

/// Read a token's header without verifying it
///
/// # Errors
/// `MalformedToken` if the first segment is not a base64url JSON object.
pub fn header(token: &str) -> Result<Header> {
    pipeline::read_header(token)
}
