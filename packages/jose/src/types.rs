//! Core token types: header, key material, compression selector, options

use crate::error::{JoseError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Header field names
pub mod fields {
    /// Algorithm
    pub const ALG: &str = "alg";
    /// Content encryption algorithm
    pub const ENC: &str = "enc";
    /// Compression algorithm
    pub const ZIP: &str = "zip";
    /// Token type
    pub const TYP: &str = "typ";
    /// Content type
    pub const CTY: &str = "cty";
    /// Key id
    pub const KID: &str = "kid";
    /// Ephemeral public key (ECDH-ES)
    pub const EPK: &str = "epk";
    /// Agreement PartyUInfo (ECDH-ES)
    pub const APU: &str = "apu";
    /// Agreement PartyVInfo (ECDH-ES)
    pub const APV: &str = "apv";
    /// PBES2 salt input
    pub const P2S: &str = "p2s";
    /// PBES2 iteration count
    pub const P2C: &str = "p2c";
}

/// JOSE header
///
/// Backed by a sorted map, so the serialized JSON always lists keys in
/// lexicographic order (`{"alg":"HS256","typ":"JWT"}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Empty header
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `alg` value, if present and a string
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.get_str(fields::ALG)
    }

    /// `enc` value, if present and a string
    #[must_use]
    pub fn enc(&self) -> Option<&str> {
        self.get_str(fields::ENC)
    }

    /// `zip` value, if present and a string
    #[must_use]
    pub fn zip(&self) -> Option<&str> {
        self.get_str(fields::ZIP)
    }

    /// Raw value of a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String value of a field
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Whether a field is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Set a field, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove a field
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Iterate over fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Underlying JSON object
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// String value of a field that must be present
    ///
    /// # Errors
    /// Returns `JoseError::MalformedToken` if the field is missing or not a string.
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.get_str(name)
            .ok_or_else(|| JoseError::malformed_token(format!("header is missing '{name}'")))
    }

    pub(crate) fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    pub(crate) fn from_json(bytes: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(JoseError::malformed_token("header is not a JSON object")),
            Err(e) => Err(JoseError::malformed_token(format!("header is not valid JSON: {e}"))),
        }
    }
}

impl From<Map<String, Value>> for Header {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Payload compression selected by the `zip` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Raw DEFLATE (RFC 1951)
    Deflate,
}

impl Compression {
    /// Header value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Compression::Deflate => "DEF",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compression {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DEF" => Ok(Compression::Deflate),
            other => Err(JoseError::unknown_algorithm(other)),
        }
    }
}

/// Extra settings for a single sign or encrypt call
#[derive(Debug, Clone, Default)]
pub struct TokenOptions {
    pub(crate) headers: Map<String, Value>,
    pub(crate) zip: Option<Compression>,
}

impl TokenOptions {
    /// No extra headers, no compression
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header field such as `kid` or `cty`
    ///
    /// `alg` and `enc` are always taken from the call itself.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Compress the plaintext before encryption (JWE only)
    #[must_use]
    pub fn with_zip(mut self, compression: Compression) -> Self {
        self.zip = Some(compression);
        self
    }
}

/// Key material handed to an algorithm
///
/// Each algorithm accepts a fixed set of variants and fails with
/// [`JoseError::KeyTypeMismatch`] for the rest. Private keys are accepted
/// wherever the matching public key is.
#[derive(Clone)]
pub enum KeyMaterial {
    /// No key (`none` algorithm)
    None,
    /// Raw symmetric key bytes
    Symmetric(Zeroizing<Vec<u8>>),
    /// Password bytes for PBES2
    Password(Zeroizing<Vec<u8>>),
    /// RSA private key
    RsaPrivate(rsa::RsaPrivateKey),
    /// RSA public key
    RsaPublic(rsa::RsaPublicKey),
    /// NIST P-256 private key
    P256Private(p256::SecretKey),
    /// NIST P-256 public key
    P256Public(p256::PublicKey),
    /// NIST P-384 private key
    P384Private(p384::SecretKey),
    /// NIST P-384 public key
    P384Public(p384::PublicKey),
}

impl KeyMaterial {
    /// Symmetric key from raw bytes
    #[must_use]
    pub fn symmetric(bytes: impl Into<Vec<u8>>) -> Self {
        KeyMaterial::Symmetric(Zeroizing::new(bytes.into()))
    }

    /// Password key from raw bytes
    #[must_use]
    pub fn password(bytes: impl Into<Vec<u8>>) -> Self {
        KeyMaterial::Password(Zeroizing::new(bytes.into()))
    }

    /// Variant name, safe to log
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            KeyMaterial::None => "none",
            KeyMaterial::Symmetric(_) => "symmetric",
            KeyMaterial::Password(_) => "password",
            KeyMaterial::RsaPrivate(_) => "RSA private",
            KeyMaterial::RsaPublic(_) => "RSA public",
            KeyMaterial::P256Private(_) => "P-256 private",
            KeyMaterial::P256Public(_) => "P-256 public",
            KeyMaterial::P384Private(_) => "P-384 private",
            KeyMaterial::P384Public(_) => "P-384 public",
        }
    }

    pub(crate) fn as_symmetric(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            KeyMaterial::Symmetric(bytes) => Ok(bytes.as_slice()),
            _ => Err(JoseError::key_type_mismatch(algorithm, "symmetric key")),
        }
    }

    pub(crate) fn as_password(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            KeyMaterial::Password(bytes) => Ok(bytes.as_slice()),
            _ => Err(JoseError::key_type_mismatch(algorithm, "password")),
        }
    }

    pub(crate) fn as_rsa_private(&self, algorithm: &str) -> Result<&rsa::RsaPrivateKey> {
        match self {
            KeyMaterial::RsaPrivate(key) => Ok(key),
            _ => Err(JoseError::key_type_mismatch(algorithm, "RSA private key")),
        }
    }

    pub(crate) fn as_rsa_public(&self, algorithm: &str) -> Result<Cow<'_, rsa::RsaPublicKey>> {
        match self {
            KeyMaterial::RsaPublic(key) => Ok(Cow::Borrowed(key)),
            KeyMaterial::RsaPrivate(key) => Ok(Cow::Owned(key.to_public_key())),
            _ => Err(JoseError::key_type_mismatch(algorithm, "RSA public key")),
        }
    }

    pub(crate) fn as_p256_private(&self, algorithm: &str) -> Result<&p256::SecretKey> {
        match self {
            KeyMaterial::P256Private(key) => Ok(key),
            _ => Err(JoseError::key_type_mismatch(algorithm, "P-256 private key")),
        }
    }

    pub(crate) fn as_p256_public(&self, algorithm: &str) -> Result<p256::PublicKey> {
        match self {
            KeyMaterial::P256Public(key) => Ok(*key),
            KeyMaterial::P256Private(key) => Ok(key.public_key()),
            _ => Err(JoseError::key_type_mismatch(algorithm, "P-256 public key")),
        }
    }

    pub(crate) fn as_p384_private(&self, algorithm: &str) -> Result<&p384::SecretKey> {
        match self {
            KeyMaterial::P384Private(key) => Ok(key),
            _ => Err(JoseError::key_type_mismatch(algorithm, "P-384 private key")),
        }
    }

    pub(crate) fn as_p384_public(&self, algorithm: &str) -> Result<p384::PublicKey> {
        match self {
            KeyMaterial::P384Public(key) => Ok(*key),
            KeyMaterial::P384Private(key) => Ok(key.public_key()),
            _ => Err(JoseError::key_type_mismatch(algorithm, "P-384 public key")),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Symmetric(bytes) | KeyMaterial::Password(bytes) => f
                .debug_struct("KeyMaterial")
                .field("kind", &self.kind())
                .field("len", &bytes.len())
                .finish(),
            _ => f
                .debug_struct("KeyMaterial")
                .field("kind", &self.kind())
                .finish(),
        }
    }
}

impl From<rsa::RsaPrivateKey> for KeyMaterial {
    fn from(key: rsa::RsaPrivateKey) -> Self {
        KeyMaterial::RsaPrivate(key)
    }
}

impl From<rsa::RsaPublicKey> for KeyMaterial {
    fn from(key: rsa::RsaPublicKey) -> Self {
        KeyMaterial::RsaPublic(key)
    }
}

impl From<p256::SecretKey> for KeyMaterial {
    fn from(key: p256::SecretKey) -> Self {
        KeyMaterial::P256Private(key)
    }
}

impl From<p256::PublicKey> for KeyMaterial {
    fn from(key: p256::PublicKey) -> Self {
        KeyMaterial::P256Public(key)
    }
}

impl From<p384::SecretKey> for KeyMaterial {
    fn from(key: p384::SecretKey) -> Self {
        KeyMaterial::P384Private(key)
    }
}

impl From<p384::PublicKey> for KeyMaterial {
    fn from(key: p384::PublicKey) -> Self {
        KeyMaterial::P384Public(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_serializes_sorted() {
        let mut header = Header::new();
        header.insert(fields::TYP, "JWT");
        header.insert(fields::ALG, "HS256");
        assert_eq!(
            header.to_json().unwrap(),
            br#"{"alg":"HS256","typ":"JWT"}"#.to_vec()
        );
    }

    #[test]
    fn header_field_access() {
        let mut map = Map::new();
        map.insert("kid".to_string(), Value::from("key-1"));
        map.insert(fields::ALG.to_string(), Value::from("RS256"));
        let mut header = Header::from(map.clone());

        assert_eq!(header.as_map(), &map);
        assert!(header.contains("kid"));
        assert_eq!(header.alg(), Some("RS256"));

        let names: Vec<&str> = header.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["alg", "kid"]);

        assert_eq!(header.remove("kid"), Some(Value::from("key-1")));
        assert!(!header.contains("kid"));
        assert_eq!(header.remove("kid"), None);
        assert_eq!(header.iter().count(), 1);
    }

    #[test]
    fn header_rejects_non_object() {
        let test = Header::from_json(b"[1,2]");
        assert!(matches!(test, Err(JoseError::MalformedToken(_))));
        assert!(Header::from_json(b"{not json").is_err());
    }

    #[test]
    fn zip_names() {
        assert_eq!("DEF".parse::<Compression>().unwrap(), Compression::Deflate);
        assert!(matches!(
            "GZIP".parse::<Compression>(),
            Err(JoseError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn debug_hides_secret_bytes() {
        let key = KeyMaterial::symmetric(vec![0xAB; 16]);
        let shown = format!("{key:?}");
        assert!(shown.contains("symmetric"));
        assert!(!shown.to_lowercase().contains("ab, "));
        assert!(!shown.contains("171"));
    }

    #[test]
    fn symmetric_key_refused_as_password() {
        let key = KeyMaterial::symmetric(b"secret".to_vec());
        assert!(matches!(
            key.as_password("PBES2-HS256+A128KW"),
            Err(JoseError::KeyTypeMismatch { .. })
        ));
    }
}
