//! Algorithm registry
//!
//! Built once with [`RegistryBuilder`], then frozen into an immutable
//! [`AlgorithmRegistry`] that is shared (usually behind an `Arc`) by every
//! sign, encrypt and decode call.

use crate::algorithms::{
    AesCbcHmac, AesGcmEncryption, AesKeyWrap, Direct, EcdhEs, Ecdsa, HmacSha, Pbes2, Plaintext,
    RsaEncryption, RsaSignature,
};
use crate::config::JoseConfig;
use crate::error::{JoseError, Result};
use crate::traits::{JwaAlgorithm, JweEncryption, JwsAlgorithm};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

fn insert_unique<T: ?Sized>(
    table: &mut BTreeMap<&'static str, Box<T>>,
    name: &'static str,
    algorithm: Box<T>,
) -> Result<()> {
    match table.entry(name) {
        Entry::Occupied(_) => Err(JoseError::DuplicateAlgorithm(name.to_string())),
        Entry::Vacant(slot) => {
            slot.insert(algorithm);
            Ok(())
        }
    }
}

/// Mutable registry under construction
#[derive(Default)]
pub struct RegistryBuilder {
    jws: BTreeMap<&'static str, Box<dyn JwsAlgorithm>>,
    jwa: BTreeMap<&'static str, Box<dyn JwaAlgorithm>>,
    jwe: BTreeMap<&'static str, Box<dyn JweEncryption>>,
}

impl RegistryBuilder {
    /// Empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder holding every built-in algorithm
    ///
    /// `config` supplies the PBES2 parameters.
    ///
    /// # Errors
    /// Only if two built-ins share a name, which would be a bug here.
    pub fn with_defaults(config: &JoseConfig) -> Result<Self> {
        let mut builder = Self::new();

        builder.register_jws(Plaintext)?;
        builder.register_jws(HmacSha::hs256())?;
        builder.register_jws(HmacSha::hs384())?;
        builder.register_jws(HmacSha::hs512())?;
        builder.register_jws(RsaSignature::rs256())?;
        builder.register_jws(RsaSignature::rs384())?;
        builder.register_jws(RsaSignature::rs512())?;
        builder.register_jws(RsaSignature::ps256())?;
        builder.register_jws(RsaSignature::ps384())?;
        builder.register_jws(RsaSignature::ps512())?;
        builder.register_jws(Ecdsa::es256())?;
        builder.register_jws(Ecdsa::es384())?;

        builder.register_jwa(Direct)?;
        builder.register_jwa(RsaEncryption::rsa1_5())?;
        builder.register_jwa(RsaEncryption::rsa_oaep())?;
        builder.register_jwa(RsaEncryption::rsa_oaep_256())?;
        builder.register_jwa(AesKeyWrap::a128kw())?;
        builder.register_jwa(AesKeyWrap::a192kw())?;
        builder.register_jwa(AesKeyWrap::a256kw())?;
        builder.register_jwa(EcdhEs::direct())?;
        builder.register_jwa(EcdhEs::a128kw())?;
        builder.register_jwa(EcdhEs::a192kw())?;
        builder.register_jwa(EcdhEs::a256kw())?;
        builder.register_jwa(Pbes2::hs256_a128kw(config))?;
        builder.register_jwa(Pbes2::hs384_a192kw(config))?;
        builder.register_jwa(Pbes2::hs512_a256kw(config))?;

        builder.register_jwe(AesCbcHmac::a128cbc_hs256())?;
        builder.register_jwe(AesCbcHmac::a192cbc_hs384())?;
        builder.register_jwe(AesCbcHmac::a256cbc_hs512())?;
        builder.register_jwe(AesGcmEncryption::a128gcm())?;
        builder.register_jwe(AesGcmEncryption::a192gcm())?;
        builder.register_jwe(AesGcmEncryption::a256gcm())?;

        Ok(builder)
    }

    /// Add a signature algorithm
    ///
    /// # Errors
    /// `DuplicateAlgorithm` if the name is taken.
    pub fn register_jws(&mut self, algorithm: impl JwsAlgorithm) -> Result<&mut Self> {
        let name = algorithm.name();
        insert_unique(&mut self.jws, name, Box::new(algorithm))?;
        Ok(self)
    }

    /// Add a key management algorithm
    ///
    /// # Errors
    /// `DuplicateAlgorithm` if the name is taken.
    pub fn register_jwa(&mut self, algorithm: impl JwaAlgorithm) -> Result<&mut Self> {
        let name = algorithm.name();
        insert_unique(&mut self.jwa, name, Box::new(algorithm))?;
        Ok(self)
    }

    /// Add a content encryption algorithm
    ///
    /// # Errors
    /// `DuplicateAlgorithm` if the name is taken.
    pub fn register_jwe(&mut self, algorithm: impl JweEncryption) -> Result<&mut Self> {
        let name = algorithm.name();
        insert_unique(&mut self.jwe, name, Box::new(algorithm))?;
        Ok(self)
    }

    /// Freeze into a read-only registry
    #[must_use]
    pub fn build(self) -> AlgorithmRegistry {
        AlgorithmRegistry {
            jws: self.jws,
            jwa: self.jwa,
            jwe: self.jwe,
        }
    }
}

/// Immutable name-to-implementation tables for JWS, JWA and JWE
pub struct AlgorithmRegistry {
    jws: BTreeMap<&'static str, Box<dyn JwsAlgorithm>>,
    jwa: BTreeMap<&'static str, Box<dyn JwaAlgorithm>>,
    jwe: BTreeMap<&'static str, Box<dyn JweEncryption>>,
}

impl AlgorithmRegistry {
    /// Registry with every built-in algorithm
    ///
    /// # Errors
    /// See [`RegistryBuilder::with_defaults`].
    pub fn with_defaults(config: &JoseConfig) -> Result<Self> {
        Ok(RegistryBuilder::with_defaults(config)?.build())
    }

    /// Resolve a signature algorithm
    ///
    /// # Errors
    /// `UnknownAlgorithm` if nothing is registered under `name`.
    pub fn jws(&self, name: &str) -> Result<&dyn JwsAlgorithm> {
        self.jws
            .get(name)
            .map(|alg| alg.as_ref())
            .ok_or_else(|| JoseError::unknown_algorithm(name))
    }

    /// Resolve a key management algorithm
    ///
    /// # Errors
    /// `UnknownAlgorithm` if nothing is registered under `name`.
    pub fn jwa(&self, name: &str) -> Result<&dyn JwaAlgorithm> {
        self.jwa
            .get(name)
            .map(|alg| alg.as_ref())
            .ok_or_else(|| JoseError::unknown_algorithm(name))
    }

    /// Resolve a content encryption algorithm
    ///
    /// # Errors
    /// `UnknownAlgorithm` if nothing is registered under `name`.
    pub fn jwe(&self, name: &str) -> Result<&dyn JweEncryption> {
        self.jwe
            .get(name)
            .map(|alg| alg.as_ref())
            .ok_or_else(|| JoseError::unknown_algorithm(name))
    }

    /// Registered signature algorithm names, sorted
    #[must_use]
    pub fn jws_names(&self) -> Vec<&'static str> {
        self.jws.keys().copied().collect()
    }

    /// Registered key management algorithm names, sorted
    #[must_use]
    pub fn jwa_names(&self) -> Vec<&'static str> {
        self.jwa.keys().copied().collect()
    }

    /// Registered content encryption algorithm names, sorted
    #[must_use]
    pub fn jwe_names(&self) -> Vec<&'static str> {
        self.jwe.keys().copied().collect()
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("jws", &self.jws_names())
            .field("jwa", &self.jwa_names())
            .field("jwe", &self.jwe_names())
            .finish()
    }
}
