//! Sign, encrypt and decode pipelines
//!
//! [`Jose`] pairs a frozen [`AlgorithmRegistry`] with a [`JoseConfig`]. It is
//! cheap to clone and safe to share across threads.

mod jwe;
mod jws;

use crate::config::JoseConfig;
use crate::error::{JoseError, Result};
use crate::registry::AlgorithmRegistry;
use crate::types::{Header, KeyMaterial, TokenOptions};
use crate::utils::{base64url, compact};
use std::sync::Arc;

/// JOSE engine
#[derive(Debug, Clone)]
pub struct Jose {
    registry: Arc<AlgorithmRegistry>,
    config: JoseConfig,
}

impl Jose {
    /// Engine with the built-in algorithms and default configuration
    ///
    /// # Errors
    /// See [`Jose::with_config`].
    pub fn new() -> Result<Self> {
        Self::with_config(JoseConfig::default())
    }

    /// Engine with the built-in algorithms
    ///
    /// # Errors
    /// `InvalidConfig` if `config` fails [`JoseConfig::validate`].
    pub fn with_config(config: JoseConfig) -> Result<Self> {
        config.validate()?;
        let registry = AlgorithmRegistry::with_defaults(&config)?;
        Ok(Self {
            registry: Arc::new(registry),
            config,
        })
    }

    /// Engine over a caller-built registry
    ///
    /// # Errors
    /// `InvalidConfig` if `config` fails [`JoseConfig::validate`].
    pub fn with_registry(registry: Arc<AlgorithmRegistry>, config: JoseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Algorithms this engine resolves
    #[must_use]
    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &JoseConfig {
        &self.config
    }

    /// Produce a JWS with header `{"alg": alg, "typ": "JWT"}`
    ///
    /// # Errors
    /// `UnknownAlgorithm` for an unregistered `alg`, or any signer error.
    pub fn sign(&self, payload: impl AsRef<[u8]>, alg: &str, key: &KeyMaterial) -> Result<String> {
        self.sign_with(payload, alg, key, &TokenOptions::default())
    }

    /// Produce a JWS with extra header fields
    ///
    /// # Errors
    /// `UnknownAlgorithm` for an unregistered `alg`, or any signer error.
    pub fn sign_with(
        &self,
        payload: impl AsRef<[u8]>,
        alg: &str,
        key: &KeyMaterial,
        options: &TokenOptions,
    ) -> Result<String> {
        jws::sign(&self.registry, payload.as_ref(), alg, key, options)
    }

    /// Produce a JWE with header `{"alg": alg, "enc": enc}`
    ///
    /// # Errors
    /// `UnknownAlgorithm` for an unregistered `alg` or `enc`, or any key
    /// management or encryption error.
    pub fn encrypt(
        &self,
        payload: impl AsRef<[u8]>,
        alg: &str,
        enc: &str,
        key: &KeyMaterial,
    ) -> Result<String> {
        self.encrypt_with(payload, alg, enc, key, &TokenOptions::default())
    }

    /// Produce a JWE with extra header fields and optional compression
    ///
    /// # Errors
    /// As [`Jose::encrypt`], plus `Compression` if DEFLATE fails.
    pub fn encrypt_with(
        &self,
        payload: impl AsRef<[u8]>,
        alg: &str,
        enc: &str,
        key: &KeyMaterial,
        options: &TokenOptions,
    ) -> Result<String> {
        jwe::encrypt(
            &self.registry,
            &self.config,
            payload.as_ref(),
            alg,
            enc,
            key,
            options,
        )
    }

    /// Verify or decrypt a compact token
    ///
    /// Three segments take the JWS path, five the JWE path.
    ///
    /// # Errors
    /// - `MalformedToken` for any other segment count, bad base64url or an
    ///   unreadable header
    /// - `UnknownAlgorithm` for unregistered `alg`, `enc` or `zip`
    /// - `AuthenticationFailed` when the signature, key unwrap or tag fails
    /// - `SizeExceeded` when a compressed payload inflates past
    ///   [`JoseConfig::max_inflated_size`]
    pub fn decode(&self, token: &str, key: &KeyMaterial) -> Result<(Vec<u8>, Header)> {
        match compact::split(token).len() {
            3 => jws::verify(&self.registry, token, key),
            5 => jwe::decrypt(&self.registry, &self.config, token, key),
            n => Err(JoseError::malformed_token(format!(
                "token has {n} segments, expected 3 or 5"
            ))),
        }
    }

    /// Read a token's header without verifying anything
    ///
    /// # Errors
    /// `MalformedToken` if the first segment is not a base64url JSON object.
    pub fn header(&self, token: &str) -> Result<Header> {
        read_header(token)
    }
}

pub(crate) fn read_header(token: &str) -> Result<Header> {
    let first = compact::split(token)
        .first()
        .copied()
        .ok_or_else(|| JoseError::malformed_token("empty token"))?;
    Header::from_json(&base64url::decode(first)?)
}
