//! JWE compact encryption and decryption

use crate::config::JoseConfig;
use crate::error::{JoseError, Result};
use crate::registry::AlgorithmRegistry;
use crate::types::{Compression, Header, KeyMaterial, TokenOptions, fields};
use crate::utils::{base64url, compact};
use cryypt_compression::deflate;
use std::borrow::Cow;
use tracing::{debug, warn};

fn compression(header: &Header) -> Result<Option<Compression>> {
    header.zip().map(str::parse).transpose()
}

/// Build `header.encrypted_key.iv.ciphertext.tag`
pub(crate) fn encrypt(
    registry: &AlgorithmRegistry,
    config: &JoseConfig,
    payload: &[u8],
    alg: &str,
    enc: &str,
    key: &KeyMaterial,
    options: &TokenOptions,
) -> Result<String> {
    let key_manager = registry.jwa(alg)?;
    let encryptor = registry.jwe(enc)?;

    let mut header = Header::new();
    for (name, value) in &options.headers {
        header.insert(name.clone(), value.clone());
    }
    if let Some(zip) = options.zip {
        header.insert(fields::ZIP, zip.as_str());
    }
    header.insert(fields::ALG, key_manager.name());
    header.insert(fields::ENC, encryptor.name());
    let compression = compression(&header)?;

    let (cek, encrypted_cek) =
        key_manager.wrap_new_key(encryptor.key_size_bits(), key, &mut header)?;

    // AAD is the ASCII of the encoded header segment
    let header_segment = base64url::encode(&header.to_json()?);

    let plaintext = match compression {
        Some(Compression::Deflate) => {
            Cow::Owned(deflate::compress(payload, config.compression_level)?)
        }
        None => Cow::Borrowed(payload),
    };

    let content = encryptor.encrypt(header_segment.as_bytes(), &plaintext, &cek)?;

    debug!(
        alg = key_manager.name(),
        enc = encryptor.name(),
        zip = compression.map(Compression::as_str),
        "encrypted JWE"
    );

    Ok(format!(
        "{header_segment}.{}",
        compact::serialize([
            &encrypted_cek,
            &content.iv,
            &content.ciphertext,
            &content.tag,
        ])
    ))
}

/// Decrypt a 5-segment token and return its payload
///
/// Unwrap and decryption failures, including key material of the wrong
/// kind, are all reported as `AuthenticationFailed`.
pub(crate) fn decrypt(
    registry: &AlgorithmRegistry,
    config: &JoseConfig,
    token: &str,
    key: &KeyMaterial,
) -> Result<(Vec<u8>, Header)> {
    let segments = compact::split(token);
    let parts = compact::parse(token)?;
    if parts.len() != 5 {
        return Err(JoseError::malformed_token(format!(
            "JWE has {} segments, expected 5",
            parts.len()
        )));
    }

    let header = Header::from_json(&parts[0])?;
    let alg = header.require_str(fields::ALG)?;
    let enc = header.require_str(fields::ENC)?;
    let key_manager = registry.jwa(alg)?;
    let encryptor = registry.jwe(enc)?;
    let compression = compression(&header)?;
    debug!(alg, enc, "resolved JWE algorithms");

    let aad = segments[0].as_bytes();
    let plaintext = key_manager
        .unwrap(&parts[1], key, encryptor.key_size_bits(), &header)
        .and_then(|cek| encryptor.decrypt(aad, &cek, &parts[2], &parts[3], &parts[4]))
        .map_err(|e| {
            debug!(alg, enc, key = key.kind(), reason = %e, "JWE decryption failed");
            warn!(alg, enc, key = key.kind(), "JWE decryption failed");
            JoseError::AuthenticationFailed
        })?;

    let payload = match compression {
        Some(Compression::Deflate) => {
            deflate::decompress_limited(&plaintext, config.max_inflated_size)?
        }
        None => plaintext,
    };

    Ok((payload, header))
}
