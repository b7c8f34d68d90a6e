//! JWS compact signing and verification

use crate::error::{JoseError, Result};
use crate::registry::AlgorithmRegistry;
use crate::types::{Header, KeyMaterial, TokenOptions, fields};
use crate::utils::{base64url, compact};
use tracing::{debug, warn};

/// Build `header.payload.signature`
pub(crate) fn sign(
    registry: &AlgorithmRegistry,
    payload: &[u8],
    alg: &str,
    key: &KeyMaterial,
    options: &TokenOptions,
) -> Result<String> {
    let signer = registry.jws(alg)?;

    let mut header = Header::new();
    header.insert(fields::TYP, "JWT");
    for (name, value) in &options.headers {
        header.insert(name.clone(), value.clone());
    }
    header.insert(fields::ALG, signer.name());

    let secured_input = compact::serialize([header.to_json()?.as_slice(), payload]);
    let signature = signer.sign(secured_input.as_bytes(), key)?;

    debug!(alg = signer.name(), payload_len = payload.len(), "signed JWS");
    Ok(format!("{secured_input}.{}", base64url::encode(&signature)))
}

/// Verify a 3-segment token and return its payload
pub(crate) fn verify(
    registry: &AlgorithmRegistry,
    token: &str,
    key: &KeyMaterial,
) -> Result<(Vec<u8>, Header)> {
    let segments = compact::split(token);
    let mut parts = compact::parse(token)?;
    if parts.len() != 3 {
        return Err(JoseError::malformed_token(format!(
            "JWS has {} segments, expected 3",
            parts.len()
        )));
    }

    let header = Header::from_json(&parts[0])?;
    let alg = header.require_str(fields::ALG)?;
    let verifier = registry.jws(alg)?;
    debug!(alg, "resolved JWS verifier");

    // signature covers the segments exactly as received
    let secured_input = &token[..segments[0].len() + 1 + segments[1].len()];

    match verifier.verify(secured_input.as_bytes(), &parts[2], key) {
        Ok(()) => {}
        Err(JoseError::AuthenticationFailed) => {
            warn!(alg, key = key.kind(), "JWS signature verification failed");
            return Err(JoseError::AuthenticationFailed);
        }
        Err(other) => return Err(other),
    }

    let payload = parts.swap_remove(1);
    Ok((payload, header))
}
