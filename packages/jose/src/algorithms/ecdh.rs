//! ECDH-ES key agreement over P-256 and P-384 (RFC 7518 §4.6)
//!
//! The sender generates an ephemeral key pair, publishes its public half in
//! the `epk` header as an EC JWK, and runs Concat KDF over the shared
//! secret. In direct mode the KDF output is the CEK; in the `+A*KW` modes it
//! wraps a random CEK.

use super::aes_kw;
use crate::error::{JoseError, Result};
use crate::kdf::{OtherInfo, derive_concat_kdf};
use crate::traits::JwaAlgorithm;
use crate::types::{Header, KeyMaterial, fields};
use crate::utils::{arrays, base64url, padding};
use p256::elliptic_curve::rand_core::OsRng;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use serde_json::{Value, json};
use sha2::Sha256;
use zeroize::Zeroizing;

/// `crv` names
const P256: &str = "P-256";
const P384: &str = "P-384";

/// ECDH-ES key agreement, direct or with AES key wrap
#[derive(Debug, Clone, Copy)]
pub struct EcdhEs {
    name: &'static str,
    kek_size_bits: Option<usize>,
}

impl EcdhEs {
    /// ECDH-ES: the agreed key is the CEK
    #[must_use]
    pub const fn direct() -> Self {
        Self { name: crate::ECDH_ES, kek_size_bits: None }
    }

    /// ECDH-ES+A128KW
    #[must_use]
    pub const fn a128kw() -> Self {
        Self { name: crate::ECDH_ES_A128KW, kek_size_bits: Some(128) }
    }

    /// ECDH-ES+A192KW
    #[must_use]
    pub const fn a192kw() -> Self {
        Self { name: crate::ECDH_ES_A192KW, kek_size_bits: Some(192) }
    }

    /// ECDH-ES+A256KW
    #[must_use]
    pub const fn a256kw() -> Self {
        Self { name: crate::ECDH_ES_A256KW, kek_size_bits: Some(256) }
    }

    /// Concat KDF over `z` with JOSE context from the header
    fn derive(
        &self,
        z: &[u8],
        cek_size_bits: usize,
        header: &Header,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let (algorithm_id, key_bits) = match self.kek_size_bits {
            None => (header.require_str(fields::ENC)?, cek_size_bits),
            Some(bits) => (self.name, bits),
        };

        let apu = agreement_info(header, fields::APU)?;
        let apv = agreement_info(header, fields::APV)?;
        let key_data_len = u32::try_from(key_bits)
            .map_err(|_| JoseError::kdf_overflow("keydatalen does not fit in 32 bits"))?;

        derive_concat_kdf::<Sha256>(
            key_bits,
            z,
            &OtherInfo {
                algorithm_id: &length_prefixed(algorithm_id.as_bytes()),
                party_u_info: &length_prefixed(&apu),
                party_v_info: &length_prefixed(&apv),
                supp_pub_info: &arrays::u32_to_bytes(key_data_len),
                supp_priv_info: &[],
            },
        )
    }
}

/// Decoded `apu`/`apv`, empty when absent
fn agreement_info(header: &Header, name: &str) -> Result<Vec<u8>> {
    match header.get(name) {
        None => Ok(Vec::new()),
        Some(Value::String(encoded)) => base64url::decode(encoded),
        Some(_) => Err(JoseError::malformed_token(format!("'{name}' must be a string"))),
    }
}

/// `Datalen || Data` with a 32-bit big-endian length
fn length_prefixed(data: &[u8]) -> Vec<u8> {
    // header values are far below 4 GiB
    let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
    arrays::concat(&[&arrays::u32_to_bytes(len)[..], data])
}

fn epk_jwk(crv: &str, x: &[u8], y: &[u8]) -> Value {
    json!({
        "kty": "EC",
        "crv": crv,
        "x": base64url::encode(x),
        "y": base64url::encode(y),
    })
}

/// Uncompressed SEC1 point from the `epk` header for a `coordinate_bits` curve
fn epk_point(header: &Header, crv: &str, coordinate_bits: usize) -> Result<Vec<u8>> {
    let epk = header
        .get(fields::EPK)
        .and_then(Value::as_object)
        .ok_or_else(|| JoseError::malformed_token("ECDH-ES token has no 'epk' object"))?;

    let field = |name: &str| -> Result<&str> {
        epk.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| JoseError::malformed_token(format!("'epk' is missing '{name}'")))
    };

    if field("kty")? != "EC" {
        return Err(JoseError::malformed_token("'epk' is not an EC key"));
    }
    let epk_crv = field("crv")?;
    if epk_crv != crv {
        return Err(JoseError::invalid_key(format!(
            "'epk' is on {epk_crv}, recipient key is on {crv}"
        )));
    }

    let coordinate_len = coordinate_bits / 8;
    let x = base64url::decode(field("x")?)?;
    let y = base64url::decode(field("y")?)?;
    let x = padding::align(&x, coordinate_bits);
    let y = padding::align(&y, coordinate_bits);
    if x.len() != coordinate_len || y.len() != coordinate_len {
        return Err(JoseError::invalid_key("'epk' coordinate is too long"));
    }

    Ok(arrays::concat(&[&[0x04u8][..], x.as_ref(), y.as_ref()]))
}

impl JwaAlgorithm for EcdhEs {
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap_new_key(
        &self,
        cek_size_bits: usize,
        key: &KeyMaterial,
        header: &mut Header,
    ) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        let (z, epk) = match key {
            KeyMaterial::P256Public(_) | KeyMaterial::P256Private(_) => {
                let recipient = key.as_p256_public(self.name)?;
                let ephemeral = p256::SecretKey::random(&mut OsRng);
                let shared = p256::ecdh::diffie_hellman(
                    ephemeral.to_nonzero_scalar(),
                    recipient.as_affine(),
                );
                let point = ephemeral.public_key().to_encoded_point(false);
                let (Some(x), Some(y)) = (point.x(), point.y()) else {
                    return Err(JoseError::crypto("ephemeral key has no affine coordinates"));
                };
                (
                    Zeroizing::new(shared.raw_secret_bytes().to_vec()),
                    epk_jwk(P256, x, y),
                )
            }
            KeyMaterial::P384Public(_) | KeyMaterial::P384Private(_) => {
                let recipient = key.as_p384_public(self.name)?;
                let ephemeral = p384::SecretKey::random(&mut OsRng);
                let shared = p384::ecdh::diffie_hellman(
                    ephemeral.to_nonzero_scalar(),
                    recipient.as_affine(),
                );
                let point = ephemeral.public_key().to_encoded_point(false);
                let (Some(x), Some(y)) = (point.x(), point.y()) else {
                    return Err(JoseError::crypto("ephemeral key has no affine coordinates"));
                };
                (
                    Zeroizing::new(shared.raw_secret_bytes().to_vec()),
                    epk_jwk(P384, x, y),
                )
            }
            _ => return Err(JoseError::key_type_mismatch(self.name, "EC public key")),
        };

        header.insert(fields::EPK, epk);
        let derived = self.derive(&z, cek_size_bits, header)?;

        match self.kek_size_bits {
            None => Ok((derived, Vec::new())),
            Some(_) => {
                let cek = Zeroizing::new(arrays::random(cek_size_bits / 8)?);
                let encrypted_cek = aes_kw::wrap(&derived, &cek)?;
                Ok((cek, encrypted_cek))
            }
        }
    }

    fn unwrap(
        &self,
        encrypted_cek: &[u8],
        key: &KeyMaterial,
        cek_size_bits: usize,
        header: &Header,
    ) -> Result<Zeroizing<Vec<u8>>> {
        // from_sec1_bytes rejects points that are not on the recipient's curve
        let z = match key {
            KeyMaterial::P256Private(private_key) => {
                let epk = p256::PublicKey::from_sec1_bytes(&epk_point(header, P256, 256)?)
                    .map_err(|_| JoseError::invalid_key("'epk' is not a valid P-256 point"))?;
                let shared =
                    p256::ecdh::diffie_hellman(private_key.to_nonzero_scalar(), epk.as_affine());
                Zeroizing::new(shared.raw_secret_bytes().to_vec())
            }
            KeyMaterial::P384Private(private_key) => {
                let epk = p384::PublicKey::from_sec1_bytes(&epk_point(header, P384, 384)?)
                    .map_err(|_| JoseError::invalid_key("'epk' is not a valid P-384 point"))?;
                let shared =
                    p384::ecdh::diffie_hellman(private_key.to_nonzero_scalar(), epk.as_affine());
                Zeroizing::new(shared.raw_secret_bytes().to_vec())
            }
            _ => return Err(JoseError::key_type_mismatch(self.name, "EC private key")),
        };

        let derived = self.derive(&z, cek_size_bits, header)?;

        match self.kek_size_bits {
            None if encrypted_cek.is_empty() => Ok(derived),
            None => Err(JoseError::malformed_token(
                "ECDH-ES tokens carry an empty encrypted key segment",
            )),
            Some(_) => aes_kw::unwrap(&derived, encrypted_cek),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_agreement_matches_on_both_sides() {
        let recipient = p256::SecretKey::random(&mut OsRng);
        let mut header = Header::new();
        header.insert(fields::ENC, "A128GCM");

        let alg = EcdhEs::direct();
        let (cek, encrypted) = alg
            .wrap_new_key(128, &KeyMaterial::from(recipient.public_key()), &mut header)
            .unwrap();
        assert!(encrypted.is_empty());
        assert_eq!(cek.len(), 16);
        assert_eq!(header.get(fields::EPK).unwrap()["crv"], "P-256");

        let unwrapped = alg
            .unwrap(&encrypted, &KeyMaterial::from(recipient), 128, &header)
            .unwrap();
        assert_eq!(unwrapped.as_slice(), cek.as_slice());
    }

    #[test]
    fn key_wrap_mode_on_p384() {
        let recipient = p384::SecretKey::random(&mut OsRng);
        let mut header = Header::new();
        header.insert(fields::APU, base64url::encode(b"Alice"));

        let alg = EcdhEs::a256kw();
        let (cek, encrypted) = alg
            .wrap_new_key(256, &KeyMaterial::from(recipient.public_key()), &mut header)
            .unwrap();
        assert_eq!(encrypted.len(), 40);

        let unwrapped = alg
            .unwrap(&encrypted, &KeyMaterial::from(recipient), 256, &header)
            .unwrap();
        assert_eq!(unwrapped.as_slice(), cek.as_slice());
    }

    #[test]
    fn epk_on_other_curve_is_rejected() {
        let sender_side = p384::SecretKey::random(&mut OsRng);
        let mut header = Header::new();
        let alg = EcdhEs::a128kw();
        let (_, encrypted) = alg
            .wrap_new_key(256, &KeyMaterial::from(sender_side.public_key()), &mut header)
            .unwrap();

        let recipient = KeyMaterial::from(p256::SecretKey::random(&mut OsRng));
        assert!(alg.unwrap(&encrypted, &recipient, 256, &header).is_err());
    }

    #[test]
    fn length_prefix_is_big_endian() {
        assert_eq!(length_prefixed(b"A128GCM"), b"\0\0\0\x07A128GCM".to_vec());
    }
}
