//! Hostile-input tests: tampering, invalid curves, decompression bombs and malformed tokens

mod common;

use common::*;
use cryypt_jose::utils::base64url;
use cryypt_jose::{
    Compression, Jose, JoseConfig, JoseError, KeyMaterial, TokenOptions, decode, encrypt, sign,
};
use proptest::prelude::*;

#[test]
fn test_invalid_curve_ephemeral_keys_are_rejected() {
    // Ephemeral keys chosen on a weak curve sharing P-256's coordinates
    let attack_mod_113 = "eyJhbGciOiJFQ0RILUVTK0ExMjhLVyIsImVuYyI6IkExMjhDQkMtSFMyNTYiLCJlcGsiOnsia3R5IjoiRUMiLCJ4IjoiZ1RsaTY1ZVRRN3otQmgxNDdmZjhLM203azJVaURpRzJMcFlrV0FhRkpDYyIsInkiOiJjTEFuakthNGJ6akQ3REpWUHdhOUVQclJ6TUc3ck9OZ3NpVUQta2YzMEZzIiwiY3J2IjoiUC0yNTYifX0.qGAdxtEnrV_3zbIxU2ZKrMWcejNltjA_dtefBFnRh9A2z9cNIqYRWg.pEA5kX304PMCOmFSKX_cEg.a9fwUrx2JXi1OnWEMOmZhXd94-bEGCH9xxRwqcGuG2AMo-AwHoljdsH5C_kcTqlXS5p51OB1tvgQcMwB5rpTxg.72CHiYFecyDvuUa43KKT6w";
    let attack_mod_2447 = "eyJhbGciOiJFQ0RILUVTK0ExMjhLVyIsImVuYyI6IkExMjhDQkMtSFMyNTYiLCJlcGsiOnsia3R5IjoiRUMiLCJ4IjoiWE9YR1E5XzZRQ3ZCZzN1OHZDSS1VZEJ2SUNBRWNOTkJyZnFkN3RHN29RNCIsInkiOiJoUW9XTm90bk56S2x3aUNuZUprTElxRG5UTnc3SXNkQkM1M1ZVcVZqVkpjIiwiY3J2IjoiUC0yNTYifX0.UGb3hX3ePAvtFB9TCdWsNkFTv9QWxSr3MpYNiSBdW630uRXRBT3sxw.6VpU84oMob16DxOR98YTRw.y1UslvtkoWdl9HpugfP0rSAkTw1xhm_LbK1iRXzGdpYqNwIG5VU33UBpKAtKFBoA1Kk_sYtfnHYAvn-aes4FTg.UZPN8h7FcvA5MIOq-Pkj8A";

    let key = ecc256_private();
    assert_eq!(decode(attack_mod_113, &key), Err(JoseError::AuthenticationFailed));
    assert_eq!(decode(attack_mod_2447, &key), Err(JoseError::AuthenticationFailed));
}

#[test]
fn test_decompression_bomb_is_capped() {
    let engine = Jose::with_config(JoseConfig::standard().with_max_inflated_size(4096)).unwrap();
    let key = KeyMaterial::symmetric(AES256_KEY);
    let bomb = vec![0u8; 1024 * 1024];
    let options = TokenOptions::new().with_zip(Compression::Deflate);

    let token = engine
        .encrypt_with(&bomb, cryypt_jose::DIR, cryypt_jose::A256GCM, &key, &options)
        .unwrap();
    assert!(token.len() < 8 * 1024);

    assert_eq!(
        engine.decode(&token, &key),
        Err(JoseError::SizeExceeded { limit: 4096 })
    );
}

#[test]
fn test_payload_at_inflate_limit_is_accepted() {
    let engine = Jose::with_config(JoseConfig::standard().with_max_inflated_size(4096)).unwrap();
    let key = KeyMaterial::symmetric(AES256_KEY);
    let payload = vec![b'a'; 4096];
    let options = TokenOptions::new().with_zip(Compression::Deflate);

    let token = engine
        .encrypt_with(&payload, cryypt_jose::DIR, cryypt_jose::A256GCM, &key, &options)
        .unwrap();
    assert_eq!(engine.decode(&token, &key).unwrap().0, payload);
}

#[test]
fn test_wrong_key_kind_on_jwe_is_authentication_failure() {
    let token = encrypt(
        PAYLOAD,
        cryypt_jose::A128KW,
        cryypt_jose::A128GCM,
        &KeyMaterial::symmetric(AES128_KEY),
    )
    .unwrap();

    assert_eq!(decode(&token, &rsa_private()), Err(JoseError::AuthenticationFailed));
    assert_eq!(
        decode(&token, &KeyMaterial::symmetric(AES256_KEY)),
        Err(JoseError::AuthenticationFailed)
    );
}

#[test]
fn test_rsa1_5_with_foreign_key_fails_authentication() {
    let token = encrypt(
        PAYLOAD,
        cryypt_jose::RSA1_5,
        cryypt_jose::A128CBC_HS256,
        &rsa_public(),
    )
    .unwrap();
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut encrypted_key = base64url::decode(&parts[1]).unwrap();
    encrypted_key[10] ^= 0x80;
    parts[1] = base64url::encode(&encrypted_key);

    assert_eq!(
        decode(&parts.join("."), &rsa_private()),
        Err(JoseError::AuthenticationFailed)
    );
}

#[test]
fn test_malformed_segment_counts() {
    let key = KeyMaterial::symmetric(SHA_KEY.to_vec());
    for token in ["", "abc", "a.b", "a.b.c.d", "a.b.c.d.e.f"] {
        assert!(
            matches!(decode(token, &key), Err(JoseError::MalformedToken(_))),
            "{token:?}"
        );
    }
}

#[test]
fn test_malformed_segments() {
    let key = KeyMaterial::symmetric(SHA_KEY.to_vec());
    // invalid base64url in the payload
    assert!(matches!(
        decode("eyJhbGciOiJIUzI1NiJ9.@@@.AAAA", &key),
        Err(JoseError::MalformedToken(_))
    ));
    // header that is JSON but not an object
    let header = base64url::encode(b"[1,2]");
    assert!(matches!(
        decode(&format!("{header}.e30."), &key),
        Err(JoseError::MalformedToken(_))
    ));
    // header without alg
    let header = base64url::encode(b"{\"typ\":\"JWT\"}");
    assert!(matches!(
        decode(&format!("{header}.e30."), &key),
        Err(JoseError::MalformedToken(_))
    ));
    // payload with more padding than its last group needs
    let header = base64url::encode(b"{\"alg\":\"HS256\"}");
    assert!(matches!(
        decode(&format!("{header}.e30==.AAAA"), &key),
        Err(JoseError::MalformedToken(_))
    ));
}

#[test]
fn test_unknown_names_are_reported() {
    let key = KeyMaterial::symmetric(AES128_KEY);

    let header = base64url::encode(br#"{"alg":"HS1","typ":"JWT"}"#);
    assert_eq!(
        decode(&format!("{header}.e30.AAAA"), &key),
        Err(JoseError::UnknownAlgorithm("HS1".to_string()))
    );

    let header = base64url::encode(br#"{"alg":"A128KW","enc":"A128GCM","zip":"LZW"}"#);
    assert_eq!(
        decode(&format!("{header}.AAAA.AAAA.AAAA.AAAA"), &key),
        Err(JoseError::UnknownAlgorithm("LZW".to_string()))
    );

    assert_eq!(
        encrypt(PAYLOAD, cryypt_jose::A128KW, "A512GCM", &key),
        Err(JoseError::UnknownAlgorithm("A512GCM".to_string()))
    );
}

#[test]
fn test_none_with_signature_is_rejected() {
    let token = format!("{}AAAA", sign(PAYLOAD, cryypt_jose::NONE, &KeyMaterial::None).unwrap());
    assert_eq!(
        decode(&token, &KeyMaterial::None),
        Err(JoseError::AuthenticationFailed)
    );
}

fn flip_bit(token: &str, segment: usize, bit: usize) -> String {
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut bytes = base64url::decode(&parts[segment]).unwrap();
    let bit = bit % (bytes.len() * 8);
    bytes[bit / 8] ^= 1 << (bit % 8);
    parts[segment] = base64url::encode(&bytes);
    parts.join(".")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_any_bit_flip_fails_authentication(
        enc_index in 0usize..6,
        segment in 1usize..5,
        bit in any::<usize>(),
    ) {
        let enc = [
            cryypt_jose::A128CBC_HS256,
            cryypt_jose::A192CBC_HS384,
            cryypt_jose::A256CBC_HS512,
            cryypt_jose::A128GCM,
            cryypt_jose::A192GCM,
            cryypt_jose::A256GCM,
        ][enc_index];
        let key = KeyMaterial::symmetric(AES256_KEY);
        let token = encrypt(PAYLOAD, cryypt_jose::A256KW, enc, &key).unwrap();

        let tampered = flip_bit(&token, segment, bit);
        prop_assert_eq!(decode(&tampered, &key), Err(JoseError::AuthenticationFailed));
    }

    #[test]
    fn test_any_signature_bit_flip_fails_verification(bit in any::<usize>()) {
        let key = KeyMaterial::symmetric(SHA_KEY.to_vec());
        let token = sign(PAYLOAD, cryypt_jose::HS256, &key).unwrap();

        let tampered = flip_bit(&token, 2, bit);
        prop_assert_eq!(decode(&tampered, &key), Err(JoseError::AuthenticationFailed));
    }
}
