//! Fuzz target for the legacy decrypt path
//!
//! Runs the full decrypt pipeline (identifier decode, key agreement,
//! derivation, CBC unpad) against arbitrary envelopes.
//!
//! # Invariants
//!
//! - NEVER panic, whatever the ciphertext or ephemeral point
//! - Failures are always the detail-free padding error or a rejected
//!   low-order point, never partial plaintext or a mixed-up error kind
//! - The padding error itself must not leak where the check failed

#![no_main]

use arbitrary::Arbitrary;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use libfuzzer_sys::fuzz_target;
use selkie_codec::{CodecError, Envelope, Scheme, SecretKey, decrypt_envelope};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    secret: [u8; 32],
    ephemeral: [u8; 32],
    iv: [u8; 16],
    ciphertext: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let nsec = SecretKey::from_bytes(input.secret).encode();
    let json = format!(
        r#"{{"ephemeral_pubkey":"{}","iv":"{}","ciphertext":"{}"}}"#,
        BASE64.encode(input.ephemeral),
        BASE64.encode(input.iv),
        BASE64.encode(&input.ciphertext),
    );
    let envelope = Envelope::from_json(&json).expect("well-formed wire envelope");

    match decrypt_envelope(Scheme::Nip04, &nsec, &envelope) {
        Ok(_) => {},
        Err(CodecError::Padding | CodecError::InvalidKey { .. }) => {},
        Err(other) => panic!("unexpected error kind: {other}"),
    }
});
