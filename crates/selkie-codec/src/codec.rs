//! Encrypt-for-recipient and decrypt-as-owner facade.
//!
//! These two functions are the crate's surface for the full pipeline:
//! identifier decoding, ephemeral key agreement, scheme-matched
//! derivation, and the scheme-matched cipher. Every call is independent
//! and stateless; drawing from the caller's RNG is the only effect.

use rand::{CryptoRng, RngCore};

use crate::{
    agreement::{self, EphemeralKeypair},
    cipher::{nip04, nip44},
    envelope::{Envelope, Header, Scheme},
    error::CodecError,
    kdf,
    keys::{PublicKey, SecretKey},
};

/// Encrypts `plaintext` for the holder of `recipient`, an `npub1...`
/// identifier.
///
/// A fresh ephemeral keypair and a fresh IV or nonce are drawn from
/// `rng` on every call. The ephemeral public half is embedded in the
/// returned envelope; the private half is consumed by the exchange and
/// zeroized before this function returns.
pub fn encrypt_envelope<R: RngCore + CryptoRng>(
    scheme: Scheme,
    recipient: &str,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<Envelope, CodecError> {
    let recipient = PublicKey::decode(recipient)?;
    let ephemeral = EphemeralKeypair::generate(rng);
    let ephemeral_pubkey = ephemeral.public();
    let shared = ephemeral.agree(&recipient)?;

    match scheme {
        Scheme::Nip04 => {
            let key = kdf::derive_legacy(&shared);
            let mut iv = [0u8; nip04::IV_SIZE];
            rng.fill_bytes(&mut iv);
            let ciphertext = nip04::encrypt(&key, &iv, plaintext);
            Ok(Envelope::legacy(ephemeral_pubkey, iv, ciphertext))
        },
        Scheme::Nip44 => {
            let key = kdf::derive_modern(&shared);
            let mut nonce = [0u8; nip44::NONCE_SIZE];
            rng.fill_bytes(&mut nonce);
            let ciphertext = nip44::encrypt(&key, &nonce, plaintext)?;
            Ok(Envelope::modern(ephemeral_pubkey, nonce, ciphertext))
        },
    }
}

/// Decrypts an envelope as the holder of `own_key`, an `nsec1...`
/// identifier.
///
/// The envelope's shape must match the requested scheme; a mismatch
/// fails before any key material is touched, and no fallback to the
/// other scheme is ever attempted.
pub fn decrypt_envelope(
    scheme: Scheme,
    own_key: &str,
    envelope: &Envelope,
) -> Result<Vec<u8>, CodecError> {
    if envelope.scheme() != scheme {
        return Err(CodecError::SchemeMismatch { requested: scheme, found: envelope.scheme() });
    }

    let secret = SecretKey::decode(own_key)?;
    let shared = agreement::agree(&secret, envelope.ephemeral_pubkey())?;

    match envelope.header() {
        Header::Iv(iv) => {
            let key = kdf::derive_legacy(&shared);
            nip04::decrypt(&key, &iv, envelope.ciphertext())
        },
        Header::Nonce(nonce) => {
            let key = kdf::derive_modern(&shared);
            nip44::decrypt(&key, &nonce, envelope.ciphertext())
        },
    }
}
