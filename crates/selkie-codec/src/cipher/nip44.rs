//! Modern envelope cipher: ChaCha20-Poly1305 AEAD.

use chacha20poly1305::{
    ChaCha20Poly1305, Key, Nonce,
    aead::{Aead, KeyInit},
};

use crate::{error::CodecError, kdf::DerivedKey};

/// AEAD nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Seals `plaintext`, returning the ciphertext with the tag appended.
///
/// No associated data is bound. The caller must draw a fresh random
/// nonce for every call; reuse under the same key voids both
/// confidentiality and integrity.
pub fn encrypt(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, CodecError> {
    ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()))
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CodecError::MessageTooLarge)
}

/// Opens `ciphertext_with_tag`, verifying the tag atomically.
///
/// On verification failure no partial plaintext ever reaches the
/// caller; the AEAD discards its buffer before the error surfaces.
pub fn decrypt(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    ciphertext_with_tag: &[u8],
) -> Result<Vec<u8>, CodecError> {
    ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()))
        .decrypt(Nonce::from_slice(nonce), ciphertext_with_tag)
        .map_err(|_| CodecError::Authentication)
}
