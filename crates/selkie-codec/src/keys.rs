//! Bech32 key identifier codec.
//!
//! Nostr identifies keys with checksummed, human-readable bech32
//! strings: `npub1...` for public keys and `nsec1...` for secret keys.
//! Both wrap exactly 32 raw bytes. The two prefixes are disjoint and
//! never interchangeable; feeding one where the other is expected fails
//! the same way a corrupted checksum does.

use bech32::{FromBase32, ToBase32, Variant};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CodecError;

/// Human-readable part tagging public key identifiers.
pub const PUBLIC_HRP: &str = "npub";

/// Human-readable part tagging secret key identifiers.
pub const SECRET_HRP: &str = "nsec";

/// Raw key length in bytes.
pub const KEY_SIZE: usize = 32;

/// A 32-byte X25519 public point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; KEY_SIZE]);

impl PublicKey {
    /// Wraps raw public key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Decodes an `npub1...` identifier.
    pub fn decode(identifier: &str) -> Result<Self, CodecError> {
        decode_checked(PUBLIC_HRP, identifier).map(Self)
    }

    /// Encodes this key as an `npub1...` identifier.
    pub fn encode(&self) -> String {
        encode_checked(PUBLIC_HRP, &self.0)
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// A 32-byte X25519 private scalar.
///
/// Zeroized on drop. The `Debug` impl redacts the scalar so it can never
/// leak through logs or panic messages.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    /// Wraps raw secret key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Decodes an `nsec1...` identifier.
    pub fn decode(identifier: &str) -> Result<Self, CodecError> {
        decode_checked(SECRET_HRP, identifier).map(Self)
    }

    /// Encodes this key as an `nsec1...` identifier.
    pub fn encode(&self) -> String {
        encode_checked(SECRET_HRP, &self.0)
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretKey").field(&"<redacted 32 bytes>").finish()
    }
}

/// Decodes a checksummed identifier, enforcing prefix, bech32 variant,
/// and payload length.
fn decode_checked(expected_hrp: &str, identifier: &str) -> Result<[u8; KEY_SIZE], CodecError> {
    let (hrp, data, variant) = bech32::decode(identifier)
        .map_err(|e| CodecError::InvalidEncoding { reason: format!("bech32: {e}") })?;

    if variant != Variant::Bech32 {
        return Err(CodecError::InvalidEncoding {
            reason: "bech32m variant not accepted for key identifiers".to_string(),
        });
    }
    if hrp != expected_hrp {
        return Err(CodecError::InvalidEncoding {
            reason: format!("prefix {hrp:?}, expected {expected_hrp:?}"),
        });
    }

    let mut bytes = Vec::<u8>::from_base32(&data)
        .map_err(|e| CodecError::InvalidEncoding { reason: format!("bech32 payload: {e}") })?;

    if bytes.len() != KEY_SIZE {
        let len = bytes.len();
        bytes.zeroize();
        return Err(CodecError::InvalidEncoding {
            reason: format!("decoded {len} bytes, expected {KEY_SIZE}"),
        });
    }

    let mut raw = [0u8; KEY_SIZE];
    raw.copy_from_slice(&bytes);
    bytes.zeroize();
    Ok(raw)
}

#[allow(clippy::expect_used)]
fn encode_checked(hrp: &str, bytes: &[u8; KEY_SIZE]) -> String {
    // The HRP constants are valid human-readable parts and the payload
    // length is fixed, so encoding cannot fail.
    bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)
        .expect("valid hrp and fixed-length payload")
}
