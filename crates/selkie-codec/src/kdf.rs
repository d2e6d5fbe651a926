//! Shared secret to symmetric key derivation.
//!
//! Each scheme has its own derivation and the two are deliberately
//! incompatible: the legacy scheme hashes the raw shared secret with
//! SHA-256, the modern scheme expands it through HKDF-SHA256 under a
//! protocol-identifying info string. Both are pure functions with no
//! state between calls.

use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::agreement::SharedSecret;

/// Derived symmetric key length in bytes.
pub const DERIVED_KEY_SIZE: usize = 32;

/// Domain separation string for the modern derivation.
const MODERN_INFO: &[u8] = b"nip44-v2-encryption";

/// A 32-byte symmetric key scoped to a single encrypt or decrypt call.
///
/// Zeroized on drop; `Debug` is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; DERIVED_KEY_SIZE]);

impl DerivedKey {
    /// Returns the raw key bytes for the cipher layer.
    pub fn as_bytes(&self) -> &[u8; DERIVED_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DerivedKey").field(&"<redacted 32 bytes>").finish()
    }
}

/// Legacy derivation: a single SHA-256 over the raw shared secret.
pub fn derive_legacy(shared: &SharedSecret) -> DerivedKey {
    DerivedKey(Sha256::digest(shared.as_bytes()).into())
}

/// Modern derivation: HKDF-SHA256 with an empty salt and a fixed
/// protocol-identifying info string.
pub fn derive_modern(shared: &SharedSecret) -> DerivedKey {
    let hk = Hkdf::<Sha256>::new(None, shared.as_bytes());
    let mut okm = [0u8; DERIVED_KEY_SIZE];
    // 32 bytes is far below the 255 * hash-length HKDF output bound, so
    // expansion cannot fail.
    #[allow(clippy::expect_used)]
    hk.expand(MODERN_INFO, &mut okm).expect("output length within HKDF bound");
    DerivedKey(okm)
}
