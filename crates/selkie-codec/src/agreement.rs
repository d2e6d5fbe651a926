//! X25519 key agreement.
//!
//! Encryption runs the exchange between a fresh single-use keypair and
//! the recipient's long-term public point; decryption reverses it with
//! the owner's long-term scalar and the ephemeral public point embedded
//! in the envelope. Both sides arrive at the same [`SharedSecret`].
//!
//! Low-order remote points are rejected: a non-contributory exchange
//! yields the all-zero secret regardless of the local scalar, which
//! would let an attacker force a known key.

use rand::{CryptoRng, RngCore};
use x25519_dalek::{EphemeralSecret, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    error::CodecError,
    keys::{PublicKey, SecretKey},
};

/// Shared secret length in bytes.
pub const SHARED_SECRET_SIZE: usize = 32;

/// A raw X25519 shared secret.
///
/// Exists only between agreement and key derivation inside a single
/// encrypt or decrypt call. Zeroized on drop; `Debug` is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    /// Returns the raw secret bytes for key derivation.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedSecret").field(&"<redacted 32 bytes>").finish()
    }
}

/// A single-use keypair generated inside one encrypt call.
///
/// The private half cannot be extracted or serialized; [`Self::agree`]
/// consumes the pair, and the underlying scalar is zeroized once the
/// shared secret has been derived.
pub struct EphemeralKeypair {
    secret: EphemeralSecret,
    public: PublicKey,
}

impl EphemeralKeypair {
    /// Generates a fresh keypair from a cryptographically secure RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = EphemeralSecret::random_from_rng(&mut *rng);
        let public = PublicKey::from_bytes(x25519_dalek::PublicKey::from(&secret).to_bytes());
        Self { secret, public }
    }

    /// The public half, embedded into the envelope for the recipient.
    pub fn public(&self) -> PublicKey {
        self.public
    }

    /// Runs the Diffie-Hellman exchange, consuming the keypair.
    pub fn agree(self, remote: &PublicKey) -> Result<SharedSecret, CodecError> {
        let remote = x25519_dalek::PublicKey::from(*remote.as_bytes());
        contributory(self.secret.diffie_hellman(&remote))
    }
}

/// Static-side agreement: the owner's long-term scalar against the
/// ephemeral public point embedded in the envelope.
pub fn agree(own: &SecretKey, remote: &PublicKey) -> Result<SharedSecret, CodecError> {
    let scalar = StaticSecret::from(*own.as_bytes());
    let remote = x25519_dalek::PublicKey::from(*remote.as_bytes());
    contributory(scalar.diffie_hellman(&remote))
}

/// Derives the public point of a long-term secret key.
pub fn derive_public_key(secret: &SecretKey) -> PublicKey {
    let scalar = StaticSecret::from(*secret.as_bytes());
    PublicKey::from_bytes(x25519_dalek::PublicKey::from(&scalar).to_bytes())
}

fn contributory(shared: x25519_dalek::SharedSecret) -> Result<SharedSecret, CodecError> {
    if shared.was_contributory() {
        Ok(SharedSecret(shared.to_bytes()))
    } else {
        Err(CodecError::InvalidKey { reason: "low-order remote public point".to_string() })
    }
}
