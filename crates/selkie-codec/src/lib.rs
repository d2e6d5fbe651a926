//! Selkie end-to-end encrypted message codec.
//!
//! Encrypts a payload for a specific Nostr recipient and decrypts it as
//! the owner, without trusting the relay transport in between. Two
//! incompatible envelope schemes are supported side by side and
//! selected explicitly on every call:
//!
//! - [`Scheme::Nip04`] (legacy): X25519 agreement, SHA-256 derivation,
//!   AES-256-CBC with PKCS#7 padding, 16-byte IV.
//! - [`Scheme::Nip44`] (modern): X25519 agreement, HKDF-SHA256
//!   derivation, ChaCha20-Poly1305, 12-byte nonce.
//!
//! # Design
//!
//! All functions are pure: randomness is supplied by the caller, which
//! enables deterministic testing with seeded RNGs and keeps the crate
//! free of I/O. The codec never logs, never touches the network or the
//! filesystem, and never persists key material beyond one call.
//!
//! # Security Properties
//!
//! - Per-message protection: every encryption uses a one-shot ephemeral
//!   keypair whose private half never leaves the call.
//! - Secret hygiene: private scalars, shared secrets, and derived keys
//!   are zeroized on every exit path and redacted from `Debug` output.
//! - No scheme fallback: a legacy envelope fed to the modern decoder,
//!   or vice versa, fails with a typed mismatch, never a wrong
//!   plaintext.
//! - Low-order remote points are rejected during key agreement.
//! - Padding and tag verification run in constant time.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod agreement;
pub mod cipher;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod keys;

pub use codec::{decrypt_envelope, encrypt_envelope};
pub use envelope::{Envelope, Scheme};
pub use error::CodecError;
pub use keys::{PublicKey, SecretKey};
