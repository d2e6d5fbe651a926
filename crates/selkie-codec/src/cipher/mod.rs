//! The two envelope ciphers.
//!
//! Each submodule is a pure transform over (key, iv-or-nonce,
//! plaintext). The facade selects between them with an explicit
//! [`Scheme`](crate::envelope::Scheme) tag on every call; the two wire
//! shapes are incompatible by construction and never fall back to one
//! another.

pub mod nip04;
pub mod nip44;
