//! Serialized envelope and scheme selection.
//!
//! The wire format is JSON with base64 fields, matching what relays
//! carry as event content:
//!
//! ```json
//! {"ephemeral_pubkey": "...", "iv": "...", "ciphertext": "..."}
//! {"ephemeral_pubkey": "...", "nonce": "...", "ciphertext": "..."}
//! ```
//!
//! The `iv`/`nonce` field discriminates the scheme: exactly one must be
//! present, a 16-byte IV for the legacy cipher or a 12-byte nonce for
//! the modern one.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use crate::{
    cipher::{nip04::IV_SIZE, nip44::NONCE_SIZE},
    error::CodecError,
    keys::{KEY_SIZE, PublicKey},
};

/// The two envelope schemes.
///
/// Selection is always explicit and caller-driven; there is no default
/// and no fallback from one scheme to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Legacy: SHA-256 derivation, AES-256-CBC, 16-byte IV.
    Nip04,
    /// Modern: HKDF-SHA256 derivation, ChaCha20-Poly1305, 12-byte nonce.
    Nip44,
}

impl Scheme {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nip04 => "nip04",
            Self::Nip44 => "nip44",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheme-discriminating header: a CBC IV or an AEAD nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Header {
    /// Legacy CBC initialization vector.
    Iv([u8; IV_SIZE]),
    /// Modern AEAD nonce.
    Nonce([u8; NONCE_SIZE]),
}

/// Everything a recipient needs, besides their own secret key, to
/// decrypt a message.
///
/// Created by encryption, consumed once by decryption; otherwise an
/// opaque, immutable, serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireEnvelope", try_from = "WireEnvelope")]
pub struct Envelope {
    ephemeral_pubkey: PublicKey,
    header: Header,
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Assembles a legacy envelope.
    pub(crate) fn legacy(
        ephemeral_pubkey: PublicKey,
        iv: [u8; IV_SIZE],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self { ephemeral_pubkey, header: Header::Iv(iv), ciphertext }
    }

    /// Assembles a modern envelope.
    pub(crate) fn modern(
        ephemeral_pubkey: PublicKey,
        nonce: [u8; NONCE_SIZE],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self { ephemeral_pubkey, header: Header::Nonce(nonce), ciphertext }
    }

    /// The scheme this envelope's shape belongs to.
    pub fn scheme(&self) -> Scheme {
        match self.header {
            Header::Iv(_) => Scheme::Nip04,
            Header::Nonce(_) => Scheme::Nip44,
        }
    }

    /// The ephemeral public key embedded by the sender.
    pub fn ephemeral_pubkey(&self) -> &PublicKey {
        &self.ephemeral_pubkey
    }

    /// The legacy IV, when this is a legacy envelope.
    pub fn iv(&self) -> Option<&[u8; IV_SIZE]> {
        match &self.header {
            Header::Iv(iv) => Some(iv),
            Header::Nonce(_) => None,
        }
    }

    /// The modern nonce, when this is a modern envelope.
    pub fn nonce(&self) -> Option<&[u8; NONCE_SIZE]> {
        match &self.header {
            Header::Nonce(nonce) => Some(nonce),
            Header::Iv(_) => None,
        }
    }

    /// The raw ciphertext (with the tag appended, for modern envelopes).
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub(crate) fn header(&self) -> Header {
        self.header
    }

    /// Serializes to the JSON wire format.
    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string(self)
            .map_err(|e| CodecError::InvalidEncoding { reason: e.to_string() })
    }

    /// Parses the JSON wire format, validating shape and field lengths.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidEncoding { reason: e.to_string() })
    }
}

/// On-the-wire JSON shape with base64 fields.
#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    ephemeral_pubkey: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nonce: Option<String>,
    ciphertext: String,
}

impl From<Envelope> for WireEnvelope {
    fn from(envelope: Envelope) -> Self {
        let (iv, nonce) = match envelope.header {
            Header::Iv(iv) => (Some(BASE64.encode(iv)), None),
            Header::Nonce(nonce) => (None, Some(BASE64.encode(nonce))),
        };
        Self {
            ephemeral_pubkey: BASE64.encode(envelope.ephemeral_pubkey.as_bytes()),
            iv,
            nonce,
            ciphertext: BASE64.encode(&envelope.ciphertext),
        }
    }
}

impl TryFrom<WireEnvelope> for Envelope {
    type Error = CodecError;

    fn try_from(wire: WireEnvelope) -> Result<Self, CodecError> {
        let ephemeral: [u8; KEY_SIZE] = fixed("ephemeral_pubkey", &wire.ephemeral_pubkey)?;
        let ciphertext = decode_field("ciphertext", &wire.ciphertext)?;

        let header = match (&wire.iv, &wire.nonce) {
            (Some(iv), None) => Header::Iv(fixed("iv", iv)?),
            (None, Some(nonce)) => Header::Nonce(fixed("nonce", nonce)?),
            (Some(_), Some(_)) => {
                return Err(CodecError::InvalidEncoding {
                    reason: "envelope carries both iv and nonce".to_string(),
                });
            },
            (None, None) => {
                return Err(CodecError::InvalidEncoding {
                    reason: "envelope carries neither iv nor nonce".to_string(),
                });
            },
        };

        Ok(Self { ephemeral_pubkey: PublicKey::from_bytes(ephemeral), header, ciphertext })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, CodecError> {
    BASE64
        .decode(value)
        .map_err(|e| CodecError::InvalidEncoding { reason: format!("{name}: {e}") })
}

fn fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N], CodecError> {
    let bytes = decode_field(name, value)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| CodecError::InvalidEncoding {
        reason: format!("{name}: {len} bytes, expected {N}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_envelope() -> Envelope {
        Envelope::legacy(PublicKey::from_bytes([1u8; 32]), [2u8; IV_SIZE], vec![3u8; 32])
    }

    fn modern_envelope() -> Envelope {
        Envelope::modern(PublicKey::from_bytes([1u8; 32]), [2u8; NONCE_SIZE], vec![3u8; 27])
    }

    #[test]
    fn scheme_reported_from_shape() {
        assert_eq!(legacy_envelope().scheme(), Scheme::Nip04);
        assert_eq!(modern_envelope().scheme(), Scheme::Nip44);
    }

    #[test]
    fn json_round_trip_legacy() {
        let envelope = legacy_envelope();
        let json = envelope.to_json().expect("serialize");
        assert!(json.contains("\"iv\""));
        assert!(!json.contains("\"nonce\""));
        assert_eq!(Envelope::from_json(&json).expect("parse"), envelope);
    }

    #[test]
    fn json_round_trip_modern() {
        let envelope = modern_envelope();
        let json = envelope.to_json().expect("serialize");
        assert!(json.contains("\"nonce\""));
        assert!(!json.contains("\"iv\""));
        assert_eq!(Envelope::from_json(&json).expect("parse"), envelope);
    }

    #[test]
    fn both_iv_and_nonce_rejected() {
        let json = format!(
            r#"{{"ephemeral_pubkey":"{}","iv":"{}","nonce":"{}","ciphertext":"{}"}}"#,
            BASE64.encode([1u8; 32]),
            BASE64.encode([2u8; IV_SIZE]),
            BASE64.encode([2u8; NONCE_SIZE]),
            BASE64.encode([3u8; 16]),
        );
        let err = Envelope::from_json(&json).expect_err("ambiguous shape must be rejected");
        assert!(matches!(err, CodecError::InvalidEncoding { .. }));
    }

    #[test]
    fn missing_iv_and_nonce_rejected() {
        let json = format!(
            r#"{{"ephemeral_pubkey":"{}","ciphertext":"{}"}}"#,
            BASE64.encode([1u8; 32]),
            BASE64.encode([3u8; 16]),
        );
        let err = Envelope::from_json(&json).expect_err("headerless shape must be rejected");
        assert!(matches!(err, CodecError::InvalidEncoding { .. }));
    }

    #[test]
    fn wrong_field_lengths_rejected() {
        // 31-byte ephemeral key.
        let json = format!(
            r#"{{"ephemeral_pubkey":"{}","iv":"{}","ciphertext":"{}"}}"#,
            BASE64.encode([1u8; 31]),
            BASE64.encode([2u8; IV_SIZE]),
            BASE64.encode([3u8; 16]),
        );
        assert!(Envelope::from_json(&json).is_err());

        // 12-byte value in the iv field.
        let json = format!(
            r#"{{"ephemeral_pubkey":"{}","iv":"{}","ciphertext":"{}"}}"#,
            BASE64.encode([1u8; 32]),
            BASE64.encode([2u8; NONCE_SIZE]),
            BASE64.encode([3u8; 16]),
        );
        assert!(Envelope::from_json(&json).is_err());
    }

    #[test]
    fn invalid_base64_rejected() {
        let json = r#"{"ephemeral_pubkey":"!!!","iv":"AAAAAAAAAAAAAAAAAAAAAA==","ciphertext":"AA=="}"#;
        let err = Envelope::from_json(json).expect_err("bad base64 must be rejected");
        assert!(matches!(err, CodecError::InvalidEncoding { .. }));
    }

    #[test]
    fn invalid_json_rejected() {
        assert!(Envelope::from_json("not json").is_err());
        assert!(Envelope::from_json("{}").is_err());
    }

    #[test]
    fn scheme_names() {
        assert_eq!(Scheme::Nip04.to_string(), "nip04");
        assert_eq!(Scheme::Nip44.to_string(), "nip44");
    }
}
