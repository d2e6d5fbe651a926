//! Codec error types.

use thiserror::Error;

use crate::envelope::Scheme;

/// Errors from codec operations.
///
/// Every failure is typed and surfaced to the caller; none is downgraded
/// to a default plaintext, and no scheme fallback is ever attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Malformed or checksum-failed key identifier, or an envelope that
    /// does not parse.
    #[error("invalid encoding: {reason}")]
    InvalidEncoding {
        /// Description of the encoding failure.
        reason: String,
    },

    /// Key material rejected by the key agreement.
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Description of the key failure.
        reason: String,
    },

    /// Legacy-scheme unpad failure.
    ///
    /// Deliberately carries no detail: distinguishing failure modes
    /// would hand an attacker a padding oracle.
    #[error("malformed padding")]
    Padding,

    /// Modern-scheme authentication tag verification failure.
    #[error("authentication failed")]
    Authentication,

    /// Envelope shape inconsistent with the requested scheme.
    #[error("scheme mismatch: requested {requested}, envelope is {found}")]
    SchemeMismatch {
        /// Scheme the caller asked for.
        requested: Scheme,
        /// Scheme the envelope's shape belongs to.
        found: Scheme,
    },

    /// Plaintext beyond the AEAD length limit.
    #[error("plaintext too large for the aead cipher")]
    MessageTooLarge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CodecError::SchemeMismatch { requested: Scheme::Nip44, found: Scheme::Nip04 };
        assert_eq!(err.to_string(), "scheme mismatch: requested nip44, envelope is nip04");
    }

    #[test]
    fn padding_error_carries_no_detail() {
        assert_eq!(CodecError::Padding.to_string(), "malformed padding");
    }
}
