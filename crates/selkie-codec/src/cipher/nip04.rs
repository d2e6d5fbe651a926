//! Legacy envelope cipher: AES-256-CBC with PKCS#7 padding.
//!
//! The padding check on decrypt runs in constant time over the whole
//! final block, so the timing of a rejection does not depend on where
//! the padding went wrong.

use aes::{
    Aes256,
    cipher::{
        BlockDecryptMut, BlockEncryptMut, KeyIvInit,
        block_padding::{NoPadding, Pkcs7},
    },
};
use subtle::{ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};
use zeroize::Zeroize;

use crate::{error::CodecError, kdf::DerivedKey};

/// CBC initialization vector length in bytes.
pub const IV_SIZE: usize = 16;

/// AES block length in bytes.
const BLOCK_SIZE: u8 = 16;

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// Encrypts `plaintext` under `key` with the given IV.
///
/// Deterministic given (key, iv, plaintext). The caller must draw a
/// fresh random IV for every call; reuse under the same key leaks
/// relationships between plaintexts.
pub fn encrypt(key: &DerivedKey, iv: &[u8; IV_SIZE], plaintext: &[u8]) -> Vec<u8> {
    Encryptor::new(key.as_bytes().into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypts `ciphertext` and strips the padding.
///
/// Every malformed input maps to the detail-free
/// [`CodecError::Padding`], and the intermediate plaintext buffer is
/// zeroized before the error surfaces.
pub fn decrypt(
    key: &DerivedKey,
    iv: &[u8; IV_SIZE],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CodecError> {
    if ciphertext.is_empty() || ciphertext.len() % usize::from(BLOCK_SIZE) != 0 {
        return Err(CodecError::Padding);
    }

    let mut padded = Decryptor::new(key.as_bytes().into(), iv.into())
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| CodecError::Padding)?;

    match unpadded_len(&padded) {
        Some(len) => {
            let plaintext = padded[..len].to_vec();
            padded.zeroize();
            Ok(plaintext)
        },
        None => {
            padded.zeroize();
            Err(CodecError::Padding)
        },
    }
}

/// Constant-time PKCS#7 check over the final block.
///
/// Scans all 16 trailing bytes regardless of the claimed pad length.
/// The caller guarantees `padded` is a non-empty multiple of the block
/// length.
fn unpadded_len(padded: &[u8]) -> Option<usize> {
    let pad = padded[padded.len() - 1];
    let mut valid = pad.ct_gt(&0) & !pad.ct_gt(&BLOCK_SIZE);

    for offset in 0..BLOCK_SIZE {
        let byte = padded[padded.len() - 1 - usize::from(offset)];
        let in_pad = offset.ct_lt(&pad);
        valid &= !in_pad | byte.ct_eq(&pad);
    }

    if bool::from(valid) { Some(padded.len() - usize::from(pad)) } else { None }
}

#[cfg(test)]
mod tests {
    use crate::{agreement, kdf, keys::SecretKey};

    use super::*;

    fn test_key() -> DerivedKey {
        let secret = SecretKey::from_bytes([3u8; 32]);
        let public = agreement::derive_public_key(&SecretKey::from_bytes([4u8; 32]));
        kdf::derive_legacy(&agreement::agree(&secret, &public).expect("agree"))
    }

    #[test]
    fn round_trip_across_block_boundaries() {
        let key = test_key();
        let iv = [5u8; IV_SIZE];
        for len in [0usize, 1, 15, 16, 17, 31, 32, 100] {
            let plaintext = vec![0x5A; len];
            let ciphertext = encrypt(&key, &iv, &plaintext);
            assert_eq!(ciphertext.len(), (len / 16 + 1) * 16, "padded length for {len}");
            assert_eq!(decrypt(&key, &iv, &ciphertext).expect("decrypt"), plaintext);
        }
    }

    #[test]
    fn eleven_bytes_fill_one_block() {
        let ciphertext = encrypt(&test_key(), &[0u8; IV_SIZE], b"hello nostr");
        assert_eq!(ciphertext.len(), 16);
    }

    #[test]
    fn deterministic_given_key_iv_plaintext() {
        let key = test_key();
        let iv = [9u8; IV_SIZE];
        assert_eq!(encrypt(&key, &iv, b"same input"), encrypt(&key, &iv, b"same input"));
    }

    #[test]
    fn truncated_ciphertext_is_a_padding_error() {
        let key = test_key();
        let iv = [1u8; IV_SIZE];
        // Two zero blocks; keeping only the first decrypts to sixteen
        // zero bytes, whose trailing 0x00 is never a valid pad.
        let ciphertext = encrypt(&key, &iv, &[0u8; 16]);
        assert_eq!(ciphertext.len(), 32);
        assert_eq!(decrypt(&key, &iv, &ciphertext[..16]), Err(CodecError::Padding));
    }

    #[test]
    fn non_block_multiple_rejected() {
        let key = test_key();
        let iv = [1u8; IV_SIZE];
        assert_eq!(decrypt(&key, &iv, &[0u8; 15]), Err(CodecError::Padding));
        assert_eq!(decrypt(&key, &iv, &[0u8; 17]), Err(CodecError::Padding));
        assert_eq!(decrypt(&key, &iv, &[]), Err(CodecError::Padding));
    }

    #[test]
    fn unpad_accepts_well_formed_padding() {
        let mut block = vec![0xAAu8; 13];
        block.extend_from_slice(&[3, 3, 3]);
        assert_eq!(unpadded_len(&block), Some(13));

        let full_pad = vec![16u8; 16];
        assert_eq!(unpadded_len(&full_pad), Some(0));
    }

    #[test]
    fn unpad_rejects_malformed_padding() {
        // Zero pad length.
        let mut block = vec![0xAAu8; 15];
        block.push(0);
        assert_eq!(unpadded_len(&block), None);

        // Pad length beyond the block.
        let mut block = vec![0xAAu8; 15];
        block.push(17);
        assert_eq!(unpadded_len(&block), None);

        // Claimed length not backed by the pad bytes.
        let mut block = vec![0xAAu8; 14];
        block.extend_from_slice(&[9, 2]);
        assert_eq!(unpadded_len(&block), None);
    }
}
