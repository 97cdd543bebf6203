//! AES-256-GCM seal/open with caller-supplied nonces.
//!
//! No associated data is used anywhere in the export protocol.
//! Framed form: [12 bytes: nonce][N bytes: ciphertext + tag]

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use p256::elliptic_curve::rand_core::CryptoRngCore;

use crate::error::CryptoError;
use crate::types::{AES_GCM_NONCE_LENGTH, AES_GCM_TAG_LENGTH, AES_KEY_LENGTH};

fn cipher_for(key: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    if key.len() != AES_KEY_LENGTH {
        return Err(CryptoError::InvalidKeyLength {
            expected: AES_KEY_LENGTH,
            got: key.len(),
        });
    }
    Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))
}

/// Reject nonces that are obviously not fresh: wrong length or a single
/// repeated byte (all-zero, all-0xff, ...). Reuse across calls cannot be
/// detected here.
fn check_nonce(nonce: &[u8]) -> Result<(), CryptoError> {
    if nonce.len() != AES_GCM_NONCE_LENGTH {
        return Err(CryptoError::InvalidNonce("nonce must be 12 bytes"));
    }
    if nonce.iter().all(|b| *b == nonce[0]) {
        return Err(CryptoError::InvalidNonce("nonce is a uniform byte pattern"));
    }
    Ok(())
}

/// Generate a fresh 96-bit nonce from `rng`.
pub fn generate_nonce(
    rng: &mut impl CryptoRngCore,
) -> Result<[u8; AES_GCM_NONCE_LENGTH], CryptoError> {
    let mut nonce = [0u8; AES_GCM_NONCE_LENGTH];
    rng.try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(nonce)
}

/// Encrypt `plaintext` under `key` and `nonce`.
///
/// Returns ciphertext with the 16-byte tag appended.
pub fn seal(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher_for(key)?;
    check_nonce(nonce)?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypt and authenticate `ciphertext` (ciphertext + tag).
///
/// Any modification of the ciphertext, tag or nonce, or a wrong key, yields
/// [`CryptoError::AuthenticationFailure`].
pub fn open(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher_for(key)?;
    if nonce.len() != AES_GCM_NONCE_LENGTH {
        return Err(CryptoError::InvalidNonce("nonce must be 12 bytes"));
    }
    if ciphertext.len() < AES_GCM_TAG_LENGTH {
        return Err(CryptoError::DataTooShort);
    }
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}

/// Seal with a fresh nonce and prepend it: [nonce:12][ciphertext+tag].
pub fn seal_framed(
    key: &[u8],
    plaintext: &[u8],
    rng: &mut impl CryptoRngCore,
) -> Result<Vec<u8>, CryptoError> {
    // Key length is checked before the nonce is drawn.
    cipher_for(key)?;
    let nonce = generate_nonce(rng)?;
    let ciphertext = seal(key, &nonce, plaintext)?;

    let mut result = Vec::with_capacity(nonce.len() + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Open a [nonce:12][ciphertext+tag] blob produced by [`seal_framed`].
pub fn open_framed(key: &[u8], framed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if framed.len() < AES_GCM_NONCE_LENGTH + AES_GCM_TAG_LENGTH {
        return Err(CryptoError::DataTooShort);
    }
    let (nonce, ciphertext) = framed.split_at(AES_GCM_NONCE_LENGTH);
    open(key, nonce, ciphertext)
}
