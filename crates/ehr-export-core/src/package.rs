//! Outer package framing.
//!
//! Layout:
//! - [1 byte]   format tag (0x01)
//! - [32 bytes] ephemeral public X
//! - [32 bytes] ephemeral public Y
//! - [12 bytes] outer nonce
//! - [N bytes]  outer ciphertext + 16-byte tag

use ehr_export_crypto::{SealedEnvelope, AES_GCM_NONCE_LENGTH, COORDINATE_LENGTH};

use crate::error::ExportError;
use crate::types::{MIN_PACKAGE_LENGTH, PACKAGE_FORMAT_TAG};

/// Encode a sealed record into the package byte layout.
pub fn encode_package(sealed: &SealedEnvelope) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        1 + 2 * COORDINATE_LENGTH + AES_GCM_NONCE_LENGTH + sealed.ciphertext.len(),
    );
    out.push(PACKAGE_FORMAT_TAG);
    out.extend_from_slice(&sealed.ephemeral_x);
    out.extend_from_slice(&sealed.ephemeral_y);
    out.extend_from_slice(&sealed.nonce);
    out.extend_from_slice(&sealed.ciphertext);
    out
}

/// Split a package back into its sealed parts. No cryptography happens here.
pub fn decode_package(data: &[u8]) -> Result<SealedEnvelope, ExportError> {
    if data.len() < MIN_PACKAGE_LENGTH {
        return Err(ExportError::InvalidPackage(format!(
            "package too short: {} bytes, need at least {}",
            data.len(),
            MIN_PACKAGE_LENGTH
        )));
    }
    if data[0] != PACKAGE_FORMAT_TAG {
        return Err(ExportError::UnknownFormatTag(data[0]));
    }

    let (x, rest) = data[1..].split_at(COORDINATE_LENGTH);
    let (y, rest) = rest.split_at(COORDINATE_LENGTH);
    let (nonce, ciphertext) = rest.split_at(AES_GCM_NONCE_LENGTH);

    let mut sealed = SealedEnvelope {
        ephemeral_x: [0u8; COORDINATE_LENGTH],
        ephemeral_y: [0u8; COORDINATE_LENGTH],
        nonce: [0u8; AES_GCM_NONCE_LENGTH],
        ciphertext: ciphertext.to_vec(),
    };
    sealed.ephemeral_x.copy_from_slice(x);
    sealed.ephemeral_y.copy_from_slice(y);
    sealed.nonce.copy_from_slice(nonce);
    Ok(sealed)
}
