//! HKDF-SHA256 key derivation.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::CryptoError;
use crate::types::{AES_KEY_LENGTH, EXPORT_KDF_INFO};

/// Derive a 256-bit key using HKDF-SHA256.
///
/// # Arguments
/// * `ikm` - Input keying material
/// * `salt` - Optional salt; `None` means a block of zeros (RFC 5869 §2.2)
/// * `info` - Context and application-specific info
///
/// # Returns
/// 32-byte derived key
pub fn hkdf_derive(
    ikm: &[u8],
    salt: Option<&[u8]>,
    info: &[u8],
) -> Result<[u8; AES_KEY_LENGTH], CryptoError> {
    let hk = Hkdf::<Sha256>::new(salt, ikm);
    let mut okm = [0u8; AES_KEY_LENGTH];
    hk.expand(info, &mut okm)
        .map_err(|e| CryptoError::KeyDerivation(format!("HKDF expand failed: {}", e)))?;
    Ok(okm)
}

/// Derive the outer AES key from an ECDH shared secret.
///
/// No salt, info = `ePA-Export-Paket`.
pub fn derive_export_key(shared_secret: &[u8]) -> Result<[u8; AES_KEY_LENGTH], CryptoError> {
    hkdf_derive(shared_secret, None, EXPORT_KDF_INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let ikm = [0x42u8; 32];
        let a = hkdf_derive(&ikm, Some(b"test-salt"), b"test-info").unwrap();
        let b = hkdf_derive(&ikm, Some(b"test-salt"), b"test-info").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_info_different_keys() {
        let ikm = [0x42u8; 32];
        let a = hkdf_derive(&ikm, None, b"info-a").unwrap();
        let b = hkdf_derive(&ikm, None, b"info-b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn missing_salt_equals_zero_salt() {
        let ikm = [0x42u8; 32];
        let a = hkdf_derive(&ikm, None, b"info").unwrap();
        let b = hkdf_derive(&ikm, Some(&[0u8; 32]), b"info").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rfc5869_test_vector_3() {
        // RFC 5869 Test Case 3 (SHA-256, no salt, no info), first 32 bytes of OKM
        let ikm = hex::decode("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b").unwrap();
        let result = hkdf_derive(&ikm, None, b"").unwrap();
        assert_eq!(
            hex::encode(result),
            "8da4e775a563c18f715f802a063c5a31b8a11f5c5ee1879ec3454e5f3c738d2d"
        );
    }

    #[test]
    fn export_key_vector() {
        let result = derive_export_key(&[0x42u8; 32]).unwrap();
        assert_eq!(
            hex::encode(result),
            "da1964cf44f35e03586d020031139d4fd5aec55e3573b41804ed579410f41e9d"
        );
    }

    #[test]
    fn export_key_is_domain_separated() {
        let ikm = [0x42u8; 32];
        let export = derive_export_key(&ikm).unwrap();
        let plain = hkdf_derive(&ikm, None, b"").unwrap();
        assert_ne!(export, plain);
    }
}
