use thiserror::Error;

use crate::types::CurveId;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid nonce: {0}")]
    InvalidNonce(&'static str),

    #[error("Encrypted data too short")]
    DataTooShort,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// AEAD integrity check failed. No plaintext is released.
    #[error("Authentication failed")]
    AuthenticationFailure,

    #[error("Unsupported curve: expected brainpoolP256r1, got {0}")]
    UnsupportedCurve(CurveId),

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Certificate parse error: {0}")]
    CertificateParse(String),

    #[error("Unsupported public key algorithm: {0}")]
    UnsupportedKeyAlgorithm(String),

    #[error("Invalid EC point: {0}")]
    InvalidPoint(String),

    /// The EC backend failed while computing a point or shared secret.
    #[error("Key agreement failed: {0}")]
    KeyAgreement(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Base64 decode error: {0}")]
    Base64Decode(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}
