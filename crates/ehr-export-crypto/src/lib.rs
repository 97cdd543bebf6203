//! Cryptographic primitives for health-record export packages.

pub mod aead;
pub mod certificate;
pub mod ecies;
pub mod error;
pub mod hkdf;
pub mod signing;
pub mod types;

pub use aead::{generate_nonce, open, open_framed, seal, seal_framed};
pub use certificate::{certificate_der_from_base64, CertificateKey};
pub use ecies::{
    derive_recipient_key, hybrid_open, hybrid_seal, public_key_coordinates,
    public_key_from_coordinates, recipient_key_from_bytes, recipient_public_key,
    BrainpoolPublicKey, BrainpoolSecretKey, RecipientPublicKey, RecipientSecretKey,
    SealedEnvelope,
};
pub use error::CryptoError;
pub use hkdf::{derive_export_key, hkdf_derive};
pub use signing::{
    signing_key_from_bytes, signing_key_from_pkcs8_der, signing_key_from_pkcs8_pem, verify,
    verify_with_certificate, RecordSigner,
};
pub use types::{
    CurveId, AES_GCM_NONCE_LENGTH, AES_GCM_TAG_LENGTH, AES_KEY_LENGTH, COORDINATE_LENGTH,
    EXPORT_KDF_INFO, NULL_KEY,
};

pub use p256::elliptic_curve::rand_core::{self, CryptoRngCore, OsRng};
pub use p256::ecdsa::SigningKey;
