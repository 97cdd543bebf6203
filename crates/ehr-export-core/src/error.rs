use ehr_export_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// An input violates a size or framing limit.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("CBOR encode error: {0}")]
    CborEncode(String),

    #[error("CBOR decode error: {0}")]
    CborDecode(String),

    #[error("Unsupported record version: {0}")]
    UnsupportedVersion(i128),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    #[error("Unknown package format tag: {0:#04x}")]
    UnknownFormatTag(u8),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
