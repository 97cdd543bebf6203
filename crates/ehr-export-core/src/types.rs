use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ExportError;

/// Version written as the first element of every record.
pub const RECORD_FORMAT_VERSION: u64 = 1;

/// Leading byte of every export package.
pub const PACKAGE_FORMAT_TAG: u8 = 0x01;

/// Number of elements in a version-1 record.
pub const RECORD_ELEMENT_COUNT: usize = 6;

/// Smallest well-formed package: tag, X, Y, nonce and an empty ciphertext's tag.
pub const MIN_PACKAGE_LENGTH: usize = 1 + 32 + 32 + 12 + 16;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Export time as carried in the record: UTC, microsecond precision, no
/// offset suffix (`2025-03-14T09:26:53.589793`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTimestamp(String);

impl ExportTimestamp {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Parse the ASCII form found in a decoded record.
    pub fn parse(bytes: &[u8]) -> Result<Self, ExportError> {
        if !bytes.is_ascii() {
            return Err(ExportError::InvalidRecord(
                "timestamp is not ASCII".to_string(),
            ));
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|_| ExportError::InvalidRecord("timestamp is not ASCII".to_string()))?;
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| ExportError::InvalidRecord(format!("timestamp: {}", e)))?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn to_datetime(&self) -> Result<DateTime<Utc>, ExportError> {
        NaiveDateTime::parse_from_str(&self.0, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| ExportError::InvalidRecord(format!("timestamp: {}", e)))
    }
}

impl std::fmt::Display for ExportTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
