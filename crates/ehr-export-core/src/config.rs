//! Input limits for package construction.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Limits applied to builder inputs before any cryptographic work.
///
/// Protocol constants (curve, KDF label, record version, format tag) are not
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Longest accepted owner identifier, in bytes.
    pub max_owner_id_len: usize,
    /// Longest accepted archive, in bytes. `None` means unbounded.
    pub max_archive_len: Option<usize>,
    /// Longest accepted certificate (signer or recipient), in bytes.
    pub max_certificate_len: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            max_owner_id_len: 64,
            max_archive_len: None,
            max_certificate_len: 16 * 1024,
        }
    }
}

impl ExportOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check builder inputs against the configured limits.
    pub fn check_inputs(
        &self,
        archive: &[u8],
        owner_id: &[u8],
        signer_certificate: &[u8],
        recipient_certificate: &[u8],
    ) -> Result<(), ExportError> {
        if owner_id.is_empty() {
            return Err(ExportError::Encoding("owner identifier is empty".to_string()));
        }
        if owner_id.len() > self.max_owner_id_len {
            return Err(ExportError::Encoding(format!(
                "owner identifier is {} bytes, limit {}",
                owner_id.len(),
                self.max_owner_id_len
            )));
        }
        if let Some(max) = self.max_archive_len {
            if archive.len() > max {
                return Err(ExportError::Encoding(format!(
                    "archive is {} bytes, limit {}",
                    archive.len(),
                    max
                )));
            }
        }
        for (name, cert) in [
            ("signer certificate", signer_certificate),
            ("recipient certificate", recipient_certificate),
        ] {
            if cert.is_empty() {
                return Err(ExportError::Encoding(format!("{} is empty", name)));
            }
            if cert.len() > self.max_certificate_len {
                return Err(ExportError::Encoding(format!(
                    "{} is {} bytes, limit {}",
                    name,
                    cert.len(),
                    self.max_certificate_len
                )));
            }
        }
        Ok(())
    }
}
