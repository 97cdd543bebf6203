//! Recipient side: unwrap a package, check the signature, recover the archive.

use ehr_export_crypto::{
    hybrid_open, open_framed, verify_with_certificate, RecipientSecretKey, NULL_KEY,
};
use tracing::debug;

use crate::error::ExportError;
use crate::package::decode_package;
use crate::record::{decode_record, ExportRecord};
use crate::types::ExportTimestamp;

/// Remove the outer layer of a package and decode the record inside.
///
/// The signature is not checked here; call [`ExportRecord::verify_signature`].
pub fn open_export_package(
    package: &[u8],
    recipient: &RecipientSecretKey,
) -> Result<ExportRecord, ExportError> {
    let sealed = decode_package(package)?;
    let encoded = hybrid_open(recipient, &sealed)?;
    let record = decode_record(&encoded)?;
    debug!(
        version = record.version,
        record_len = encoded.len(),
        "Export package opened"
    );
    Ok(record)
}

impl ExportRecord {
    /// Verify the signature against the embedded signer certificate.
    ///
    /// `Ok(false)` means the signature does not cover these fields. An
    /// unparseable certificate or malformed signature is an error.
    pub fn verify_signature(&self) -> Result<bool, ExportError> {
        Ok(verify_with_certificate(
            &self.signer_certificate,
            &self.signed_message(),
            &self.signature,
        )?)
    }

    /// Open the null-key inner layer.
    pub fn decrypt_archive(&self) -> Result<Vec<u8>, ExportError> {
        Ok(open_framed(&NULL_KEY, &self.inner_ciphertext)?)
    }

    pub fn export_timestamp(&self) -> Result<ExportTimestamp, ExportError> {
        ExportTimestamp::parse(&self.timestamp)
    }
}
