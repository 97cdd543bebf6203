//! Export package construction.
//!
//! Pipeline:
//! 1. validate inputs and parse the recipient certificate (no randomness yet)
//! 2. inner layer: AES-256-GCM under the null key, `nonce || ciphertext`
//! 3. sign `innerCiphertext || timestamp || ownerId`
//! 4. CBOR record `[1, innerCiphertext, timestamp, ownerId, signerCert, signature]`
//! 5. outer layer: brainpoolP256r1 ECDH + HKDF + AES-256-GCM to the recipient
//! 6. frame as `0x01 || X || Y || nonce || ciphertext`

use ehr_export_crypto::{
    certificate_der_from_base64, hybrid_seal, seal_framed, CertificateKey, CryptoRngCore, CurveId,
    OsRng, RecordSigner, NULL_KEY,
};
use tracing::{debug, info, warn};

use crate::config::ExportOptions;
use crate::error::ExportError;
use crate::package::encode_package;
use crate::record::{build_signed_message, encode_record, ExportRecord};
use crate::types::{ExportTimestamp, RECORD_FORMAT_VERSION};

/// Caller-supplied material for one export package.
#[derive(Debug, Clone, Copy)]
pub struct ExportInputs<'a> {
    /// Archive bytes, opaque to this crate.
    pub archive: &'a [u8],
    /// Owner identifier, bound into the signature.
    pub owner_id: &'a [u8],
    /// Signer certificate DER, embedded verbatim.
    pub signer_certificate: &'a [u8],
    /// Recipient certificate DER; its key must be on brainpoolP256r1.
    pub recipient_certificate: &'a [u8],
}

/// Build an export package with default limits, the current time and the OS RNG.
pub fn build_export_package<S: RecordSigner + ?Sized>(
    inputs: &ExportInputs<'_>,
    signer: &S,
) -> Result<Vec<u8>, ExportError> {
    build_export_package_with(
        inputs,
        signer,
        &ExportOptions::default(),
        &ExportTimestamp::now(),
        &mut OsRng,
    )
}

/// Build an export package.
///
/// # Arguments
/// * `inputs` - Archive, owner identifier and certificates
/// * `signer` - Key that signs the record metadata
/// * `options` - Input limits
/// * `timestamp` - Export time written into the record
/// * `rng` - Source of the inner nonce, the ephemeral key and the outer nonce
///
/// # Returns
/// The complete package bytes. On error nothing is returned, and errors from
/// input validation or recipient certificate checks leave `rng` untouched.
pub fn build_export_package_with<S: RecordSigner + ?Sized>(
    inputs: &ExportInputs<'_>,
    signer: &S,
    options: &ExportOptions,
    timestamp: &ExportTimestamp,
    rng: &mut impl CryptoRngCore,
) -> Result<Vec<u8>, ExportError> {
    options.check_inputs(
        inputs.archive,
        inputs.owner_id,
        inputs.signer_certificate,
        inputs.recipient_certificate,
    )?;

    let recipient = CertificateKey::from_certificate_der(inputs.recipient_certificate)?;
    if let Err(e) = recipient.require_curve(&CurveId::BrainpoolP256r1) {
        warn!(curve = %recipient.curve, "Recipient certificate rejected");
        return Err(e.into());
    }

    let inner_ciphertext = seal_framed(&NULL_KEY, inputs.archive, rng)?;
    debug!(
        archive_len = inputs.archive.len(),
        inner_len = inner_ciphertext.len(),
        "Inner layer sealed"
    );

    let message = build_signed_message(&inner_ciphertext, timestamp.as_bytes(), inputs.owner_id);
    let signature = signer.sign_message(&message)?;

    let record = ExportRecord {
        version: RECORD_FORMAT_VERSION,
        inner_ciphertext,
        timestamp: timestamp.as_bytes().to_vec(),
        owner_id: inputs.owner_id.to_vec(),
        signer_certificate: inputs.signer_certificate.to_vec(),
        signature,
    };
    let encoded = encode_record(&record)?;
    debug!(
        version = record.version,
        record_len = encoded.len(),
        "Record encoded"
    );

    let sealed = hybrid_seal(&recipient.public_key, &recipient.curve, &encoded, rng)?;
    let package = encode_package(&sealed);
    info!(package_len = package.len(), timestamp = %timestamp, "Export package built");
    Ok(package)
}

/// Like [`build_export_package`], taking the recipient certificate as base64.
pub fn build_export_package_b64<S: RecordSigner + ?Sized>(
    archive: &[u8],
    owner_id: &[u8],
    signer: &S,
    signer_certificate: &[u8],
    recipient_certificate_b64: &str,
) -> Result<Vec<u8>, ExportError> {
    let recipient_certificate = certificate_der_from_base64(recipient_certificate_b64)?;
    build_export_package(
        &ExportInputs {
            archive,
            owner_id,
            signer_certificate,
            recipient_certificate: &recipient_certificate,
        },
        signer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64, Encoding};
    use ehr_export_crypto::{signing_key_from_pkcs8_pem, CryptoError, SigningKey};

    const RECIPIENT_BP256_CERT: &[u8] = include_bytes!("../../../testdata/recipient_bp256_cert.der");
    const RECIPIENT_P256_CERT: &[u8] = include_bytes!("../../../testdata/recipient_p256_cert.der");
    const SIGNER_CERT: &[u8] = include_bytes!("../../../testdata/signer_p256_cert.der");
    const SIGNER_KEY_PEM: &str = include_str!("../../../testdata/signer_p256_key.pem");

    fn signer() -> SigningKey {
        signing_key_from_pkcs8_pem(SIGNER_KEY_PEM).unwrap()
    }

    fn inputs<'a>(recipient: &'a [u8]) -> ExportInputs<'a> {
        ExportInputs {
            archive: &[0u8; 16],
            owner_id: b"A123456789",
            signer_certificate: SIGNER_CERT,
            recipient_certificate: recipient,
        }
    }

    #[test]
    fn package_has_expected_size() {
        let package = build_export_package(&inputs(RECIPIENT_BP256_CERT), &signer()).unwrap();
        assert_eq!(package[0], 0x01);
        assert!(package.len() > 1 + 32 + 32 + 12 + 16 + SIGNER_CERT.len());
    }

    #[test]
    fn wrong_curve_is_rejected() {
        let err = build_export_package(&inputs(RECIPIENT_P256_CERT), &signer()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Crypto(CryptoError::UnsupportedCurve(CurveId::NistP256))
        ));
    }

    #[test]
    fn garbage_recipient_certificate_is_rejected() {
        let err = build_export_package(&inputs(&[0x30, 0x01, 0x00]), &signer()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Crypto(CryptoError::CertificateParse(_))
        ));
    }

    #[test]
    fn limits_are_enforced() {
        let mut too_long = inputs(RECIPIENT_BP256_CERT);
        let owner = [b'A'; 100];
        too_long.owner_id = &owner;
        assert!(matches!(
            build_export_package(&too_long, &signer()),
            Err(ExportError::Encoding(_))
        ));
    }

    #[test]
    fn base64_recipient_certificate() {
        let encoded = Base64::encode_string(RECIPIENT_BP256_CERT);
        let package = build_export_package_b64(
            &[0u8; 16],
            b"A123456789",
            &signer(),
            SIGNER_CERT,
            &encoded,
        )
        .unwrap();
        assert_eq!(package[0], 0x01);

        assert!(matches!(
            build_export_package_b64(&[], b"A1", &signer(), SIGNER_CERT, "%%%"),
            Err(ExportError::Crypto(CryptoError::Base64Decode(_)))
        ));
    }

    struct UnavailableKey;

    impl RecordSigner for UnavailableKey {
        fn sign_message(&self, _message: &[u8]) -> Result<Vec<u8>, CryptoError> {
            Err(CryptoError::InvalidKeyMaterial("key handle unavailable".to_string()))
        }
    }

    #[test]
    fn signer_failure_is_invalid_key_material() {
        let err = build_export_package(&inputs(RECIPIENT_BP256_CERT), &UnavailableKey).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Crypto(CryptoError::InvalidKeyMaterial(_))
        ));
    }
}
