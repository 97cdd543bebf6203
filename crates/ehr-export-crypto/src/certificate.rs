//! EC public key extraction from DER-encoded X.509 certificates.
//!
//! Only the SubjectPublicKeyInfo is read. Chain building, validity periods and
//! trust anchors are the caller's responsibility.

use base64ct::{Base64, Encoding};
use x509_cert::der::oid::ObjectIdentifier;
use x509_cert::der::Decode;
use x509_cert::Certificate;

use crate::error::CryptoError;
use crate::types::{CurveId, ID_EC_PUBLIC_KEY};

/// Decode a base64 DER certificate (the form carried in SOAP requests).
///
/// Surrounding whitespace is ignored.
pub fn certificate_der_from_base64(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    Base64::decode_vec(encoded.trim()).map_err(|e| CryptoError::Base64Decode(e.to_string()))
}

/// Public key and named curve taken from a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateKey {
    /// Named curve from the algorithm parameters.
    pub curve: CurveId,
    /// SEC1-encoded public point, exactly as carried in the certificate.
    pub public_key: Vec<u8>,
}

impl CertificateKey {
    /// Parse a DER certificate and extract its EC public key.
    pub fn from_certificate_der(der: &[u8]) -> Result<Self, CryptoError> {
        let cert = Certificate::from_der(der)
            .map_err(|e| CryptoError::CertificateParse(e.to_string()))?;
        let spki = &cert.tbs_certificate.subject_public_key_info;

        if spki.algorithm.oid != ID_EC_PUBLIC_KEY {
            return Err(CryptoError::UnsupportedKeyAlgorithm(
                spki.algorithm.oid.to_string(),
            ));
        }

        let params = spki.algorithm.parameters.as_ref().ok_or_else(|| {
            CryptoError::CertificateParse("missing EC domain parameters".to_string())
        })?;
        let curve_oid = params
            .decode_as::<ObjectIdentifier>()
            .map_err(|e| CryptoError::CertificateParse(format!("namedCurve: {}", e)))?;

        let public_key = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| {
                CryptoError::CertificateParse("public key bit string is not octet aligned".into())
            })?
            .to_vec();

        Ok(Self {
            curve: CurveId::from_oid(curve_oid),
            public_key,
        })
    }

    /// Parse a base64-encoded DER certificate.
    pub fn from_certificate_base64(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_certificate_der(&certificate_der_from_base64(encoded)?)
    }

    /// Fail with [`CryptoError::UnsupportedCurve`] unless the key is on `expected`.
    pub fn require_curve(&self, expected: &CurveId) -> Result<(), CryptoError> {
        if &self.curve != expected {
            return Err(CryptoError::UnsupportedCurve(self.curve.clone()));
        }
        Ok(())
    }
}
