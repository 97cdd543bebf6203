use x509_cert::der::oid::ObjectIdentifier;

/// AES key length in bytes (256 bits).
pub const AES_KEY_LENGTH: usize = 32;

/// AES-GCM nonce length in bytes (96 bits).
pub const AES_GCM_NONCE_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// Inner-layer key: 32 zero bytes.
///
/// Records no longer carry a per-record context key, so the inner layer is
/// sealed under this public constant. It keeps the package layout compatible
/// with the earlier generation and provides no confidentiality.
pub const NULL_KEY: [u8; AES_KEY_LENGTH] = [0u8; AES_KEY_LENGTH];

/// HKDF info label for the outer key: `ePA-Export-Paket`.
pub const EXPORT_KDF_INFO: &[u8] = b"ePA-Export-Paket";

/// Width of one affine coordinate on brainpoolP256r1, in bytes.
pub const COORDINATE_LENGTH: usize = 32;

/// SEC1 uncompressed point: 0x04 || X || Y.
pub const UNCOMPRESSED_POINT_LENGTH: usize = 1 + 2 * COORDINATE_LENGTH;

/// id-ecPublicKey (RFC 5480).
pub const ID_EC_PUBLIC_KEY: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// brainpoolP256r1 (RFC 5639).
pub const BRAINPOOL_P256R1_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.7");

/// secp256r1 / NIST P-256 (RFC 5480).
pub const SECP256R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// Named curve of an EC public key found in a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurveId {
    /// brainpoolP256r1, the only curve accepted for export recipients.
    BrainpoolP256r1,
    /// NIST P-256, accepted for signer certificates.
    NistP256,
    /// Any other named curve.
    Other(ObjectIdentifier),
}

impl CurveId {
    /// Map a namedCurve OID to a curve identifier.
    pub fn from_oid(oid: ObjectIdentifier) -> Self {
        if oid == BRAINPOOL_P256R1_OID {
            Self::BrainpoolP256r1
        } else if oid == SECP256R1_OID {
            Self::NistP256
        } else {
            Self::Other(oid)
        }
    }
}

impl std::fmt::Display for CurveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BrainpoolP256r1 => write!(f, "brainpoolP256r1"),
            Self::NistP256 => write!(f, "secp256r1"),
            Self::Other(oid) => write!(f, "{}", oid),
        }
    }
}
