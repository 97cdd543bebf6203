//! Hybrid encryption to a brainpoolP256r1 recipient key.
//!
//! Seal:
//! 1. ephemeral key pair on brainpoolP256r1
//! 2. Z = ECDH(ephemeral secret, recipient public key)
//! 3. K = HKDF-SHA256(Z, salt = none, info = "ePA-Export-Paket")
//! 4. C = AES-256-GCM(K, fresh nonce, plaintext)
//!
//! The ephemeral public point travels as two fixed-width big-endian
//! coordinates so the recipient can rebuild Z with its static key.
//!
//! Curve arithmetic runs on OpenSSL's brainpoolP256r1 group. Scalars are
//! drawn from the caller's RNG, never from OpenSSL's.

use std::cmp::Ordering;
use std::fmt;

use openssl::bn::{BigNum, BigNumContext, BigNumContextRef};
use openssl::ec::{EcGroup, EcGroupRef, EcPoint, EcPointRef, PointConversionForm};
use openssl::error::ErrorStack;
use openssl::nid::Nid;
use p256::elliptic_curve::rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::aead;
use crate::error::CryptoError;
use crate::hkdf::derive_export_key;
use crate::types::{
    CurveId, AES_GCM_NONCE_LENGTH, AES_KEY_LENGTH, COORDINATE_LENGTH, UNCOMPRESSED_POINT_LENGTH,
};

/// Upper bound on scalar draws before giving up on the RNG.
const MAX_SCALAR_ATTEMPTS: usize = 64;

fn backend(e: ErrorStack) -> CryptoError {
    CryptoError::KeyAgreement(e.to_string())
}

fn brainpool_group() -> Result<(EcGroup, BigNumContext), CryptoError> {
    let group = EcGroup::from_curve_name(Nid::BRAINPOOL_P256R1).map_err(backend)?;
    let ctx = BigNumContext::new_secure().map_err(backend)?;
    Ok((group, ctx))
}

/// Parse and validate an encoded point. Infinity and off-curve points fail.
fn decode_point(
    group: &EcGroupRef,
    encoded: &[u8],
    ctx: &mut BigNumContextRef,
) -> Result<EcPoint, CryptoError> {
    let point = EcPoint::from_bytes(group, encoded, ctx)
        .map_err(|_| CryptoError::InvalidPoint("not a brainpoolP256r1 point".to_string()))?;
    if point.is_infinity(group) || !point.is_on_curve(group, ctx).map_err(backend)? {
        return Err(CryptoError::InvalidPoint(
            "not a brainpoolP256r1 point".to_string(),
        ));
    }
    Ok(point)
}

fn encode_point(
    group: &EcGroupRef,
    point: &EcPointRef,
    ctx: &mut BigNumContextRef,
) -> Result<BrainpoolPublicKey, CryptoError> {
    if point.is_infinity(group) {
        return Err(CryptoError::InvalidPoint("point at infinity".to_string()));
    }
    let bytes = point
        .to_bytes(group, PointConversionForm::UNCOMPRESSED, ctx)
        .map_err(backend)?;
    if bytes.len() != UNCOMPRESSED_POINT_LENGTH {
        return Err(CryptoError::InvalidPoint(format!(
            "expected {} byte uncompressed point, got {}",
            UNCOMPRESSED_POINT_LENGTH,
            bytes.len()
        )));
    }
    let mut x = [0u8; COORDINATE_LENGTH];
    let mut y = [0u8; COORDINATE_LENGTH];
    x.copy_from_slice(&bytes[1..1 + COORDINATE_LENGTH]);
    y.copy_from_slice(&bytes[1 + COORDINATE_LENGTH..]);
    Ok(BrainpoolPublicKey { x, y })
}

/// A validated brainpoolP256r1 public point, held as affine coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrainpoolPublicKey {
    x: [u8; COORDINATE_LENGTH],
    y: [u8; COORDINATE_LENGTH],
}

impl BrainpoolPublicKey {
    /// Parse a SEC1 point, compressed or uncompressed.
    pub fn from_sec1_bytes(sec1: &[u8]) -> Result<Self, CryptoError> {
        let (group, mut ctx) = brainpool_group()?;
        let point = decode_point(&group, sec1, &mut ctx)?;
        encode_point(&group, &point, &mut ctx)
    }

    /// Uncompressed SEC1 encoding: `0x04 || X || Y`.
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(UNCOMPRESSED_POINT_LENGTH);
        out.push(0x04);
        out.extend_from_slice(&self.x);
        out.extend_from_slice(&self.y);
        out
    }

    pub fn x(&self) -> &[u8; COORDINATE_LENGTH] {
        &self.x
    }

    pub fn y(&self) -> &[u8; COORDINATE_LENGTH] {
        &self.y
    }
}

/// A brainpoolP256r1 secret scalar in `1..n`.
#[derive(Clone)]
pub struct BrainpoolSecretKey {
    scalar: Zeroizing<[u8; COORDINATE_LENGTH]>,
}

impl fmt::Debug for BrainpoolSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrainpoolSecretKey").finish_non_exhaustive()
    }
}

impl BrainpoolSecretKey {
    /// Load a big-endian 32-byte scalar. Zero and values `>= n` are rejected.
    pub fn from_bytes(scalar: &[u8]) -> Result<Self, CryptoError> {
        let scalar: [u8; COORDINATE_LENGTH] = scalar.try_into().map_err(|_| {
            CryptoError::InvalidKeyMaterial(format!(
                "brainpoolP256r1 scalar must be {} bytes, got {}",
                COORDINATE_LENGTH,
                scalar.len()
            ))
        })?;
        let (group, mut ctx) = brainpool_group()?;
        if !scalar_in_range(&group, &scalar, &mut ctx)? {
            return Err(CryptoError::InvalidKeyMaterial(
                "brainpoolP256r1 scalar out of range".to_string(),
            ));
        }
        Ok(Self {
            scalar: Zeroizing::new(scalar),
        })
    }

    /// Draw a uniform scalar from `rng` by rejection sampling.
    pub fn random(rng: &mut impl CryptoRngCore) -> Result<Self, CryptoError> {
        let (group, mut ctx) = brainpool_group()?;
        let mut candidate = Zeroizing::new([0u8; COORDINATE_LENGTH]);
        for _ in 0..MAX_SCALAR_ATTEMPTS {
            rng.try_fill_bytes(candidate.as_mut_slice())
                .map_err(|e| CryptoError::RngFailed(e.to_string()))?;
            if scalar_in_range(&group, &candidate, &mut ctx)? {
                return Ok(Self { scalar: candidate });
            }
        }
        Err(CryptoError::RngFailed(
            "no brainpoolP256r1 scalar in range".to_string(),
        ))
    }

    /// `d·G`.
    pub fn public_key(&self) -> Result<BrainpoolPublicKey, CryptoError> {
        let (group, mut ctx) = brainpool_group()?;
        let mut d = self.to_bignum()?;
        let mut point = EcPoint::new(&group).map_err(backend)?;
        let result = point.mul_generator2(&group, &d, &mut ctx).map_err(backend);
        d.clear();
        result?;
        encode_point(&group, &point, &mut ctx)
    }

    /// X coordinate of `d·peer`, zero-padded to 32 bytes.
    pub fn diffie_hellman(
        &self,
        peer: &BrainpoolPublicKey,
    ) -> Result<Zeroizing<[u8; COORDINATE_LENGTH]>, CryptoError> {
        let (group, mut ctx) = brainpool_group()?;
        let peer = decode_point(&group, &peer.to_sec1_bytes(), &mut ctx)?;
        let mut d = self.to_bignum()?;
        let mut shared = EcPoint::new(&group).map_err(backend)?;
        let result = shared.mul2(&group, &peer, &d, &mut ctx).map_err(backend);
        d.clear();
        result?;
        if shared.is_infinity(&group) {
            return Err(CryptoError::InvalidPoint("shared point at infinity".to_string()));
        }

        let mut x = BigNum::new_secure().map_err(backend)?;
        let mut y = BigNum::new_secure().map_err(backend)?;
        shared
            .affine_coordinates_gfp(&group, &mut x, &mut y, &mut ctx)
            .map_err(backend)?;
        let padded = Zeroizing::new(x.to_vec_padded(COORDINATE_LENGTH as i32).map_err(backend)?);
        x.clear();
        y.clear();

        let mut out = Zeroizing::new([0u8; COORDINATE_LENGTH]);
        out.copy_from_slice(&padded);
        Ok(out)
    }

    fn to_bignum(&self) -> Result<BigNum, CryptoError> {
        let mut d = BigNum::new_secure().map_err(backend)?;
        d.copy_from_slice(self.scalar.as_slice()).map_err(backend)?;
        Ok(d)
    }
}

fn scalar_in_range(
    group: &EcGroupRef,
    scalar: &[u8; COORDINATE_LENGTH],
    ctx: &mut BigNumContextRef,
) -> Result<bool, CryptoError> {
    let mut order = BigNum::new().map_err(backend)?;
    group.order(&mut order, ctx).map_err(backend)?;
    let mut d = BigNum::new_secure().map_err(backend)?;
    d.copy_from_slice(scalar).map_err(backend)?;
    let in_range = d.num_bits() > 0 && d.ucmp(&order) == Ordering::Less;
    d.clear();
    Ok(in_range)
}

/// Static recipient key pair halves on brainpoolP256r1.
pub type RecipientPublicKey = BrainpoolPublicKey;
pub type RecipientSecretKey = BrainpoolSecretKey;

/// Output of [`hybrid_seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedEnvelope {
    /// Ephemeral public X, big-endian, zero-padded.
    pub ephemeral_x: [u8; COORDINATE_LENGTH],
    /// Ephemeral public Y, big-endian, zero-padded.
    pub ephemeral_y: [u8; COORDINATE_LENGTH],
    pub nonce: [u8; AES_GCM_NONCE_LENGTH],
    /// Ciphertext with the 16-byte tag appended.
    pub ciphertext: Vec<u8>,
}

/// Parse a SEC1-encoded point as a brainpoolP256r1 public key.
pub fn recipient_public_key(sec1: &[u8]) -> Result<RecipientPublicKey, CryptoError> {
    BrainpoolPublicKey::from_sec1_bytes(sec1)
}

/// Rebuild a public key from fixed-width affine coordinates.
pub fn public_key_from_coordinates(
    x: &[u8; COORDINATE_LENGTH],
    y: &[u8; COORDINATE_LENGTH],
) -> Result<RecipientPublicKey, CryptoError> {
    let mut uncompressed = Vec::with_capacity(UNCOMPRESSED_POINT_LENGTH);
    uncompressed.push(0x04);
    uncompressed.extend_from_slice(x);
    uncompressed.extend_from_slice(y);
    recipient_public_key(&uncompressed)
}

/// Split a public key into fixed-width affine coordinates.
pub fn public_key_coordinates(
    key: &RecipientPublicKey,
) -> ([u8; COORDINATE_LENGTH], [u8; COORDINATE_LENGTH]) {
    (key.x, key.y)
}

/// Load a recipient secret key from a raw 32-byte scalar.
pub fn recipient_key_from_bytes(scalar: &[u8]) -> Result<RecipientSecretKey, CryptoError> {
    BrainpoolSecretKey::from_bytes(scalar)
}

/// Derive the outer AES key on the recipient side.
pub fn derive_recipient_key(
    recipient: &RecipientSecretKey,
    ephemeral_x: &[u8; COORDINATE_LENGTH],
    ephemeral_y: &[u8; COORDINATE_LENGTH],
) -> Result<Zeroizing<[u8; AES_KEY_LENGTH]>, CryptoError> {
    let ephemeral = public_key_from_coordinates(ephemeral_x, ephemeral_y)?;
    let shared = recipient.diffie_hellman(&ephemeral)?;
    Ok(Zeroizing::new(derive_export_key(shared.as_slice())?))
}

/// Encrypt `plaintext` for the holder of the secret key matching `public_key`.
///
/// The curve is checked first; an unsupported curve or an invalid point
/// fails before any randomness is drawn from `rng`. The ephemeral scalar is
/// drawn before the nonce.
pub fn hybrid_seal(
    public_key: &[u8],
    curve: &CurveId,
    plaintext: &[u8],
    rng: &mut impl CryptoRngCore,
) -> Result<SealedEnvelope, CryptoError> {
    if *curve != CurveId::BrainpoolP256r1 {
        return Err(CryptoError::UnsupportedCurve(curve.clone()));
    }
    let recipient = recipient_public_key(public_key)?;

    let ephemeral = BrainpoolSecretKey::random(rng)?;
    let (ephemeral_x, ephemeral_y) = public_key_coordinates(&ephemeral.public_key()?);

    let shared = ephemeral.diffie_hellman(&recipient)?;
    let key = Zeroizing::new(derive_export_key(shared.as_slice())?);
    drop(ephemeral);

    let nonce = aead::generate_nonce(rng)?;
    let ciphertext = aead::seal(key.as_slice(), &nonce, plaintext)?;

    Ok(SealedEnvelope {
        ephemeral_x,
        ephemeral_y,
        nonce,
        ciphertext,
    })
}

/// Decrypt a [`SealedEnvelope`] with the recipient's static secret key.
///
/// Fails closed: a wrong key or any modified byte yields
/// [`CryptoError::AuthenticationFailure`]; coordinates that are not a curve
/// point yield [`CryptoError::InvalidPoint`].
pub fn hybrid_open(
    recipient: &RecipientSecretKey,
    sealed: &SealedEnvelope,
) -> Result<Vec<u8>, CryptoError> {
    let key = derive_recipient_key(recipient, &sealed.ephemeral_x, &sealed.ephemeral_y)?;
    aead::open(key.as_slice(), &sealed.nonce, &sealed.ciphertext)
}
