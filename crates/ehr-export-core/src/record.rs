//! Signed export record and its CBOR encoding.
//!
//! Wire form is a definite-length CBOR array:
//! `[1, innerCiphertext, timestamp, ownerId, signerCertificate, signature]`
//! where the version is an unsigned integer and the rest are byte strings.

use ciborium::Value;
use serde::Serialize;

use crate::error::ExportError;
use crate::types::{RECORD_ELEMENT_COUNT, RECORD_FORMAT_VERSION};

/// Decoded inner record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub version: u64,
    /// Inner nonce followed by the null-key ciphertext and tag.
    pub inner_ciphertext: Vec<u8>,
    /// ASCII export timestamp.
    pub timestamp: Vec<u8>,
    pub owner_id: Vec<u8>,
    /// Signer certificate DER, embedded verbatim.
    pub signer_certificate: Vec<u8>,
    /// DER-encoded ECDSA signature.
    pub signature: Vec<u8>,
}

#[derive(Serialize)]
struct RecordWire<'a>(
    u64,
    #[serde(with = "serde_bytes")] &'a [u8],
    #[serde(with = "serde_bytes")] &'a [u8],
    #[serde(with = "serde_bytes")] &'a [u8],
    #[serde(with = "serde_bytes")] &'a [u8],
    #[serde(with = "serde_bytes")] &'a [u8],
);

/// Build the message covered by the record signature:
/// `innerCiphertext || timestamp || ownerId`, no delimiters.
pub fn build_signed_message(inner_ciphertext: &[u8], timestamp: &[u8], owner_id: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(inner_ciphertext.len() + timestamp.len() + owner_id.len());
    message.extend_from_slice(inner_ciphertext);
    message.extend_from_slice(timestamp);
    message.extend_from_slice(owner_id);
    message
}

impl ExportRecord {
    pub fn signed_message(&self) -> Vec<u8> {
        build_signed_message(&self.inner_ciphertext, &self.timestamp, &self.owner_id)
    }
}

/// Encode a record as CBOR bytes.
pub fn encode_record(record: &ExportRecord) -> Result<Vec<u8>, ExportError> {
    let wire = RecordWire(
        record.version,
        &record.inner_ciphertext,
        &record.timestamp,
        &record.owner_id,
        &record.signer_certificate,
        &record.signature,
    );
    let mut buf = Vec::new();
    ciborium::into_writer(&wire, &mut buf)
        .map_err(|e| ExportError::CborEncode(format!("{}", e)))?;
    Ok(buf)
}

/// Decode CBOR bytes into a record.
///
/// The version is read before the layout is checked, so a record from a
/// future version fails with [`ExportError::UnsupportedVersion`] whatever
/// shape the rest of it has.
pub fn decode_record(data: &[u8]) -> Result<ExportRecord, ExportError> {
    let mut remaining = data;
    let value: Value = ciborium::from_reader(&mut remaining)
        .map_err(|e| ExportError::CborDecode(format!("{}", e)))?;
    if !remaining.is_empty() {
        return Err(ExportError::InvalidRecord(format!(
            "{} trailing bytes after record",
            remaining.len()
        )));
    }
    let elements = value
        .into_array()
        .map_err(|_| ExportError::InvalidRecord("record is not an array".to_string()))?;

    let version = match elements.first() {
        Some(Value::Integer(i)) => i128::from(*i),
        Some(_) => {
            return Err(ExportError::InvalidRecord(
                "version is not an integer".to_string(),
            ))
        }
        None => return Err(ExportError::InvalidRecord("empty record".to_string())),
    };
    if version != i128::from(RECORD_FORMAT_VERSION) {
        return Err(ExportError::UnsupportedVersion(version));
    }

    if elements.len() != RECORD_ELEMENT_COUNT {
        return Err(ExportError::InvalidRecord(format!(
            "expected {} elements, got {}",
            RECORD_ELEMENT_COUNT,
            elements.len()
        )));
    }

    let fields = elements
        .into_iter()
        .skip(1)
        .enumerate()
        .map(|(i, v)| {
            v.into_bytes().map_err(|_| {
                ExportError::InvalidRecord(format!("element {} is not a byte string", i + 2))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [inner_ciphertext, timestamp, owner_id, signer_certificate, signature]: [Vec<u8>; 5] =
        fields
            .try_into()
            .map_err(|_| ExportError::InvalidRecord("missing element".to_string()))?;

    Ok(ExportRecord {
        version: RECORD_FORMAT_VERSION,
        inner_ciphertext,
        timestamp,
        owner_id,
        signer_certificate,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExportRecord {
        ExportRecord {
            version: 1,
            inner_ciphertext: vec![0xaa; 44],
            timestamp: b"2025-03-14T09:26:53.589793".to_vec(),
            owner_id: b"A123456789".to_vec(),
            signer_certificate: vec![0x30, 0x82, 0x01, 0x00],
            signature: vec![0x30, 0x44, 0x02, 0x20],
        }
    }

    fn encode_value(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).unwrap();
        buf
    }

    #[test]
    fn round_trip() {
        let record = sample();
        let decoded = decode_record(&encode_record(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn wire_layout() {
        let encoded = encode_record(&sample()).unwrap();
        // definite array of 6, unsigned 1, byte string of 44
        assert_eq!(&encoded[..4], &[0x86, 0x01, 0x58, 0x2c]);
    }

    #[test]
    fn signed_message_is_plain_concatenation() {
        let message = build_signed_message(b"ct", b"ts", b"owner");
        assert_eq!(message, b"cttsowner");
        assert_eq!(sample().signed_message().len(), 44 + 26 + 10);
    }

    #[test]
    fn rejects_other_versions_before_layout() {
        let future = Value::Array(vec![Value::Integer(2.into()), Value::Text("x".into())]);
        assert!(matches!(
            decode_record(&encode_value(&future)),
            Err(ExportError::UnsupportedVersion(2))
        ));

        let zero = Value::Array(vec![Value::Integer(0.into())]);
        assert!(matches!(
            decode_record(&encode_value(&zero)),
            Err(ExportError::UnsupportedVersion(0))
        ));
    }

    #[test]
    fn rejects_wrong_element_count() {
        let short = Value::Array(vec![Value::Integer(1.into()), Value::Bytes(vec![1])]);
        assert!(matches!(
            decode_record(&encode_value(&short)),
            Err(ExportError::InvalidRecord(_))
        ));
    }

    #[test]
    fn rejects_non_bytes_element() {
        let mut elements = vec![Value::Integer(1.into())];
        elements.extend((0..4).map(|_| Value::Bytes(vec![0])));
        elements.push(Value::Text("sig".into()));
        let err = decode_record(&encode_value(&Value::Array(elements))).unwrap_err();
        assert!(err.to_string().contains("element 6"));
    }

    #[test]
    fn rejects_non_array_and_garbage() {
        assert!(matches!(
            decode_record(&encode_value(&Value::Integer(1.into()))),
            Err(ExportError::InvalidRecord(_))
        ));
        assert!(matches!(
            decode_record(&encode_value(&Value::Array(vec![Value::Bool(true)]))),
            Err(ExportError::InvalidRecord(_))
        ));
        assert!(matches!(
            decode_record(&[0xff, 0xff]),
            Err(ExportError::CborDecode(_))
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut encoded = encode_record(&sample()).unwrap();
        assert!(decode_record(&encoded).is_ok());

        encoded.push(0x00);
        let err = decode_record(&encoded).unwrap_err();
        assert!(matches!(err, ExportError::InvalidRecord(_)));
        assert!(err.to_string().contains("1 trailing bytes"));

        let mut doubled = encode_record(&sample()).unwrap();
        doubled.extend(encode_record(&sample()).unwrap());
        assert!(matches!(
            decode_record(&doubled),
            Err(ExportError::InvalidRecord(_))
        ));
    }
}
