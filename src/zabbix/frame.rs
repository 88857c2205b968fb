//! Zabbix wire framing.
//!
//! Every message exchanged with the server is wrapped in a fixed 13-byte
//! header followed by the UTF-8 JSON payload:
//!
//! ```text
//! ["ZBXD":4][version:1][payload_len:4 LE][reserved:4 LE][payload:N]
//! ```
//!
//! There is no compression and no checksum.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Marker opening every frame.
pub const MAGIC: &[u8; 4] = b"ZBXD";
/// Protocol version byte written after the marker.
pub const PROTOCOL_VERSION: u8 = 0x01;
/// Total size of the frame header in bytes.
pub const HEADER_LEN: usize = 13;

/// Errors raised while encoding or decoding a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Fewer bytes than a complete header.
    #[error("truncated frame: need at least {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    /// The frame does not open with `ZBXD`.
    #[error("frame is missing the ZBXD marker")]
    BadMagic,

    /// The version byte is not one this codec understands.
    #[error("unsupported protocol version: 0x{0:02X}")]
    UnsupportedVersion(u8),

    /// The declared payload length disagrees with the bytes present.
    #[error("payload length mismatch: header says {declared}, available is {available}")]
    LengthMismatch { declared: usize, available: usize },

    /// The payload cannot be described by the 32-bit length field.
    #[error("payload of {0} bytes exceeds the frame length field")]
    TooLarge(usize),

    /// The payload is not valid JSON.
    #[error("invalid JSON payload")]
    Json(#[from] serde_json::Error),
}

/// Wrap `payload` in a frame header.
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::TooLarge(payload.len()))?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(MAGIC);
    frame.push(PROTOCOL_VERSION);
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&0u32.to_le_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Serialise `message` as JSON and frame it.
pub fn encode_json<T: Serialize>(message: &T) -> Result<Vec<u8>, FrameError> {
    let payload = serde_json::to_vec(message)?;
    encode(&payload)
}

/// Validate the header of `raw` and return the payload slice.
pub fn payload(raw: &[u8]) -> Result<&[u8], FrameError> {
    if raw.len() < HEADER_LEN {
        if !raw.is_empty() && !MAGIC.starts_with(&raw[..raw.len().min(MAGIC.len())]) {
            return Err(FrameError::BadMagic);
        }
        return Err(FrameError::Truncated {
            needed: HEADER_LEN,
            available: raw.len(),
        });
    }
    if &raw[..4] != MAGIC {
        return Err(FrameError::BadMagic);
    }
    if raw[4] != PROTOCOL_VERSION {
        return Err(FrameError::UnsupportedVersion(raw[4]));
    }
    let declared = u32::from_le_bytes([raw[5], raw[6], raw[7], raw[8]]) as usize;
    let body = &raw[HEADER_LEN..];
    if declared != body.len() {
        return Err(FrameError::LengthMismatch {
            declared,
            available: body.len(),
        });
    }
    Ok(body)
}

/// Strip the frame header from `raw` and parse the payload as JSON.
pub fn decode(raw: &[u8]) -> Result<Value, FrameError> {
    let body = payload(raw)?;
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn encode_writes_header_fields() {
        let payload = br#"{"a":1}"#;
        let frame = encode(payload).expect("encode");
        assert_eq!(&frame[..4], b"ZBXD");
        assert_eq!(frame[4], 0x01);
        assert_eq!(&frame[5..9], &(payload.len() as u32).to_le_bytes());
        assert_eq!(&frame[9..13], &[0u8; 4]);
        assert_eq!(&frame[13..], payload);
    }

    #[rstest]
    fn decode_reads_json_payload() {
        let frame = encode(br#"{"result":"tok123"}"#).expect("encode");
        let value = decode(&frame).expect("valid frame");
        assert_eq!(value, json!({"result": "tok123"}));
    }

    #[rstest]
    #[case::wrong_marker(b"ZBXE\x01\x02\x00\x00\x00\x00\x00\x00\x00{}".to_vec())]
    #[case::plain_json(br#"{"result":"tok123","id":1}"#.to_vec())]
    fn decode_rejects_missing_marker(#[case] raw: Vec<u8>) {
        let err = decode(&raw).expect_err("marker must be checked");
        assert!(matches!(err, FrameError::BadMagic), "got {err:?}");
    }

    #[rstest]
    fn decode_rejects_short_header() {
        let err = decode(b"ZBXD\x01").expect_err("header too short");
        assert!(matches!(
            err,
            FrameError::Truncated {
                needed: HEADER_LEN,
                available: 5
            }
        ));
    }

    #[rstest]
    fn decode_rejects_unknown_version() {
        let mut frame = encode(b"{}").expect("encode");
        frame[4] = 0x03;
        let err = decode(&frame).expect_err("version must be checked");
        assert!(matches!(err, FrameError::UnsupportedVersion(0x03)));
    }

    #[rstest]
    #[case::longer_than_body(10)]
    #[case::shorter_than_body(1)]
    fn decode_rejects_length_mismatch(#[case] declared: u32) {
        let mut frame = encode(b"{\"ok\":1}").expect("encode");
        frame[5..9].copy_from_slice(&declared.to_le_bytes());
        let err = decode(&frame).expect_err("length must match");
        assert!(matches!(err, FrameError::LengthMismatch { .. }), "got {err:?}");
    }

    #[rstest]
    fn decode_rejects_invalid_json() {
        let frame = encode(b"not json").expect("encode");
        let err = decode(&frame).expect_err("payload must be JSON");
        assert!(matches!(err, FrameError::Json(_)));
    }

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            ".*".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(value in json_value()) {
            let payload = serde_json::to_vec(&value).expect("serialise");
            let frame = encode(&payload).expect("encode");
            let declared = u32::from_le_bytes([frame[5], frame[6], frame[7], frame[8]]);
            prop_assert_eq!(declared as usize, payload.len());
            prop_assert_eq!(decode(&frame).expect("decode"), value);
        }
    }
}
