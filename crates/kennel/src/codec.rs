//! JSON encoding for persisted record collections.
//!
//! The encoded form is a JSON array of objects with exactly two string
//! fields, `name` then `breed`, in collection order.

use thiserror::Error;

use crate::record::{Dog, RecordCollection};

/// The persisted bytes could not be turned back into a record collection.
///
/// Callers loading from storage treat this the same as "no data".
#[derive(Error, Debug)]
#[error("malformed record data: {message}")]
pub struct DecodeError {
    /// Line reported by the parser (1-based, 0 if unknown).
    pub line: usize,
    /// Column reported by the parser (1-based, 0 if unknown).
    pub column: usize,
    /// Parser message.
    pub message: String,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Encode a collection as compact JSON bytes.
///
/// # Errors
///
/// Returns the serializer's error. Records hold only strings, so this does
/// not happen in practice; callers must still not substitute a value.
pub fn encode(records: &[Dog]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(records)
}

/// Encode a collection as indented JSON for display.
///
/// # Errors
///
/// Returns the serializer's error, as for [`encode`].
pub fn encode_pretty(records: &[Dog]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Decode bytes produced by [`encode`].
///
/// # Errors
///
/// Returns [`DecodeError`] if the bytes are not JSON, are not an array, or
/// any element lacks a string `name` or `breed`. Unknown extra keys are
/// ignored so data written with additional fields still loads.
pub fn decode(bytes: &[u8]) -> Result<RecordCollection, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordCollection {
        vec![Dog::new("Rex", "Lab"), Dog::new("Fido", "Pug")]
    }

    #[test]
    fn test_encode_field_order() {
        let bytes = encode(&[Dog::new("Rex", "Lab")]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"[{"name":"Rex","breed":"Lab"}]"#
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]).unwrap(), b"[]");
    }

    #[test]
    fn test_round_trip_preserves_order_and_duplicates() {
        let records = vec![
            Dog::new("Rex", "Lab"),
            Dog::new("Rex", "Lab"),
            Dog::new("Fido", "Pug"),
        ];
        assert_eq!(decode(&encode(&records).unwrap()).unwrap(), records);
    }

    #[test]
    fn test_round_trip_unicode_and_empty() {
        let records = vec![
            Dog::new("", ""),
            Dog::new("Hündchen \"Max\"", "柴犬 🐕"),
            Dog::new("line\nbreak", "tab\there"),
        ];
        assert_eq!(decode(&encode(&records).unwrap()).unwrap(), records);
    }

    #[test]
    fn test_decode_accepts_reordered_fields() {
        let decoded = decode(br#"[{"breed":"Lab","name":"Rex"}]"#).unwrap();
        assert_eq!(decoded, vec![Dog::new("Rex", "Lab")]);
    }

    #[test]
    fn test_decode_accepts_whitespace() {
        let decoded = decode(encode_pretty(&sample()).unwrap().as_bytes()).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode(b"not json").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.to_string().contains("malformed record data"));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode(b"").is_err());
    }

    #[test]
    fn test_decode_not_an_array() {
        assert!(decode(br#"{"name":"Rex","breed":"Lab"}"#).is_err());
    }

    #[test]
    fn test_decode_missing_field() {
        assert!(decode(br#"[{"name":"Rex"}]"#).is_err());
    }

    #[test]
    fn test_decode_ignores_extra_field() {
        let decoded = decode(br#"[{"name":"Rex","breed":"Lab","age":3}]"#).unwrap();
        assert_eq!(decoded, vec![Dog::new("Rex", "Lab")]);
        assert_eq!(
            encode(&decoded).unwrap(),
            br#"[{"name":"Rex","breed":"Lab"}]"#
        );
    }

    #[test]
    fn test_decode_wrong_type() {
        assert!(decode(br#"[{"name":"Rex","breed":7}]"#).is_err());
    }

    #[test]
    fn test_encode_pretty_is_indented() {
        let pretty = encode_pretty(&sample()).unwrap();
        assert!(pretty.contains('\n'));
        assert!(pretty.contains("\"name\": \"Rex\""));
    }
}
