//! blob: Dynamic Blob Record codec (pure, no medium access).
//!
//! Формат записи:
//! [key_len u8][key][delimiter '|'][payload][terminator 0x00]
//!
//! Payload is read back up to the first terminator or erase byte (0xFF), or to
//! the end of the region when neither is present. Payload bytes therefore must
//! not contain either value; serde_json output never does (control chars are
//! escaped, 0xFF never occurs in UTF-8), but `encode_record` checks anyway.

use crate::consts::{BLOB_DELIMITER, BLOB_FRAMING_LEN, BLOB_MAX_KEY_LEN, BLOB_TERMINATOR, ERASED_BYTE};
use crate::error::{Result, StoreError};

/// Total encoded length: 1 + key + 1 + payload + 1.
#[inline]
pub fn encoded_len(key: &[u8], payload: &[u8]) -> usize {
    key.len() + payload.len() + BLOB_FRAMING_LEN
}

/// Build a record. Fails if the key does not fit the 1-byte length prefix or
/// the payload contains a byte that would end it early.
pub fn encode_record(key: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let k = key.as_bytes();
    if k.len() > BLOB_MAX_KEY_LEN {
        return Err(StoreError::DynamicKeyTooLong { len: k.len() });
    }
    if let Some(pos) = payload
        .iter()
        .position(|&b| b == BLOB_TERMINATOR || b == ERASED_BYTE)
    {
        return Err(StoreError::PayloadEncodeFailure {
            key: key.to_string(),
            reason: format!("reserved byte 0x{:02x} at payload offset {}", payload[pos], pos),
        });
    }

    let mut out = Vec::with_capacity(encoded_len(k, payload));
    out.push(k.len() as u8);
    out.extend_from_slice(k);
    out.push(BLOB_DELIMITER);
    out.extend_from_slice(payload);
    out.push(BLOB_TERMINATOR);
    Ok(out)
}

/// Check that `region` starts with the header for `key`:
/// length byte, key bytes, delimiter.
pub fn header_matches(region: &[u8], key: &[u8]) -> bool {
    let hdr_len = 1 + key.len() + 1;
    if key.len() > BLOB_MAX_KEY_LEN || region.len() < hdr_len {
        return false;
    }
    region[0] as usize == key.len()
        && &region[1..1 + key.len()] == key
        && region[1 + key.len()] == BLOB_DELIMITER
}

/// Return the payload of the record tagged `key`, or None if the header does
/// not match. The payload slice may be empty.
pub fn decode_record<'a>(region: &'a [u8], key: &[u8]) -> Option<&'a [u8]> {
    if !header_matches(region, key) {
        return None;
    }
    let base = 1 + key.len() + 1;
    let rest = &region[base..];
    let end = rest
        .iter()
        .position(|&b| b == BLOB_TERMINATOR || b == ERASED_BYTE)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Key tag of whatever record sits at the start of `region`, if it looks like one.
pub fn stored_key(region: &[u8]) -> Option<&[u8]> {
    let klen = *region.first()? as usize;
    if klen > BLOB_MAX_KEY_LEN {
        // стёртый регион: длина 0xFF, ключа нет
        return None;
    }
    let key = region.get(1..1 + klen)?;
    if *region.get(1 + klen)? != BLOB_DELIMITER {
        return None;
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_length_key_delim_payload_term() {
        let rec = encode_record("env", br#"{"a":1}"#).unwrap();
        assert_eq!(rec[0], 3);
        assert_eq!(&rec[1..4], b"env");
        assert_eq!(rec[4], b'|');
        assert_eq!(&rec[5..12], br#"{"a":1}"#);
        assert_eq!(rec[12], 0x00);
        assert_eq!(rec.len(), encoded_len(b"env", br#"{"a":1}"#));
    }

    #[test]
    fn decode_stops_at_terminator_or_erase() {
        let mut region = encode_record("k", b"abc").unwrap();
        region.extend_from_slice(b"zzz");
        assert_eq!(decode_record(&region, b"k"), Some(&b"abc"[..]));

        // без терминатора, но дальше стёртые байты
        let mut erased = vec![1u8, b'k', b'|', b'x', b'y'];
        erased.extend_from_slice(&[0xFF; 4]);
        assert_eq!(decode_record(&erased, b"k"), Some(&b"xy"[..]));

        // ни терминатора, ни 0xFF: читаем до конца региона
        let open = vec![1u8, b'k', b'|', b'q'];
        assert_eq!(decode_record(&open, b"k"), Some(&b"q"[..]));
    }

    #[test]
    fn key_mismatch_is_none() {
        let region = encode_record("env", b"{}").unwrap();
        assert!(decode_record(&region, b"bogus").is_none());
        assert!(decode_record(&region, b"en").is_none());
        assert!(decode_record(&region, b"enw").is_none());
        assert!(decode_record(&[0xFF; 16], b"env").is_none());
        assert!(decode_record(&[], b"").is_none());
    }

    #[test]
    fn rejects_reserved_payload_bytes() {
        assert!(matches!(
            encode_record("k", &[b'a', 0x00]),
            Err(StoreError::PayloadEncodeFailure { .. })
        ));
        assert!(matches!(
            encode_record("k", &[0xFF]),
            Err(StoreError::PayloadEncodeFailure { .. })
        ));
    }

    #[test]
    fn rejects_long_key() {
        let key = "k".repeat(256);
        assert!(matches!(
            encode_record(&key, b"{}"),
            Err(StoreError::DynamicKeyTooLong { len: 256 })
        ));
    }

    #[test]
    fn stored_key_peeks_tag() {
        let region = encode_record("env", b"{}").unwrap();
        assert_eq!(stored_key(&region), Some(&b"env"[..]));
        assert_eq!(stored_key(&[0xFF; 8]), None);
        assert_eq!(stored_key(&[3, b'a', b'b']), None);
    }
}
