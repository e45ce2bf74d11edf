//! Primitive field readers
//!
//! Offset-based readers over a captured payload. Each takes `(data, offset)`
//! and returns `(value, next_offset)`. All integers are big-endian, as the
//! service's serialization layer writes them.
//!
//! Length-prefixed fields (strings, opaque buffers) carry an `i32` length where
//! a negative value means null. They decode to an empty value.

use crate::error::{DecodeError, DecodeResult};
use byteorder::{BigEndian, ByteOrder};

pub const INT_SIZE: usize = 4;
pub const LONG_SIZE: usize = 8;
pub const BOOL_SIZE: usize = 1;

/// Borrow `size` bytes at `offset`, failing if the buffer is too short
pub fn safe_slice<'a>(
    data: &'a [u8],
    offset: usize,
    size: usize,
    field: &str,
) -> DecodeResult<&'a [u8]> {
    match offset.checked_add(size) {
        Some(end) if end <= data.len() => Ok(&data[offset..end]),
        _ => Err(DecodeError::truncated(offset, size, data.len(), field)),
    }
}

pub fn read_i32(data: &[u8], offset: usize) -> DecodeResult<(i32, usize)> {
    let bytes = safe_slice(data, offset, INT_SIZE, "int")?;
    Ok((BigEndian::read_i32(bytes), offset + INT_SIZE))
}

pub fn read_i64(data: &[u8], offset: usize) -> DecodeResult<(i64, usize)> {
    let bytes = safe_slice(data, offset, LONG_SIZE, "long")?;
    Ok((BigEndian::read_i64(bytes), offset + LONG_SIZE))
}

/// Single byte, any nonzero value is true
pub fn read_bool(data: &[u8], offset: usize) -> DecodeResult<(bool, usize)> {
    let bytes = safe_slice(data, offset, BOOL_SIZE, "bool")?;
    Ok((bytes[0] != 0, offset + BOOL_SIZE))
}

/// Read a length prefix and work out where the field body starts and ends
///
/// Returns `None` for a null (negative) length.
fn read_length_prefixed(
    data: &[u8],
    offset: usize,
    max_len: usize,
    field: &'static str,
) -> DecodeResult<Option<(usize, usize)>> {
    let (length, body_start) = read_i32(data, offset)?;
    if length < 0 {
        return Ok(None);
    }

    let declared = length as usize;
    if declared > max_len {
        return Err(DecodeError::FieldBounds {
            field,
            offset,
            declared,
            limit: max_len,
            resume_offset: body_start.saturating_add(declared).min(data.len()),
        });
    }

    safe_slice(data, body_start, declared, field)?;
    Ok(Some((body_start, body_start + declared)))
}

/// Length-prefixed UTF-8 string bounded by `max_len` bytes
pub fn read_string(data: &[u8], offset: usize, max_len: usize) -> DecodeResult<(String, usize)> {
    match read_length_prefixed(data, offset, max_len, "string")? {
        None => Ok((String::new(), offset + INT_SIZE)),
        Some((start, end)) => {
            let value = std::str::from_utf8(&data[start..end]).map_err(|e| {
                DecodeError::malformed(start, format!("invalid UTF-8 in string: {}", e), data.len())
            })?;
            Ok((value.to_owned(), end))
        }
    }
}

/// Length-prefixed opaque byte buffer bounded by `max_len` bytes
pub fn read_buffer(data: &[u8], offset: usize, max_len: usize) -> DecodeResult<(Vec<u8>, usize)> {
    match read_length_prefixed(data, offset, max_len, "buffer")? {
        None => Ok((Vec::new(), offset + INT_SIZE)),
        Some((start, end)) => Ok((data[start..end].to_vec(), end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_field(s: &str) -> Vec<u8> {
        let mut out = (s.len() as i32).to_be_bytes().to_vec();
        out.extend_from_slice(s.as_bytes());
        out
    }

    #[test]
    fn test_read_fixed_width() {
        let mut data = Vec::new();
        data.extend_from_slice(&7i32.to_be_bytes());
        data.extend_from_slice(&(-3i64).to_be_bytes());
        data.push(1);

        let (a, offset) = read_i32(&data, 0).unwrap();
        let (b, offset) = read_i64(&data, offset).unwrap();
        let (c, offset) = read_bool(&data, offset).unwrap();
        assert_eq!((a, b, c), (7, -3, true));
        assert_eq!(offset, data.len());
    }

    #[test]
    fn test_read_past_end_is_deserialization_error() {
        let data = [0u8, 0, 1];
        assert!(matches!(
            read_i32(&data, 0),
            Err(DecodeError::Deserialization { offset: 0, .. })
        ));
        assert!(read_bool(&data, 3).is_err());
        assert!(read_i64(&data, usize::MAX).is_err());
    }

    #[test]
    fn test_read_string() {
        let data = string_field("/foo");
        let (s, offset) = read_string(&data, 0, 1024).unwrap();
        assert_eq!(s, "/foo");
        assert_eq!(offset, 8);
    }

    #[test]
    fn test_null_string_is_empty() {
        let data = (-1i32).to_be_bytes();
        let (s, offset) = read_string(&data, 0, 1024).unwrap();
        assert_eq!(s, "");
        assert_eq!(offset, 4);
    }

    #[test]
    fn test_string_over_bound_reports_resume_offset() {
        let mut data = string_field("/abcdefgh");
        data.extend_from_slice(&9i32.to_be_bytes());

        let err = read_string(&data, 0, 4).unwrap_err();
        let resume = match err {
            DecodeError::FieldBounds {
                declared,
                limit,
                resume_offset,
                ..
            } => {
                assert_eq!(declared, 9);
                assert_eq!(limit, 4);
                resume_offset
            }
            other => panic!("unexpected error: {other:?}"),
        };

        // The field after the oversized string is still readable
        let (next, _) = read_i32(&data, resume).unwrap();
        assert_eq!(next, 9);
    }

    #[test]
    fn test_string_over_bound_resume_offset_is_clamped() {
        let mut data = 5000i32.to_be_bytes().to_vec();
        data.extend_from_slice(b"short");
        match read_string(&data, 0, 1024).unwrap_err() {
            DecodeError::FieldBounds { resume_offset, .. } => assert_eq!(resume_offset, data.len()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_string_body() {
        let mut data = 10i32.to_be_bytes().to_vec();
        data.extend_from_slice(b"abc");
        assert!(matches!(
            read_string(&data, 0, 1024),
            Err(DecodeError::Deserialization { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut data = 2i32.to_be_bytes().to_vec();
        data.extend_from_slice(&[0xC3, 0x28]);
        assert!(matches!(
            read_string(&data, 0, 1024),
            Err(DecodeError::Deserialization { .. })
        ));
    }

    #[test]
    fn test_read_buffer() {
        let mut data = 3i32.to_be_bytes().to_vec();
        data.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        let (buf, offset) = read_buffer(&data, 0, 16).unwrap();
        assert_eq!(buf, vec![0xAA, 0xBB, 0xCC]);
        assert_eq!(offset, 7);

        assert!(matches!(
            read_buffer(&data, 0, 2),
            Err(DecodeError::FieldBounds { field: "buffer", .. })
        ));
    }
}
