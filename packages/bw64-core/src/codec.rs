//! Primitive little-endian encoding shared by every chunk.
//!
//! All integer fields in a chunk payload go through [`put_uint_le`], which
//! refuses to truncate. The chunk modules never call the unchecked `BufMut`
//! writers directly.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ChunkError, ChunkResult};

/// Widest integer the codec can emit (a `u64`).
pub const MAX_WIDTH: usize = 8;

/// Returns `Ok(())` when `value` fits in `width` unsigned bytes.
fn check_fits(field: &'static str, value: u64, width: usize) -> ChunkResult<()> {
    if width == 0 || width > MAX_WIDTH {
        return Err(ChunkError::InvalidWidth(width));
    }
    if width < MAX_WIDTH && value >> (8 * width) != 0 {
        return Err(ChunkError::Overflow {
            field,
            value,
            width,
        });
    }
    Ok(())
}

/// Writes `value` into `buf` as a `width`-byte little-endian unsigned integer.
///
/// `field` names the value in the overflow error.
pub fn put_uint_le<B: BufMut>(
    buf: &mut B,
    field: &'static str,
    value: u64,
    width: usize,
) -> ChunkResult<()> {
    check_fits(field, value, width)?;
    buf.put_uint_le(value, width);
    Ok(())
}

/// Encodes `value` as `width` little-endian bytes, zero-filled on the high end.
///
/// # Errors
///
/// Returns [`ChunkError::Overflow`] if `value` needs more than `width` bytes,
/// or [`ChunkError::InvalidWidth`] for a width outside `1..=8`.
pub fn encode_uint(value: u64, width: usize) -> ChunkResult<Bytes> {
    let mut buf = BytesMut::with_capacity(width.min(MAX_WIDTH));
    put_uint_le(&mut buf, "value", value, width)?;
    Ok(buf.freeze())
}

/// Narrows `value` to a `u16`, reporting `field` on overflow.
pub fn narrow_u16(field: &'static str, value: u64) -> ChunkResult<u16> {
    check_fits(field, value, 2)?;
    Ok(value as u16)
}

/// Narrows `value` to a `u32`, reporting `field` on overflow.
pub fn narrow_u32(field: &'static str, value: u64) -> ChunkResult<u32> {
    check_fits(field, value, 4)?;
    Ok(value as u32)
}

/// Returns the chunk size field for a payload of `len` bytes.
pub(crate) fn payload_size(field: &'static str, len: usize) -> ChunkResult<u32> {
    narrow_u32(field, len as u64)
}

/// A four-character chunk identifier, stored in stream byte order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc([u8; 4]);

impl FourCc {
    pub const FMT: FourCc = FourCc::from_bytes(b"fmt ");
    pub const DATA: FourCc = FourCc::from_bytes(b"data");
    pub const JUNK: FourCc = FourCc::from_bytes(b"JUNK");
    pub const AXML: FourCc = FourCc::from_bytes(b"axml");
    pub const DBMD: FourCc = FourCc::from_bytes(b"dbmd");
    pub const CHNA: FourCc = FourCc::from_bytes(b"chna");

    /// Builds a tag from a 4-byte literal.
    pub const fn from_bytes(bytes: &[u8; 4]) -> Self {
        Self(u32::from_le_bytes(*bytes).to_le_bytes())
    }

    /// Builds a tag from an arbitrary slice.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::FourCcLength`] unless `bytes` is exactly 4 long.
    pub fn new(bytes: &[u8]) -> ChunkResult<Self> {
        let raw: &[u8; 4] = bytes
            .try_into()
            .map_err(|_| ChunkError::FourCcLength(bytes.len()))?;
        Ok(Self::from_bytes(raw))
    }

    /// Returns the tag bytes in stream order.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({:?})", self.0.escape_ascii().to_string())
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl AsRef<[u8]> for FourCc {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uint_is_little_endian_and_zero_filled() {
        assert_eq!(&encode_uint(48000, 4).unwrap()[..], &[0x80, 0xBB, 0x00, 0x00]);
        assert_eq!(&encode_uint(1, 2).unwrap()[..], &[0x01, 0x00]);
        assert_eq!(&encode_uint(0, 3).unwrap()[..], &[0, 0, 0]);
    }

    #[test]
    fn encode_uint_accepts_width_maximum() {
        assert_eq!(&encode_uint(0xFFFF, 2).unwrap()[..], &[0xFF, 0xFF]);
        assert_eq!(encode_uint(u64::MAX, 8).unwrap().len(), 8);
    }

    #[test]
    fn encode_uint_rejects_overflow() {
        let err = encode_uint(0x1_0000, 2).unwrap_err();
        assert!(err.is_overflow());
        assert!(encode_uint(256, 1).is_err());
    }

    #[test]
    fn encode_uint_rejects_bad_width() {
        assert_eq!(encode_uint(0, 0), Err(ChunkError::InvalidWidth(0)));
        assert_eq!(encode_uint(0, 9), Err(ChunkError::InvalidWidth(9)));
    }

    #[test]
    fn narrow_reports_field_name() {
        match narrow_u16("trackIndex", 70_000) {
            Err(ChunkError::Overflow { field, width, .. }) => {
                assert_eq!(field, "trackIndex");
                assert_eq!(width, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(narrow_u32("channelMask", 3), Ok(3));
    }

    #[test]
    fn fourcc_preserves_byte_order() {
        let tag = FourCc::new(b"chna").unwrap();
        assert_eq!(tag, FourCc::CHNA);
        assert_eq!(tag.as_bytes(), b"chna");
        assert_eq!(FourCc::FMT.to_string(), "fmt ");
    }

    #[test]
    fn fourcc_rejects_wrong_length() {
        assert_eq!(FourCc::new(b"fmt"), Err(ChunkError::FourCcLength(3)));
        assert_eq!(FourCc::new(b"chunk"), Err(ChunkError::FourCcLength(5)));
    }
}
