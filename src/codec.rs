//! Element encode/decode for map-file keys and values.
//!
//! A [`Codec`] either declares a fixed element width (every value occupies
//! the same number of bytes, encoded as a raw little-endian copy of its
//! in-memory representation) or is variable-width (each encoding is
//! self-delimiting, so `decode` can be handed the tail of the mapped file
//! starting at the element's offset and know where to stop on its own).
//!
//! The writer's sort order and the reader's binary-search comparator must
//! agree, so both live on the same trait as `cmp_key` rather than being
//! duplicated across the encoder and the reader.

use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::cmp::Ordering;
use std::io::Cursor;
use varint_rs::{VarintReader, VarintWriter};

/// An element that can live in a map file's keys or values segment.
pub trait Codec: Sized {
    /// `Some(w)` for a fixed-width element of `w` bytes; `None` for a
    /// variable-width, self-delimiting encoding.
    const FIXED_WIDTH: Option<u32>;

    /// Append this element's encoding to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Decode one element starting at `bytes[0]`. For a fixed-width codec,
    /// `bytes` is exactly `FIXED_WIDTH` bytes. For a variable-width codec,
    /// `bytes` is the remainder of the mapped file from this element's
    /// recorded offset to the end of the file; `decode` reads only its own
    /// self-delimited prefix and ignores the rest.
    fn decode(bytes: &[u8]) -> Result<Self>;

    /// The total order used both to sort entries at write time and to
    /// binary-search them at read time.
    fn cmp_key(&self, other: &Self) -> Ordering;
}

fn need(bytes: &[u8], len: usize) -> Result<()> {
    if bytes.len() < len {
        return Err(Error::Corrupt(format!(
            "expected at least {len} bytes, found {}",
            bytes.len()
        )));
    }
    Ok(())
}

macro_rules! impl_fixed_int_codec {
    ($ty:ty, $width:expr, $read:ident, $write:ident) => {
        impl Codec for $ty {
            const FIXED_WIDTH: Option<u32> = Some($width);

            fn encode(&self, out: &mut Vec<u8>) {
                let mut buf = [0u8; $width];
                LittleEndian::$write(&mut buf, *self);
                out.extend_from_slice(&buf);
            }

            fn decode(bytes: &[u8]) -> Result<Self> {
                need(bytes, $width)?;
                Ok(LittleEndian::$read(&bytes[..$width]))
            }

            fn cmp_key(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        }
    };
}

impl_fixed_int_codec!(u32, 4, read_u32, write_u32);
impl_fixed_int_codec!(u64, 8, read_u64, write_u64);
impl_fixed_int_codec!(i32, 4, read_i32, write_i32);
impl_fixed_int_codec!(i64, 8, read_i64, write_i64);

/// A source location: the natural fixed-width composite key/value for a
/// symbol index (file id + 1-based line + 1-based column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub file_id: u32,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(file_id: u32, line: u32, column: u32) -> Self {
        Self {
            file_id,
            line,
            column,
        }
    }
}

impl Codec for Location {
    const FIXED_WIDTH: Option<u32> = Some(12);

    fn encode(&self, out: &mut Vec<u8>) {
        let mut buf = [0u8; 12];
        LittleEndian::write_u32(&mut buf[0..4], self.file_id);
        LittleEndian::write_u32(&mut buf[4..8], self.line);
        LittleEndian::write_u32(&mut buf[8..12], self.column);
        out.extend_from_slice(&buf);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        need(bytes, 12)?;
        Ok(Self {
            file_id: LittleEndian::read_u32(&bytes[0..4]),
            line: LittleEndian::read_u32(&bytes[4..8]),
            column: LittleEndian::read_u32(&bytes[8..12]),
        })
    }

    fn cmp_key(&self, other: &Self) -> Ordering {
        (self.file_id, self.line, self.column).cmp(&(other.file_id, other.line, other.column))
    }
}

/// A UTF-8 string, encoded as a varint byte-length followed by its raw
/// bytes. Compared lexicographically over the encoded UTF-8 bytes.
impl Codec for String {
    const FIXED_WIDTH: Option<u32> = None;

    fn encode(&self, out: &mut Vec<u8>) {
        let bytes = self.as_bytes();
        out.write_u32_varint(bytes.len() as u32)
            .expect("writing to a Vec<u8> cannot fail");
        out.extend_from_slice(bytes);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let len = cursor
            .read_u32_varint()
            .map_err(|_| Error::Corrupt("truncated string length varint".into()))? as usize;
        let start = cursor.position() as usize;
        need(bytes, start + len)?;
        std::str::from_utf8(&bytes[start..start + len])
            .map(str::to_owned)
            .map_err(|e| Error::Corrupt(format!("invalid UTF-8 in string element: {e}")))
    }

    fn cmp_key(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

/// An opaque byte blob, encoded as a varint byte-length followed by its raw
/// bytes. Compared lexicographically.
impl Codec for Vec<u8> {
    const FIXED_WIDTH: Option<u32> = None;

    fn encode(&self, out: &mut Vec<u8>) {
        out.write_u32_varint(self.len() as u32)
            .expect("writing to a Vec<u8> cannot fail");
        out.extend_from_slice(self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let len = cursor
            .read_u32_varint()
            .map_err(|_| Error::Corrupt("truncated blob length varint".into()))? as usize;
        let start = cursor.position() as usize;
        need(bytes, start + len)?;
        Ok(bytes[start..start + len].to_vec())
    }

    fn cmp_key(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_u32_round_trips() {
        let mut out = Vec::new();
        42u32.encode(&mut out);
        assert_eq!(out.len(), 4);
        assert_eq!(u32::decode(&out).unwrap(), 42);
    }

    #[test]
    fn location_orders_by_tuple() {
        let a = Location::new(1, 10, 1);
        let b = Location::new(1, 10, 2);
        assert_eq!(a.cmp_key(&b), Ordering::Less);
    }

    #[test]
    fn string_round_trips_and_self_delimits() {
        let mut out = Vec::new();
        "apple".to_string().encode(&mut out);
        // Trailing garbage must not affect decoding; offsets into a shared
        // file always point at the start of an element, never its end.
        out.extend_from_slice(b"trailing garbage");
        assert_eq!(String::decode(&out).unwrap(), "apple");
    }

    #[test]
    fn string_decode_rejects_truncated_input() {
        let mut out = Vec::new();
        "hello".to_string().encode(&mut out);
        out.truncate(out.len() - 2);
        assert!(String::decode(&out).is_err());
    }

    #[test]
    fn blob_round_trips() {
        let data = vec![1u8, 2, 3, 4, 5];
        let mut out = Vec::new();
        data.encode(&mut out);
        assert_eq!(Vec::<u8>::decode(&out).unwrap(), data);
    }
}
