//! Pure offset arithmetic over a mapped byte range.
//!
//! ```text
//! offset 0      : u32  N       (entry count)
//! offset 4      : u32  V_off   (byte offset of the values segment)
//! offset 8      : KEYS segment
//! offset V_off  : VALUES segment
//! ```
//!
//! All reads are unaligned 4-byte copies; nothing here assumes the mapped
//! region is aligned beyond the byte. Every function bounds-checks against
//! the slice length and reports `Error::Corrupt` rather than reading out of
//! bounds, per the safety note in the design docs — the original C++ source
//! this format was ported from does not bother, but a mmap'd file is
//! attacker- or bitrot-controlled input here.

use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Byte offset of the keys segment, directly after the 8-byte header.
pub const HEADER_LEN: usize = 8;

fn read_u32_at(data: &[u8], offset: usize) -> Result<u32> {
    if offset + 4 > data.len() {
        return Err(Error::Corrupt(format!(
            "offset {offset} out of range for {}-byte file",
            data.len()
        )));
    }
    Ok(LittleEndian::read_u32(&data[offset..offset + 4]))
}

/// `N`, the entry count, from the file header.
pub fn header_count(data: &[u8]) -> Result<u32> {
    read_u32_at(data, 0)
}

/// `V_off`, the byte offset of the values segment, from the file header.
pub fn values_offset(data: &[u8]) -> Result<u32> {
    let v_off = read_u32_at(data, 4)?;
    if v_off as usize > data.len() {
        return Err(Error::Corrupt(format!(
            "values offset {v_off} beyond end of {}-byte file",
            data.len()
        )));
    }
    Ok(v_off)
}

/// Base of the keys segment: always right after the header.
pub fn keys_segment_base() -> usize {
    HEADER_LEN
}

/// Base of the values segment, given the header's `V_off`.
pub fn values_segment_base(v_off: u32) -> usize {
    v_off as usize
}
