//! Serialize an in-memory sorted mapping into the on-disk map-file layout.
//!
//! Exposed standalone (not just through [`crate::Writer`]) so tests and
//! callers that want to write the bytes themselves — to a socket, into an
//! existing buffer, whatever — don't need to go through a `Writer`.

use crate::codec::Codec;
use crate::layout;
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

/// Encode `entries` — already sorted and unique by key under
/// `K::cmp_key` — into the complete byte image of a map file.
///
/// Feeding unsorted or duplicate-keyed input is a programming error: in
/// debug builds it is caught by an assertion; in release builds the caller
/// gets a file whose binary search is simply wrong, exactly as spec'd for
/// this kind of internal contract violation.
pub fn encode<K: Codec, V: Codec>(entries: &[(K, V)]) -> Vec<u8> {
    debug_assert!(
        entries
            .windows(2)
            .all(|w| w[0].0.cmp_key(&w[1].0) == std::cmp::Ordering::Less),
        "map-file entries must be strictly increasing and unique by key"
    );

    let n = entries.len();
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(n as u32)
        .expect("writing to a Vec<u8> cannot fail");
    out.write_u32::<LittleEndian>(0)
        .expect("writing to a Vec<u8> cannot fail"); // patched below

    let keys: Vec<&K> = entries.iter().map(|(k, _)| k).collect();
    write_segment(&mut out, layout::keys_segment_base(), &keys);

    let v_off = out.len() as u32;
    LittleEndian::write_u32(&mut out[4..8], v_off);

    let values: Vec<&V> = entries.iter().map(|(_, v)| v).collect();
    write_segment(&mut out, layout::values_segment_base(v_off), &values);

    out
}

/// Append one segment (all keys, or all values) to `out`.
///
/// For a fixed-width codec this is just the concatenation of each raw
/// encoding. For a variable-width codec it's an offset table of `N`
/// absolute file offsets followed by the concatenated encodings, per the
/// layout's segment format.
fn write_segment<C: Codec>(out: &mut Vec<u8>, segment_base: usize, items: &[&C]) {
    match C::FIXED_WIDTH {
        Some(_) => {
            for item in items {
                item.encode(out);
            }
        }
        None => {
            let table_base = segment_base + 4 * items.len();
            let mut scratch = Vec::new();
            let mut offsets = Vec::with_capacity(items.len());
            for item in items {
                offsets.push((table_base + scratch.len()) as u32);
                item.encode(&mut scratch);
            }
            for offset in offsets {
                out.write_u32::<LittleEndian>(offset)
                    .expect("writing to a Vec<u8> cannot fail");
            }
            out.extend_from_slice(&scratch);
        }
    }
}
