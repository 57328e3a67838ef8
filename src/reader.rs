//! Binary-search reader over a memory-mapped map file.

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::layout;
use crate::mmap::{LockMode, MappedFile};
use crate::options::Options;
use byteorder::{ByteOrder, LittleEndian};
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::path::Path;

/// The sentinel `lower_bound` returns when the query key exceeds every key
/// in the map, or when the map is empty.
pub const NOT_FOUND: u32 = u32::MAX;

/// A read-only handle onto a map file, opened read-only and memory-mapped.
///
/// Holds the mapping (and, unless [`Options::NO_LOCK`] was requested, a
/// shared advisory lock) for its entire lifetime; both are released when
/// the reader is dropped.
pub struct Reader<K, V> {
    mapped: MappedFile,
    count: u32,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K: Codec, V: Codec> Reader<K, V> {
    /// Open `path` for reading.
    pub fn open(path: &Path, options: Options) -> Result<Self> {
        let lock_mode = if options.contains(Options::NO_LOCK) {
            LockMode::None
        } else {
            LockMode::Shared
        };
        let mapped = MappedFile::open(path, lock_mode)?;
        let count = layout::header_count(mapped.as_slice())?;
        // Validate up front so a corrupt header fails the open rather than
        // an arbitrary later lookup.
        layout::values_offset(mapped.as_slice())?;
        Ok(Self {
            mapped,
            count,
            _marker: PhantomData,
        })
    }

    /// Number of entries in the map.
    pub fn count(&self) -> u32 {
        self.count
    }

    fn data(&self) -> &[u8] {
        self.mapped.as_slice()
    }

    fn check_index(&self, index: u32) -> Result<()> {
        if index >= self.count {
            return Err(Error::OutOfRange {
                index,
                count: self.count,
            });
        }
        Ok(())
    }

    /// Decode the element at `index` within the segment rooted at
    /// `segment_base`.
    fn decode_at<C: Codec>(&self, segment_base: usize, index: u32) -> Result<C> {
        let data = self.data();
        match C::FIXED_WIDTH {
            Some(width) => {
                let width = width as usize;
                let start = segment_base + index as usize * width;
                let end = start + width;
                if end > data.len() {
                    return Err(Error::Corrupt(format!(
                        "fixed-width element at index {index} extends past end of file"
                    )));
                }
                C::decode(&data[start..end])
            }
            None => {
                let offset_pos = segment_base + index as usize * 4;
                if offset_pos + 4 > data.len() {
                    return Err(Error::Corrupt(format!(
                        "offset table entry {index} extends past end of file"
                    )));
                }
                let elem_offset =
                    LittleEndian::read_u32(&data[offset_pos..offset_pos + 4]) as usize;
                if elem_offset > data.len() {
                    return Err(Error::Corrupt(format!(
                        "element offset {elem_offset} out of range for {}-byte file",
                        data.len()
                    )));
                }
                C::decode(&data[elem_offset..])
            }
        }
    }

    /// Decode the key at `index`, `0 <= index < count()`.
    pub fn key_at(&self, index: u32) -> Result<K> {
        self.check_index(index)?;
        self.decode_at::<K>(layout::keys_segment_base(), index)
    }

    /// Decode the value at `index`, `0 <= index < count()`.
    pub fn value_at(&self, index: u32) -> Result<V> {
        self.check_index(index)?;
        let v_off = layout::values_offset(self.data())?;
        self.decode_at::<V>(layout::values_segment_base(v_off), index)
    }

    /// Binary search for `key`. Returns `(index, true)` on an exact match,
    /// or `(index, false)` where `index` is the first position whose key is
    /// strictly greater than `key` — `NOT_FOUND` if `key` exceeds every
    /// entry (or the map is empty).
    pub fn lower_bound(&self, key: &K) -> Result<(u32, bool)> {
        if self.count == 0 {
            return Ok((NOT_FOUND, false));
        }

        let mut lower: i64 = 0;
        let mut upper: i64 = self.count as i64 - 1;

        while lower <= upper {
            let mid = lower + (upper - lower) / 2;
            let mid_key = self.key_at(mid as u32)?;
            match key.cmp_key(&mid_key) {
                Ordering::Less => upper = mid - 1,
                Ordering::Greater => lower = mid + 1,
                Ordering::Equal => return Ok((mid as u32, true)),
            }
        }

        if lower == self.count as i64 {
            Ok((NOT_FOUND, false))
        } else {
            Ok((lower as u32, false))
        }
    }

    /// Convenience wrapper: the value for `key`, if present.
    pub fn value(&self, key: &K) -> Result<Option<V>> {
        let (index, matched) = self.lower_bound(key)?;
        if matched {
            Ok(Some(self.value_at(index)?))
        } else {
            Ok(None)
        }
    }

    /// Iterate all entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            reader: self,
            index: 0,
        }
    }
}

/// Ordered iterator over a [`Reader`]'s entries.
pub struct Iter<'a, K, V> {
    reader: &'a Reader<K, V>,
    index: u32,
}

impl<'a, K: Codec, V: Codec> Iterator for Iter<'a, K, V> {
    type Item = Result<(K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.reader.count {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(
            self.reader
                .key_at(index)
                .and_then(|k| self.reader.value_at(index).map(|v| (k, v))),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.reader.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}
