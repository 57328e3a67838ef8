//! Read-only memory-mapped file handle with advisory-lock coordination.

use crate::error::{Error, Result};
use fs2::FileExt;
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// How a [`MappedFile::open`] call should coordinate with concurrent writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Hold a whole-file shared advisory lock for the handle's lifetime.
    /// Blocks while a writer holds the exclusive lock.
    Shared,
    /// Skip locking; the caller is responsible for external coordination.
    None,
}

/// A read-only mapping of a map file, with an optional held shared lock.
///
/// Dropping the handle unmaps the file and releases the lock (if any) —
/// the lock lives as long as the underlying file descriptor, which this
/// handle owns.
pub struct MappedFile {
    mmap: Mmap,
    // Kept alive only to hold the advisory lock for the handle's lifetime;
    // closing it on drop releases the lock automatically.
    _lock_holder: Option<File>,
}

impl MappedFile {
    /// Map `path` read-only, honoring `lock_mode`.
    pub fn open(path: &Path, lock_mode: LockMode) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        if lock_mode == LockMode::Shared {
            file.lock_shared()?;
            debug!(?path, "acquired shared lock for map file");
        }

        // SAFETY: the file is not expected to be mutated out from under this
        // mapping while the handle is alive; readers hold a shared lock
        // against any writer that would do so (unless `LockMode::None` was
        // requested, in which case the caller owns that guarantee).
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        debug!(?path, len = mmap.len(), "mapped file");

        let lock_holder = (lock_mode == LockMode::Shared).then_some(file);
        Ok(Self {
            mmap,
            _lock_holder: lock_holder,
        })
    }

    /// Raw pointer to the start of the mapping.
    pub fn ptr(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    /// Length of the mapping in bytes.
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// `true` if the mapped file is empty.
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// The mapped bytes as a slice. All higher-level decoding goes through
    /// this rather than the raw pointer.
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}
