//! Create or replace a map file, taking an exclusive advisory lock for the
//! duration of the write.
//!
//! Writing is deliberately not crash-atomic: if the process dies between
//! truncation and the final write, a partial file may be left behind. A
//! caller that needs crash-atomicity writes to a sibling temporary path and
//! renames it into place — that's a caller concern, not this crate's.

use crate::codec::Codec;
use crate::encode::encode;
use crate::error::Result;
use crate::options::Options;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Writes map files to disk.
pub struct Writer;

impl Writer {
    /// Encode `entries` and write them to `path`, replacing any existing
    /// content. Returns the number of bytes written, or `0` on failure
    /// (lock contention, I/O error, or a parent directory that still
    /// doesn't exist after the single mkdir retry).
    ///
    /// On any failure after the file was created, the partial file is
    /// unlinked so a later reader never sees a torn write.
    pub fn write<K: Codec, V: Codec>(path: &Path, entries: &[(K, V)], options: Options) -> usize {
        match Self::try_write(path, entries, options) {
            Ok(n) => n,
            Err(e) => {
                warn!(?path, error = %e, "map file write failed");
                0
            }
        }
    }

    fn try_write<K: Codec, V: Codec>(
        path: &Path,
        entries: &[(K, V)],
        options: Options,
    ) -> Result<usize> {
        let file = Self::open_for_write(path)?;
        let locked = !options.contains(Options::NO_LOCK);

        if locked && file.try_lock_exclusive().is_err() {
            debug!(?path, "write lock contended, someone else is writing");
            // The file was opened without truncating, so a contended
            // writer leaves any existing payload untouched.
            return Ok(0);
        }

        debug!(?path, "acquired write lock");

        let image = encode(entries);
        let result = Self::write_image(&file, &image);

        if let Err(e) = result {
            if locked {
                let _ = FileExt::unlock(&file);
            }
            drop(file);
            let _ = fs::remove_file(path);
            return Err(e);
        }

        debug!(?path, bytes = image.len(), "wrote map file");
        Ok(image.len())
    }

    fn write_image(file: &File, image: &[u8]) -> Result<()> {
        file.set_len(image.len() as u64)?;
        let mut writer = file;
        writer.write_all(image)?;
        Ok(())
    }

    /// Open (or create) `path` for writing, without truncating — the
    /// actual length is fixed up with `set_len` in [`Self::write_image`],
    /// after the lock is held. Truncating here would destroy an existing
    /// writer's payload before we even know whether we'll win the lock.
    fn open_for_write(path: &Path) -> Result<File> {
        match OpenOptions::new().read(true).write(true).create(true).open(path) {
            Ok(file) => Ok(file),
            Err(_) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .open(path)
                    .map_err(|e| crate::error::Error::Open {
                        path: path.to_path_buf(),
                        source: e,
                    })
            }
        }
    }
}
