//! Persistent, read-optimized, memory-mapped sorted map files.
//!
//! A map file is an immutable on-disk key/value table: a writer encodes a
//! fully populated, key-sorted mapping into a single file in one pass; any
//! number of reader processes then open that file concurrently, memory-map
//! it, and binary-search it without deserializing anything beyond the keys
//! they actually touch. Writers and readers coordinate through advisory
//! whole-file locks rather than any in-process synchronization, since the
//! intended deployment is many independent reader processes against a file
//! a separate indexer process rebuilds from scratch.
//!
//! There is no in-place update path. A writer always produces a fresh file;
//! once written and closed, the bytes of a map file never change.
//!
//! ```no_run
//! use mapfile::{Options, Reader, Writer};
//!
//! let entries = vec![(1u32, 10u32), (2, 20), (3, 30)];
//! Writer::write(std::path::Path::new("/tmp/symbols.map"), &entries, Options::NONE);
//!
//! let reader = Reader::<u32, u32>::open(std::path::Path::new("/tmp/symbols.map"), Options::NONE).unwrap();
//! assert_eq!(reader.value(&2).unwrap(), Some(20));
//! ```

pub mod codec;
pub mod encode;
pub mod error;
pub mod layout;
pub mod mmap;
pub mod options;
pub mod reader;
pub mod writer;

pub use codec::{Codec, Location};
pub use encode::encode;
pub use error::{Error, Result};
pub use mmap::{LockMode, MappedFile};
pub use options::Options;
pub use reader::{Reader, NOT_FOUND};
pub use writer::Writer;
