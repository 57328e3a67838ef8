//! Error types for map-file operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("could not open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt map file: {0}")]
    Corrupt(String),

    #[error("could not acquire exclusive lock on {0:?}")]
    LockContended(PathBuf),

    #[error("index {index} out of range (count is {count})")]
    OutOfRange { index: u32, count: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
