//! Fatal simulator errors.
//!
//! Only conditions that prevent a simulation from starting, or an artifact from
//! being written, are errors. Guest misbehaviour (out-of-range addresses,
//! unknown CSRs, unrecognized interrupt bits) is logged and tolerated instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the simulator library.
#[derive(Debug, Error)]
pub enum SimError {
    /// The program image path does not exist.
    #[error("program image not found: {}", .0.display())]
    MissingImage(PathBuf),

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The image does not fit between the load address and the end of memory.
    #[error("image is too large ({size} bytes, memory has {available} bytes from the load address)")]
    ImageTooLarge {
        /// Image size in bytes.
        size: usize,
        /// Bytes available from the load address to the end of memory.
        available: usize,
    },

    /// The image looked like an ELF file but could not be parsed.
    #[error("failed to parse ELF image {}: {message}", .path.display())]
    Elf {
        /// File being parsed.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// The configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SimError {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
