//! Compliance signature extraction.
//!
//! After a run halts, the signature region `[begin, end)` is read word by word
//! through the debug port and written as one 8-digit lowercase hex word per
//! line, the format reference-model comparison tooling expects.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::common::SimError;
use crate::common::constants::WORD_BYTES;
use crate::sim::debug::MemoryDebugPort;
use crate::soc::memory::Memory;

/// First byte of the fallback region used when the range is unknown.
pub const FALLBACK_BEGIN: u32 = 0x2000;

/// End (exclusive) of the fallback region.
pub const FALLBACK_END: u32 = 0x2400;

/// Closed-open byte range of a signature region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureRange {
    /// First byte address.
    pub begin: u32,
    /// End address (exclusive).
    pub end: u32,
}

impl SignatureRange {
    /// The documented fallback region.
    pub const FALLBACK: Self = Self {
        begin: FALLBACK_BEGIN,
        end: FALLBACK_END,
    };

    /// Builds a range from a symbol lookup result.
    ///
    /// `(0, 0)` means the lookup failed, and an inverted range cannot be
    /// walked; both fall back to [`Self::FALLBACK`] with a warning.
    pub fn resolve(begin: u32, end: u32) -> Self {
        if (begin == 0 && end == 0) || begin > end {
            tracing::warn!(
                begin,
                end,
                fallback_begin = FALLBACK_BEGIN,
                fallback_end = FALLBACK_END,
                "signature range unknown; using fallback"
            );
            return Self::FALLBACK;
        }
        Self { begin, end }
    }

    /// Word-aligned addresses covered by the range.
    pub fn addresses(self) -> impl Iterator<Item = u32> {
        (self.begin & !(WORD_BYTES - 1)..self.end).step_by(WORD_BYTES as usize)
    }

    /// Number of words in the range.
    pub fn words(self) -> usize {
        self.addresses().count()
    }
}

/// Reads the signature words through a debug port.
pub fn read_signature(memory: &Memory, range: SignatureRange) -> Vec<u32> {
    let mut port = MemoryDebugPort::new(memory);
    range.addresses().map(|addr| port.read_word(addr)).collect()
}

/// Writes the signature region of `memory` to `out`.
///
/// # Errors
///
/// Returns any error reported by the writer.
pub fn write_signature_to<W: Write>(
    memory: &Memory,
    range: SignatureRange,
    out: &mut W,
) -> std::io::Result<()> {
    for word in read_signature(memory, range) {
        writeln!(out, "{word:08x}")?;
    }
    Ok(())
}

/// Writes the signature region of `memory` to the file at `path`.
///
/// # Errors
///
/// Returns `SimError::Io` if the file cannot be created or written.
pub fn write_signature(memory: &Memory, range: SignatureRange, path: &Path) -> Result<(), SimError> {
    let file = File::create(path).map_err(|e| SimError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_signature_to(memory, range, &mut out).map_err(|e| SimError::io(path, e))?;
    out.flush().map_err(|e| SimError::io(path, e))?;
    tracing::info!(
        path = %path.display(),
        begin = range.begin,
        end = range.end,
        words = range.words(),
        "signature written"
    );
    Ok(())
}
