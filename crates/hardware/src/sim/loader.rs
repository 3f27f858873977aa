//! Program Image Loader.
//!
//! This module turns a file on disk into memory contents. It performs:
//! 1. **Format detection:** Files starting with the ELF magic are parsed as ELF;
//!    anything else is treated as a flat raw binary.
//! 2. **ELF loading:** Every `PT_LOAD` segment is copied to its load address and the
//!    header's entry point becomes the reset vector.
//! 3. **Raw loading:** The blob is copied verbatim to the configured load address,
//!    with a trailing partial word zero-padded.

use std::fs;
use std::path::Path;

use object::{Object, ObjectSegment};

use crate::common::SimError;
use crate::common::constants::DEVICE_MASK;
use crate::soc::memory::Memory;

/// Magic bytes at the start of every ELF file.
pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// One contiguous chunk of the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Byte address of the first byte.
    pub address: u32,
    /// Contents.
    pub bytes: Vec<u8>,
}

/// A program image ready to be copied into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedImage {
    /// Segments in file order.
    pub segments: Vec<Segment>,
    /// Entry point, for ELF images.
    pub entry: Option<u32>,
    /// Complete file contents, kept for symbol lookup.
    pub raw: Vec<u8>,
}

impl LoadedImage {
    /// Returns `true` if the image was parsed as ELF.
    pub fn is_elf(&self) -> bool {
        self.raw.starts_with(&ELF_MAGIC)
    }

    /// Total bytes across all segments.
    pub fn size_bytes(&self) -> usize {
        self.segments.iter().map(|s| s.bytes.len()).sum()
    }

    /// Copies every segment into `memory`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ImageTooLarge` if a segment runs past the end of memory.
    pub fn install(&self, memory: &mut Memory) -> Result<(), SimError> {
        for segment in &self.segments {
            memory.load(&segment.bytes, segment.address)?;
        }
        Ok(())
    }
}

/// Reads the image at `path`.
///
/// # Arguments
///
/// * `path` - Program image, ELF or flat binary.
/// * `load_address` - Byte address of a flat binary; ignored for ELF.
///
/// # Errors
///
/// Returns `SimError::MissingImage` if the path does not exist, `SimError::Io`
/// if it cannot be read and `SimError::Elf` if an ELF file is malformed.
pub fn load_image(path: &Path, load_address: u32) -> Result<LoadedImage, SimError> {
    if !path.exists() {
        return Err(SimError::MissingImage(path.to_path_buf()));
    }
    let raw = fs::read(path).map_err(|e| SimError::io(path, e))?;

    let image = if raw.starts_with(&ELF_MAGIC) {
        let (segments, entry) = parse_elf(&raw).map_err(|e| SimError::Elf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        LoadedImage {
            segments,
            entry: Some(entry),
            raw,
        }
    } else {
        LoadedImage {
            segments: vec![Segment {
                address: load_address,
                bytes: raw.clone(),
            }],
            entry: None,
            raw,
        }
    };

    tracing::info!(
        path = %path.display(),
        elf = image.is_elf(),
        segments = image.segments.len(),
        bytes = image.size_bytes(),
        entry = ?image.entry,
        "loaded program image"
    );
    Ok(image)
}

fn parse_elf(bytes: &[u8]) -> object::Result<(Vec<Segment>, u32)> {
    let file = object::File::parse(bytes)?;
    let mut segments = Vec::new();
    for segment in file.segments() {
        let data = segment.data()?;
        if data.is_empty() {
            continue;
        }
        segments.push(Segment {
            address: (segment.address() as u32) & DEVICE_MASK,
            bytes: data.to_vec(),
        });
    }
    Ok((segments, file.entry() as u32))
}
