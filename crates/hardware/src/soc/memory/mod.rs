//! Word-addressed system memory.
//!
//! This module implements the flat memory behind device-select 0. It provides:
//! 1. **Storage:** A fixed-capacity vector of 32-bit words, zero-initialized.
//! 2. **Access:** Side-effect-free reads and byte-strobed writes by byte address.
//! 3. **Loading:** Bulk initialization from a program image.
//!
//! Out-of-range accesses are not faults: reads return 0 and writes are dropped,
//! so a speculative or buggy guest address never stops the host simulator.

use crate::common::constants::WORD_BYTES;
use crate::common::error::SimError;

/// Per-byte-lane write enables for one 32-bit word.
///
/// Lane 0 is the least significant byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WriteStrobe(pub [bool; 4]);

impl WriteStrobe {
    /// All four lanes enabled (word store).
    pub const ALL: Self = Self([true; 4]);

    /// No lanes enabled.
    pub const NONE: Self = Self([false; 4]);

    /// Builds a strobe from the low four bits of `bits` (bit `i` enables lane `i`).
    pub const fn from_bits(bits: u8) -> Self {
        Self([
            bits & 0b0001 != 0,
            bits & 0b0010 != 0,
            bits & 0b0100 != 0,
            bits & 0b1000 != 0,
        ])
    }

    /// Returns the strobe packed into the low four bits.
    pub fn bits(self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &on)| acc | (u8::from(on) << i))
    }

    /// Expands the strobe into a 32-bit byte mask.
    pub fn mask(self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .fold(0, |acc, (i, _)| acc | (0xFF << (i * 8)))
    }

    /// Returns `true` if any lane is enabled.
    pub fn any(self) -> bool {
        self.0.iter().any(|&on| on)
    }
}

/// Flat byte-addressable memory stored as 32-bit words.
#[derive(Clone, Debug)]
pub struct Memory {
    words: Vec<u32>,
}

impl Memory {
    /// Creates a zeroed memory with `capacity` words.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity],
        }
    }

    /// Returns the capacity in words.
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Returns the capacity in bytes.
    pub fn size_bytes(&self) -> usize {
        self.words.len() * WORD_BYTES as usize
    }

    #[inline]
    fn index(&self, addr: u32) -> Option<usize> {
        let idx = (addr >> 2) as usize;
        (idx < self.words.len()).then_some(idx)
    }

    /// Reads the word containing `addr`; returns 0 if it lies beyond capacity.
    #[inline]
    pub fn read(&self, addr: u32) -> u32 {
        self.index(addr).map_or(0, |idx| self.words[idx])
    }

    /// Writes the lanes of `data` selected by `strobe` into the word containing `addr`.
    ///
    /// Lanes with a clear strobe keep their previous value. Out-of-range writes are dropped.
    #[inline]
    pub fn write(&mut self, addr: u32, data: u32, strobe: WriteStrobe) {
        let Some(idx) = self.index(addr) else {
            tracing::trace!(addr, "dropped out-of-range write");
            return;
        };
        let mask = strobe.mask();
        self.words[idx] = (self.words[idx] & !mask) | (data & mask);
    }

    /// Copies a program image into memory starting at byte address `base_addr`.
    ///
    /// A trailing partial word is zero-padded.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ImageTooLarge`] when the image does not fit between
    /// `base_addr` and the end of memory.
    pub fn load(&mut self, bytes: &[u8], base_addr: u32) -> Result<(), SimError> {
        let available = self.size_bytes().saturating_sub(base_addr as usize);
        if bytes.len() > available {
            return Err(SimError::ImageTooLarge {
                size: bytes.len(),
                available,
            });
        }

        if base_addr % WORD_BYTES != 0 {
            for (i, byte) in bytes.iter().enumerate() {
                self.write_byte(base_addr + i as u32, *byte);
            }
            return Ok(());
        }

        for (i, chunk) in bytes.chunks(WORD_BYTES as usize).enumerate() {
            let mut lanes = [0u8; 4];
            lanes[..chunk.len()].copy_from_slice(chunk);
            let addr = base_addr + (i as u32) * WORD_BYTES;
            self.write(addr, u32::from_le_bytes(lanes), WriteStrobe::ALL);
        }
        Ok(())
    }

    /// Writes a single byte through the strobe path.
    pub fn write_byte(&mut self, addr: u32, value: u8) {
        let lane = addr & 3;
        self.write(
            addr & !3,
            u32::from(value) << (lane * 8),
            WriteStrobe::from_bits(1 << lane),
        );
    }

    /// Returns the backing words.
    pub fn as_words(&self) -> &[u32] {
        &self.words
    }
}
