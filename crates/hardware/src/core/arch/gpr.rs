//! RISC-V General-Purpose Register File.
//!
//! This module implements the 32-entry integer register file of an RV32I core.
//! It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`).
//! 2. **Invariant Enforcement:** Ensures that register `x0` is hardwired to zero.
//! 3. **Debugging:** Provides a snapshot of the complete register state.

/// Number of integer registers.
pub const GPR_COUNT: usize = 32;

/// General-Purpose Register file.
///
/// Register `x0` is hardwired to zero and cannot be modified. Indices outside
/// `0..32` read as zero and ignore writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u32; GPR_COUNT],
}

impl Gpr {
    /// Creates a new register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; GPR_COUNT],
        }
    }

    /// Reads a general-purpose register value.
    ///
    /// Register `x0` always returns 0.
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 {
            0
        } else {
            self.regs.get(idx).copied().unwrap_or(0)
        }
    }

    /// Writes a value to a general-purpose register. Writes to `x0` are ignored.
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != 0
            && let Some(slot) = self.regs.get_mut(idx)
        {
            *slot = val;
        }
    }

    /// Returns a copy of all 32 registers, `x0` included.
    pub const fn snapshot(&self) -> [u32; GPR_COUNT] {
        self.regs
    }
}
