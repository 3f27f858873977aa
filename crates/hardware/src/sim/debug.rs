//! Out-of-band debug read port.
//!
//! The port borrows memory immutably, so it cannot disturb program-visible
//! state. Like the hardware port it models, a read is synchronous: the address
//! is latched first and the data only appears after the port's own clock.
//! Device-select bits are stripped the same way the loader strips them, so
//! addresses taken from a high-linked ELF resolve to the words it loaded.

use crate::common::constants::DEVICE_MASK;
use crate::soc::memory::Memory;

/// Read-only synchronous port into memory.
#[derive(Clone, Copy, Debug)]
pub struct MemoryDebugPort<'a> {
    memory: &'a Memory,
    address: u32,
    data: u32,
}

impl<'a> MemoryDebugPort<'a> {
    /// Attaches a port to `memory` with address and data latches cleared.
    pub const fn new(memory: &'a Memory) -> Self {
        Self {
            memory,
            address: 0,
            data: 0,
        }
    }

    /// Drives the read-address input.
    pub const fn set_address(&mut self, address: u32) {
        self.address = address;
    }

    /// Clocks the port, latching the word at the driven address.
    pub fn clock(&mut self) {
        self.data = self.memory.read(self.address & DEVICE_MASK);
    }

    /// Returns the read-data output latched on the last clock.
    pub const fn data(&self) -> u32 {
        self.data
    }

    /// Drives `address`, clocks once and returns the settled data.
    pub fn read_word(&mut self, address: u32) -> u32 {
        self.set_address(address);
        self.clock();
        self.data()
    }
}
