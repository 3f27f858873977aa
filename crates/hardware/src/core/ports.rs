//! CPU core port contract.
//!
//! The driver talks to a core exclusively through these wire bundles:
//! 1. **Inputs:** Reset, the fetched instruction, the interrupt flag vector and
//!    the read-data wire sampled from last cycle's access.
//! 2. **Outputs:** The next instruction address, the device-select tag and the
//!    memory bundle (address, write data, write enable, byte strobes).
//! 3. **Edge Report:** What the core committed on a rising edge, so the driver can
//!    acknowledge edge-triggered interrupt sources and keep statistics.

use crate::common::{DeviceSelect, EffectiveAddress};
use crate::core::clint::{InterruptSource, TrapTransition};
use crate::soc::memory::WriteStrobe;

/// Input wires of a CPU core, sampled by `eval` and `clock_edge`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreInputs {
    /// Synchronous reset, active high.
    pub reset: bool,
    /// Instruction word fetched from `instruction_address`.
    pub instruction: u32,
    /// Whether `instruction` holds a valid fetch this cycle.
    pub instruction_valid: bool,
    /// Interrupt flag vector; bit 0 is the timer, bit 1 the external line.
    pub interrupt_flag: u32,
    /// Data returned by the previous cycle's memory or MMIO read.
    pub read_data: u32,
}

/// Memory-side output bundle of a CPU core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryBundle {
    /// Byte address of the access, including the device-select bits.
    pub address: u32,
    /// Store data, already shifted into its byte lanes.
    pub write_data: u32,
    /// Asserted for a store.
    pub write_enable: bool,
    /// Byte lanes written by the store.
    pub write_strobe: WriteStrobe,
}

/// Output wires of a CPU core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreOutputs {
    /// Address of the instruction the core is executing (its PC register).
    pub instruction_address: u32,
    /// Device selected by the data-side address decoder.
    pub device_select: DeviceSelect,
    /// Data-side memory bundle.
    pub memory: MemoryBundle,
}

impl CoreOutputs {
    /// Combines the device-select tag with the data address.
    pub const fn effective_address(&self) -> EffectiveAddress {
        EffectiveAddress::new(self.device_select, self.memory.address)
    }
}

/// Summary of what a core committed on one rising clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeReport {
    /// An instruction completed and its results were written back.
    pub retired: bool,
    /// Trap-controller transition taken on this edge.
    pub transition: TrapTransition,
}

impl EdgeReport {
    /// Report for an edge on which nothing was committed (reset, invalid fetch).
    pub const IDLE: Self = Self {
        retired: false,
        transition: TrapTransition::None,
    };

    /// Returns the interrupt source the core entered its handler for, if any.
    pub const fn taken_interrupt(&self) -> Option<InterruptSource> {
        match self.transition {
            TrapTransition::Interrupt { source } => Some(source),
            _ => None,
        }
    }
}
