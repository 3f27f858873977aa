//! Core processor implementation.
//!
//! This module contains the CPU side of the SoC: the port contract the driver
//! uses to talk to a core, the interrupt/trap controller, the architectural
//! register state and the single-cycle reference core.

/// Architecture-specific components (CSRs, integer register file).
pub mod arch;

/// Interrupt/trap controller selecting exception, interrupt, return or no-trap transitions.
pub mod clint;

/// Single-cycle reference core.
pub mod cpu;

/// Input/output wire bundles exchanged between the driver and a core.
pub mod ports;

use std::fmt;

use self::ports::{CoreInputs, CoreOutputs, EdgeReport};

pub use self::cpu::SingleCycleCore;

/// A synchronous CPU model driven by the clock-edge driver.
///
/// `eval` is the combinational half: it must not change any state and may be
/// called any number of times per step. `clock_edge` is the sequential half and
/// runs exactly once per rising edge of the CPU clock. Debug reads are
/// side-effect-free observers used for signatures and test harnesses.
pub trait CpuCore: fmt::Debug + Send {
    /// Computes the output wires for the given inputs from the current state.
    fn eval(&self, inputs: &CoreInputs) -> CoreOutputs;

    /// Commits one rising clock edge.
    fn clock_edge(&mut self, inputs: &CoreInputs) -> EdgeReport;

    /// Returns the address of the instruction the core wants fetched.
    fn instruction_address(&self) -> u32;

    /// Reads an integer register through the debug port.
    fn debug_read_register(&self, index: usize) -> u32;

    /// Reads a CSR through the debug port. Unknown addresses read 0.
    fn debug_read_csr(&self, address: u32) -> u32;
}
