//! Simulation driver and its collaborators.
//!
//! This module ties the hardware model into a runnable simulation. It provides:
//! 1. **Driver:** The clock-edge loop that steps the core, bus and clock domains.
//! 2. **Loading:** Flat-binary and ELF program images.
//! 3. **Observation:** Debug ports, compliance signatures, symbol lookup and VCD tracing.

/// Read-only debug port into memory.
pub mod debug;

/// Program image loading.
pub mod loader;

/// Compliance signature extraction.
pub mod signature;

/// Clock-edge driver.
pub mod simulator;

/// ELF symbol lookup.
pub mod symbols;

/// Value Change Dump tracing.
pub mod vcd;

pub use simulator::{SimOutcome, SimReport, Simulator};
