//! RV32I system-on-chip simulator library.
//!
//! This crate implements a cycle-driven functional simulator for a small RISC-V SoC:
//! 1. **Core:** A port contract for CPU models, the interrupt/trap controller and a
//!    single-cycle RV32I + Zicsr reference core.
//! 2. **Memory:** Flat word memory with byte write strobes and clamp/drop bounds handling.
//! 3. **SoC:** Device-select routing to a timer, UART and VGA controller, interrupt lines,
//!    clock dividers and cross-domain synchronizers.
//! 4. **Simulation:** The clock-edge driver, program loading, debug ports, compliance
//!    signatures and VCD tracing.
//! 5. **Support:** Configuration, error types and run statistics.

/// Common types and constants (device selects, address map, errors).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// CPU port contract, trap controller and reference core.
pub mod core;
/// Instruction set (decode, field layout, RV32I and privileged encodings).
pub mod isa;
/// Clock-edge driver, loader, debug ports, signatures and tracing.
pub mod sim;
/// System-on-chip (bus, devices, memory, interrupt lines, clock domains).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Fatal simulator error.
pub use crate::common::SimError;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// CPU port contract and the reference core implementing it.
pub use crate::core::{CpuCore, SingleCycleCore};
/// Clock-edge driver and its run report.
pub use crate::sim::{SimOutcome, SimReport, Simulator};
/// System bus owning memory and peripherals.
pub use crate::soc::SystemBus;
