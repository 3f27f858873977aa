//! System-on-Chip (SoC) Components.
//!
//! This module organizes everything on the far side of the CPU ports: the
//! system bus with its memory and peripherals, interrupt flag aggregation,
//! clock-domain crossing primitives and display sinks for VGA scanout.

/// Memory-mapped I/O device implementations.
pub mod devices;

/// Display sinks fed by the VGA scanout.
pub mod display;

/// System bus interconnect and routing.
pub mod interconnect;

/// Interrupt flag aggregation with level and edge semantics.
pub mod irq;

/// Word-addressed system memory.
pub mod memory;

/// Synchronizers and clock dividers.
pub mod sync;

/// Peripheral trait definitions for MMIO access.
pub mod traits;

pub use interconnect::SystemBus;
