//! Common utilities and types used throughout the SoC simulator.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Address Types:** Device-select tags and effective-address decoding.
//! 2. **Constants:** The fixed MMIO address map, load address and halt sentinel.
//! 3. **Error Handling:** The `SimError` type for fatal configuration and I/O failures.

/// Device-select and effective-address types.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for fatal simulator conditions.
pub mod error;

pub use addr::{DeviceSelect, EffectiveAddress};
pub use error::SimError;
