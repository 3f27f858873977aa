//! RISC-V Privileged Architecture.
//!
//! Machine-mode only: system instruction encodings and `mcause` values.

/// Trap cause codes written to `mcause`.
pub mod cause;

/// System instruction encodings and CSR function codes.
pub mod opcodes;
