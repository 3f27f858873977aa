//! Shared test infrastructure.

/// RV32I and Zicsr instruction encoders.
pub mod asm;

/// Simulator test harness.
pub mod harness;
