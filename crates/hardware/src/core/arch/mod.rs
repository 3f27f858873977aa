//! RISC-V architectural state.
//!
//! This module contains the architectural storage owned by a CPU core:
//! 1. **CSRs:** Machine-mode Control and Status Registers and their field masks.
//! 2. **GPRs:** The integer register file with `x0` hardwired to zero.

/// Control and Status Register (CSR) definitions and access logic.
pub mod csr;

/// General-Purpose Register file implementation.
pub mod gpr;
