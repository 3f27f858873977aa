//! RISC-V Trap Cause Codes (RV32).
//!
//! Values written to `mcause`. Bit 31 distinguishes interrupts (1) from
//! exceptions (0); the low bits carry the code.

/// Interrupt bit of `mcause`.
pub const INTERRUPT_BIT: u32 = 0x8000_0000;

/// Mask selecting the cause code.
pub const CODE_MASK: u32 = 0x1F;

/// Interrupt definitions (MSB = 1).
pub mod interrupt {
    /// Machine timer interrupt.
    pub const MACHINE_TIMER: u32 = 0x8000_0007;

    /// Machine external interrupt.
    pub const MACHINE_EXTERNAL: u32 = 0x8000_000B;
}

/// Exception definitions (MSB = 0).
pub mod exception {
    /// Breakpoint (3).
    pub const BREAKPOINT: u32 = 3;

    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u32 = 11;
}
