//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the machine-mode CSR subsystem of an RV32I + Zicsr core. It provides:
//! 1. **Address Definitions:** Constants for the machine-mode and counter CSRs.
//! 2. **Field Masks:** Bitmasks for the status, interrupt-enable and ISA registers.
//! 3. **Register Storage:** The `Csrs` struct for maintaining architectural state.
//! 4. **Access Logic:** Read and write operations with per-register write masks.

/// Machine hardware thread ID CSR address.
pub const MHARTID: u32 = 0xF14;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;

/// Machine ISA register CSR address.
pub const MISA: u32 = 0x301;

/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;

/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;

/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;

/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;

/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;

/// Machine trap value register CSR address.
pub const MTVAL: u32 = 0x343;

/// Machine interrupt pending register CSR address.
pub const MIP: u32 = 0x344;

/// Machine cycle counter CSR address (low half).
pub const MCYCLE: u32 = 0xB00;

/// Machine instructions retired counter CSR address (low half).
pub const MINSTRET: u32 = 0xB02;

/// Machine cycle counter CSR address (high half).
pub const MCYCLEH: u32 = 0xB80;

/// Machine instructions retired counter CSR address (high half).
pub const MINSTRETH: u32 = 0xB82;

/// Cycle counter CSR address (read-only shadow of `mcycle`).
pub const CYCLE: u32 = 0xC00;

/// Real-time counter CSR address (read-only, tracks `mcycle`).
pub const TIME: u32 = 0xC01;

/// Instructions retired counter CSR address (read-only shadow of `minstret`).
pub const INSTRET: u32 = 0xC02;

/// High half of `cycle`.
pub const CYCLEH: u32 = 0xC80;

/// High half of `time`.
pub const TIMEH: u32 = 0xC81;

/// High half of `instret`.
pub const INSTRETH: u32 = 0xC82;

/// Machine interrupt enable bit in `mstatus` register.
pub const MSTATUS_MIE: u32 = 1 << 3;

/// Machine previous interrupt enable bit in `mstatus` register.
pub const MSTATUS_MPIE: u32 = 1 << 7;

/// Machine previous privilege field in `mstatus` register (hardwired to M-mode).
pub const MSTATUS_MPP: u32 = 3 << 11;

/// Bits of `mstatus` that software may change.
pub const MSTATUS_WRITABLE: u32 = MSTATUS_MIE | MSTATUS_MPIE;

/// Machine timer interrupt enable bit in `mie` register.
pub const MIE_MTIE: u32 = 1 << 7;

/// Machine external interrupt enable bit in `mie` register.
pub const MIE_MEIE: u32 = 1 << 11;

/// Bits of `mie` that software may change.
pub const MIE_WRITABLE: u32 = MIE_MTIE | MIE_MEIE;

/// Mode bits of `mtvec`; only direct mode is implemented.
pub const MTVEC_MODE_MASK: u32 = 0x3;

/// MISA extension bit for base integer instructions (I extension).
pub const MISA_EXT_I: u32 = 1 << 8;

/// MISA XLEN field value for 32-bit architecture.
pub const MISA_XLEN_32: u32 = 1 << 30;

/// Default `misa` value for RV32I.
pub const MISA_DEFAULT_RV32I: u32 = MISA_XLEN_32 | MISA_EXT_I;

/// Returns `true` if the CSR address lies in a read-only block (bits 11:10 = `0b11`).
pub const fn is_read_only(addr: u32) -> bool {
    (addr >> 10) & 0x3 == 0x3
}

/// Control and Status Register file.
///
/// Contains the machine-level CSRs that control interrupt handling plus the
/// 64-bit cycle and retired-instruction counters. `mip` is not stored here: it
/// is a read-only view of the interrupt flag wire and is supplied by the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Csrs {
    /// Machine status register.
    pub mstatus: u32,
    /// Machine ISA register.
    pub misa: u32,
    /// Machine interrupt enable.
    pub mie: u32,
    /// Machine trap vector base address.
    pub mtvec: u32,
    /// Machine scratch register.
    pub mscratch: u32,
    /// Machine exception program counter.
    pub mepc: u32,
    /// Machine trap cause.
    pub mcause: u32,
    /// Machine trap value.
    pub mtval: u32,
    /// Machine cycle counter.
    pub mcycle: u64,
    /// Machine instructions retired counter.
    pub minstret: u64,
}

impl Default for Csrs {
    fn default() -> Self {
        Self {
            mstatus: 0,
            misa: MISA_DEFAULT_RV32I,
            mie: 0,
            mtvec: 0,
            mscratch: 0,
            mepc: 0,
            mcause: 0,
            mtval: 0,
            mcycle: 0,
            minstret: 0,
        }
    }
}

impl Csrs {
    /// Reads a CSR value by its address.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    /// * `pending` - Current interrupt flag vector, returned for `mip`.
    ///
    /// # Returns
    ///
    /// The 32-bit register value, or 0 if the address is not recognized.
    pub const fn read(&self, addr: u32, pending: u32) -> u32 {
        match addr {
            MSTATUS => self.mstatus | MSTATUS_MPP,
            MISA => self.misa,
            MIE => self.mie,
            MTVEC => self.mtvec,
            MSCRATCH => self.mscratch,
            MEPC => self.mepc,
            MCAUSE => self.mcause,
            MTVAL => self.mtval,
            MIP => pending,
            MCYCLE | CYCLE | TIME => self.mcycle as u32,
            MCYCLEH | CYCLEH | TIMEH => (self.mcycle >> 32) as u32,
            MINSTRET | INSTRET => self.minstret as u32,
            MINSTRETH | INSTRETH => (self.minstret >> 32) as u32,
            _ => 0,
        }
    }

    /// Writes a value to a CSR by its address.
    ///
    /// Read-only registers, `mip`, `misa` and unknown addresses ignore the
    /// write. `mstatus` and `mie` keep only their implemented bits.
    pub fn write(&mut self, addr: u32, val: u32) {
        match addr {
            MSTATUS => self.mstatus = val & MSTATUS_WRITABLE,
            MIE => self.mie = val & MIE_WRITABLE,
            MTVEC => self.mtvec = val & !MTVEC_MODE_MASK,
            MSCRATCH => self.mscratch = val,
            MEPC => self.mepc = val & !0x3,
            MCAUSE => self.mcause = val,
            MTVAL => self.mtval = val,
            MCYCLE => self.mcycle = (self.mcycle & !0xFFFF_FFFF) | u64::from(val),
            MCYCLEH => self.mcycle = (self.mcycle & 0xFFFF_FFFF) | (u64::from(val) << 32),
            MINSTRET => self.minstret = (self.minstret & !0xFFFF_FFFF) | u64::from(val),
            MINSTRETH => {
                self.minstret = (self.minstret & 0xFFFF_FFFF) | (u64::from(val) << 32);
            }
            _ => {
                tracing::trace!(csr = addr, "write to unimplemented or read-only CSR ignored");
            }
        }
    }

    /// Returns `true` when `mstatus.MIE` is set.
    pub const fn global_interrupt_enable(&self) -> bool {
        self.mstatus & MSTATUS_MIE != 0
    }
}
