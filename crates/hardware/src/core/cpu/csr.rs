//! Zicsr Read-Modify-Write Semantics.
//!
//! Every CSR instruction reads the old value into `rd` and computes a new value
//! from it. `csrrs`/`csrrc` (and their immediate forms) with a zero source do not
//! write at all, so they can read read-only registers without side effects.

use crate::core::arch::csr::is_read_only;
use crate::isa::privileged::opcodes as sys;

/// Operation selected by the `funct3` field of a CSR instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrOp {
    /// `csrrw` / `csrrwi`.
    ReadWrite {
        /// Source is the 5-bit `zimm` field rather than a register.
        immediate: bool,
    },
    /// `csrrs` / `csrrsi`.
    ReadSet {
        /// Source is the 5-bit `zimm` field rather than a register.
        immediate: bool,
    },
    /// `csrrc` / `csrrci`.
    ReadClear {
        /// Source is the 5-bit `zimm` field rather than a register.
        immediate: bool,
    },
}

impl CsrOp {
    /// Decodes the `funct3` field; `None` for non-CSR encodings.
    pub const fn from_funct3(f3: u32) -> Option<Self> {
        match f3 {
            sys::CSRRW => Some(Self::ReadWrite { immediate: false }),
            sys::CSRRS => Some(Self::ReadSet { immediate: false }),
            sys::CSRRC => Some(Self::ReadClear { immediate: false }),
            sys::CSRRWI => Some(Self::ReadWrite { immediate: true }),
            sys::CSRRSI => Some(Self::ReadSet { immediate: true }),
            sys::CSRRCI => Some(Self::ReadClear { immediate: true }),
            _ => None,
        }
    }

    /// Returns `true` for the immediate forms.
    pub const fn is_immediate(self) -> bool {
        match self {
            Self::ReadWrite { immediate }
            | Self::ReadSet { immediate }
            | Self::ReadClear { immediate } => immediate,
        }
    }

    /// Computes the value to write back, or `None` when no write happens.
    ///
    /// `source_nonzero` reflects the `rs1`/`zimm` field, not the register value.
    pub const fn apply(self, old: u32, source: u32, source_nonzero: bool) -> Option<u32> {
        match self {
            Self::ReadWrite { .. } => Some(source),
            Self::ReadSet { .. } if source_nonzero => Some(old | source),
            Self::ReadClear { .. } if source_nonzero => Some(old & !source),
            Self::ReadSet { .. } | Self::ReadClear { .. } => None,
        }
    }

    /// Filters a computed write against the register's access mode.
    pub fn target(self, csr: u32, value: Option<u32>) -> Option<(u32, u32)> {
        if is_read_only(csr) {
            if value.is_some() {
                tracing::debug!(csr, "write to read-only CSR ignored");
            }
            return None;
        }
        value.map(|v| (csr, v))
    }
}
