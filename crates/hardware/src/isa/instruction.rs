//! Field views over a raw 32-bit instruction word.

/// Fixed-position fields shared by every base instruction format.
pub trait InstructionBits {
    /// Major opcode, bits 6..0.
    fn opcode(&self) -> u32;
    /// Destination register, bits 11..7.
    fn rd(&self) -> usize;
    /// First source register, bits 19..15.
    fn rs1(&self) -> usize;
    /// Second source register, bits 24..20.
    fn rs2(&self) -> usize;
    /// Minor opcode, bits 14..12.
    fn funct3(&self) -> u32;
    /// Bits 31..25; bit 5 selects SUB and SRA.
    fn funct7(&self) -> u32;
    /// CSR number, bits 31..20.
    fn csr(&self) -> u32;
}

const fn field(word: u32, lsb: u32, width: u32) -> u32 {
    (word >> lsb) & ((1 << width) - 1)
}

impl InstructionBits for u32 {
    #[inline]
    fn opcode(&self) -> u32 {
        field(*self, 0, 7)
    }

    #[inline]
    fn rd(&self) -> usize {
        field(*self, 7, 5) as usize
    }

    #[inline]
    fn rs1(&self) -> usize {
        field(*self, 15, 5) as usize
    }

    #[inline]
    fn rs2(&self) -> usize {
        field(*self, 20, 5) as usize
    }

    #[inline]
    fn funct3(&self) -> u32 {
        field(*self, 12, 3)
    }

    #[inline]
    fn funct7(&self) -> u32 {
        field(*self, 25, 7)
    }

    #[inline]
    fn csr(&self) -> u32 {
        field(*self, 20, 12)
    }
}

/// An instruction split into its fields, with the immediate already
/// assembled and sign-extended for its format.
#[derive(Clone, Debug, Default)]
pub struct Decoded {
    /// Undecoded word.
    pub raw: u32,
    /// Major opcode.
    pub opcode: u32,
    /// Destination register.
    pub rd: usize,
    /// First source register.
    pub rs1: usize,
    /// Second source register.
    pub rs2: usize,
    /// Minor opcode.
    pub funct3: u32,
    /// Upper function bits.
    pub funct7: u32,
    /// CSR number; only meaningful for SYSTEM.
    pub csr: u32,
    /// Immediate, zero for formats without one.
    pub imm: i32,
}
