//! Immediate assembly for the RV32I formats.
//!
//! Register and function fields sit at fixed positions; only the immediate
//! moves between formats, so that is the one thing this module works out per
//! opcode.

use crate::isa::instruction::{Decoded, InstructionBits};
use crate::isa::rv32i::opcodes;

/// Splits `inst` into a [`Decoded`].
///
/// Opcodes without an immediate (OP, SYSTEM, MISC-MEM, unknown) get `imm = 0`.
pub fn decode(inst: u32) -> Decoded {
    let imm = match inst.opcode() {
        opcodes::OP_IMM | opcodes::OP_LOAD | opcodes::OP_JALR => imm_i(inst),
        opcodes::OP_STORE => imm_s(inst),
        opcodes::OP_BRANCH => imm_b(inst),
        opcodes::OP_LUI | opcodes::OP_AUIPC => imm_u(inst),
        opcodes::OP_JAL => imm_j(inst),
        _ => 0,
    };

    Decoded {
        raw: inst,
        opcode: inst.opcode(),
        rd: inst.rd(),
        rs1: inst.rs1(),
        rs2: inst.rs2(),
        funct3: inst.funct3(),
        funct7: inst.funct7(),
        csr: inst.csr(),
        imm,
    }
}

/// Moves `width` bits starting at `from` down to bit `to`.
const fn bits(inst: u32, from: u32, width: u32, to: u32) -> u32 {
    ((inst >> from) & ((1 << width) - 1)) << to
}

/// Sign-extends from bit 31 of the instruction, which every format uses as
/// the immediate's sign.
const fn signed(inst: u32, magnitude: u32, sign_bit: u32) -> i32 {
    let sign = if inst & 0x8000_0000 != 0 { u32::MAX << sign_bit } else { 0 };
    (sign | magnitude) as i32
}

const fn imm_i(inst: u32) -> i32 {
    (inst as i32) >> 20
}

const fn imm_s(inst: u32) -> i32 {
    signed(inst, bits(inst, 25, 6, 5) | bits(inst, 7, 5, 0), 11)
}

const fn imm_b(inst: u32) -> i32 {
    let magnitude = bits(inst, 7, 1, 11) | bits(inst, 25, 6, 5) | bits(inst, 8, 4, 1);
    signed(inst, magnitude, 12)
}

const fn imm_u(inst: u32) -> i32 {
    (inst & 0xFFFF_F000) as i32
}

const fn imm_j(inst: u32) -> i32 {
    let magnitude = bits(inst, 12, 8, 12) | bits(inst, 20, 1, 11) | bits(inst, 21, 10, 1);
    signed(inst, magnitude, 20)
}
