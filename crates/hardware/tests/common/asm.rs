//! Minimal RV32I + Zicsr assembler for test programs.
//!
//! Each helper returns one encoded instruction word. Immediates are taken as
//! `i32` and truncated to the field width.

use socsim_core::isa::privileged::opcodes::{self as sys, OP_SYSTEM};
use socsim_core::isa::rv32i::funct3;
use socsim_core::isa::rv32i::funct7;
use socsim_core::isa::rv32i::opcodes::*;

pub fn r_type(opcode: u32, rd: u32, f3: u32, rs1: u32, rs2: u32, f7: u32) -> u32 {
    (f7 << 25) | (rs2 << 20) | (rs1 << 15) | (f3 << 12) | (rd << 7) | opcode
}

pub fn i_type(opcode: u32, rd: u32, f3: u32, rs1: u32, imm: i32) -> u32 {
    (((imm as u32) & 0xFFF) << 20) | (rs1 << 15) | (f3 << 12) | (rd << 7) | opcode
}

pub fn s_type(f3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 5) & 0x7F) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (f3 << 12)
        | ((imm & 0x1F) << 7)
        | OP_STORE
}

pub fn b_type(f3: u32, rs1: u32, rs2: u32, offset: i32) -> u32 {
    let imm = offset as u32;
    (((imm >> 12) & 1) << 31)
        | (((imm >> 5) & 0x3F) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (f3 << 12)
        | (((imm >> 1) & 0xF) << 8)
        | (((imm >> 11) & 1) << 7)
        | OP_BRANCH
}

pub fn u_type(opcode: u32, rd: u32, upper: u32) -> u32 {
    (upper << 12) | (rd << 7) | opcode
}

pub fn j_type(rd: u32, offset: i32) -> u32 {
    let imm = offset as u32;
    (((imm >> 20) & 1) << 31)
        | (((imm >> 1) & 0x3FF) << 21)
        | (((imm >> 11) & 1) << 20)
        | (((imm >> 12) & 0xFF) << 12)
        | (rd << 7)
        | OP_JAL
}

pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_IMM, rd, funct3::ADD_SUB, rs1, imm)
}

pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(OP_REG, rd, funct3::ADD_SUB, rs1, rs2, funct7::DEFAULT)
}

pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(OP_REG, rd, funct3::ADD_SUB, rs1, rs2, funct7::SUB_SRA)
}

pub fn lui(rd: u32, upper: u32) -> u32 {
    u_type(OP_LUI, rd, upper)
}

pub fn lw(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_LOAD, rd, funct3::LW, rs1, imm)
}

pub fn lbu(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_LOAD, rd, funct3::LBU, rs1, imm)
}

pub fn sw(rs1: u32, rs2: u32, imm: i32) -> u32 {
    s_type(funct3::SW, rs1, rs2, imm)
}

pub fn sb(rs1: u32, rs2: u32, imm: i32) -> u32 {
    s_type(funct3::SB, rs1, rs2, imm)
}

pub fn beq(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(funct3::BEQ, rs1, rs2, offset)
}

pub fn bne(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(funct3::BNE, rs1, rs2, offset)
}

pub fn jal(rd: u32, offset: i32) -> u32 {
    j_type(rd, offset)
}

pub fn csrrw(rd: u32, csr: u32, rs1: u32) -> u32 {
    i_type(OP_SYSTEM, rd, sys::CSRRW, rs1, csr as i32)
}

pub fn csrrs(rd: u32, csr: u32, rs1: u32) -> u32 {
    i_type(OP_SYSTEM, rd, sys::CSRRS, rs1, csr as i32)
}

pub fn csrrsi(rd: u32, csr: u32, uimm: u32) -> u32 {
    i_type(OP_SYSTEM, rd, sys::CSRRSI, uimm, csr as i32)
}

pub fn csrr(rd: u32, csr: u32) -> u32 {
    csrrs(rd, csr, 0)
}

pub const fn ecall() -> u32 {
    sys::ECALL
}

pub const fn mret() -> u32 {
    sys::MRET
}

pub const fn nop() -> u32 {
    0x0000_0013
}

/// `li rd, value` as `lui` + `addi`, compensating for the sign of the low part.
pub fn li(rd: u32, value: u32) -> [u32; 2] {
    let low = ((value & 0xFFF) as i32) << 20 >> 20;
    let upper = value.wrapping_sub(low as u32) >> 12;
    [lui(rd, upper), addi(rd, rd, low)]
}
