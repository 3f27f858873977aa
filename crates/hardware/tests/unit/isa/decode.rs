//! # Decoder Tests
//!
//! Checks field extraction for every instruction format, with emphasis on
//! immediate reassembly and sign extension.

use proptest::prelude::*;
use socsim_core::isa::decode::decode;
use socsim_core::isa::privileged::opcodes::OP_SYSTEM;
use socsim_core::isa::rv32i::opcodes::*;

use crate::common::asm::*;

#[test]
fn i_type_fields_and_negative_immediate() {
    let d = decode(addi(5, 6, -3));
    assert_eq!(d.opcode, OP_IMM);
    assert_eq!(d.rd, 5);
    assert_eq!(d.rs1, 6);
    assert_eq!(d.imm, -3);
}

#[test]
fn s_type_immediate_is_reassembled() {
    let d = decode(sw(2, 3, -20));
    assert_eq!(d.opcode, OP_STORE);
    assert_eq!(d.rs1, 2);
    assert_eq!(d.rs2, 3);
    assert_eq!(d.imm, -20);
}

#[test]
fn u_type_keeps_upper_bits() {
    let d = decode(lui(1, 0xDEADC));
    assert_eq!(d.opcode, OP_LUI);
    assert_eq!(d.imm as u32, 0xDEAD_C000);
}

#[test]
fn csr_field_is_extracted() {
    let d = decode(csrrw(1, 0x305, 2));
    assert_eq!(d.opcode, OP_SYSTEM);
    assert_eq!(d.csr, 0x305);
    assert_eq!(d.rs1, 2);
}

proptest! {
    #[test]
    fn store_offsets_round_trip(offset in -2048i32..2048) {
        let d = decode(sw(1, 2, offset));
        prop_assert_eq!(d.opcode, OP_STORE);
        prop_assert_eq!(d.imm, offset);
    }

    #[test]
    fn branch_offsets_round_trip(half in -2048i32..2048) {
        let offset = half * 2;
        let d = decode(beq(1, 2, offset));
        prop_assert_eq!(d.opcode, OP_BRANCH);
        prop_assert_eq!(d.imm, offset);
    }

    #[test]
    fn jal_offsets_round_trip(half in -(1i32 << 19)..(1i32 << 19)) {
        let offset = half * 2;
        let d = decode(jal(1, offset));
        prop_assert_eq!(d.opcode, OP_JAL);
        prop_assert_eq!(d.imm, offset);
    }
}
