//! # CSR Tests
//!
//! Covers register masking, the `mip` view of the interrupt flag, 64-bit
//! counter halves and the Zicsr read-modify-write helpers.

use socsim_core::core::arch::csr::{self, Csrs};
use socsim_core::core::cpu::csr::CsrOp;

#[test]
fn mstatus_keeps_only_implemented_bits_and_reports_mpp() {
    let mut csrs = Csrs::default();
    csrs.write(csr::MSTATUS, 0xFFFF_FFFF);
    assert_eq!(csrs.mstatus, csr::MSTATUS_MIE | csr::MSTATUS_MPIE);
    assert_eq!(
        csrs.read(csr::MSTATUS, 0),
        csr::MSTATUS_MIE | csr::MSTATUS_MPIE | csr::MSTATUS_MPP
    );
}

#[test]
fn mie_keeps_timer_and_external_enables() {
    let mut csrs = Csrs::default();
    csrs.write(csr::MIE, 0xFFFF_FFFF);
    assert_eq!(csrs.read(csr::MIE, 0), csr::MIE_MTIE | csr::MIE_MEIE);
}

#[test]
fn mip_reflects_pending_flags() {
    let csrs = Csrs::default();
    assert_eq!(csrs.read(csr::MIP, 0b10), 0b10);
}

#[test]
fn misa_reports_rv32i() {
    let csrs = Csrs::default();
    assert_eq!(csrs.read(csr::MISA, 0), csr::MISA_DEFAULT_RV32I);
}

#[test]
fn read_only_and_unknown_writes_are_ignored() {
    let mut csrs = Csrs::default();
    let before = csrs.clone();
    csrs.write(csr::CYCLE, 5);
    csrs.write(csr::MHARTID, 5);
    csrs.write(0x7C0, 5);
    assert_eq!(csrs, before);
    assert_eq!(csrs.read(0x7C0, 0), 0);
    assert!(csr::is_read_only(csr::CYCLE));
    assert!(!csr::is_read_only(csr::MSTATUS));
}

#[test]
fn counters_split_into_halves() {
    let mut csrs = Csrs::default();
    csrs.mcycle = 0x0000_0001_0000_0002;
    csrs.minstret = 0x0000_0003_0000_0004;
    assert_eq!(csrs.read(csr::CYCLE, 0), 2);
    assert_eq!(csrs.read(csr::CYCLEH, 0), 1);
    assert_eq!(csrs.read(csr::TIME, 0), 2);
    assert_eq!(csrs.read(csr::INSTRET, 0), 4);
    assert_eq!(csrs.read(csr::MINSTRETH, 0), 3);
    csrs.write(csr::MCYCLEH, 7);
    assert_eq!(csrs.mcycle, 0x0000_0007_0000_0002);
}

#[test]
fn csr_ops_follow_zicsr_write_suppression() {
    let rs = CsrOp::from_funct3(0b010).expect("csrrs");
    assert_eq!(rs.apply(0b1010, 0b0101, true), Some(0b1111));
    assert_eq!(rs.apply(0b1010, 0, false), None);

    let rc = CsrOp::from_funct3(0b011).expect("csrrc");
    assert_eq!(rc.apply(0b1111, 0b0101, true), Some(0b1010));

    let rw = CsrOp::from_funct3(0b001).expect("csrrw");
    assert_eq!(rw.apply(0xAAAA, 0, false), Some(0));

    let rwi = CsrOp::from_funct3(0b101).expect("csrrwi");
    assert!(rwi.is_immediate());
    assert!(CsrOp::from_funct3(0b100).is_none());
}

#[test]
fn csr_target_drops_read_only_destinations() {
    let rw = CsrOp::from_funct3(0b001).expect("csrrw");
    assert_eq!(rw.target(csr::MSCRATCH, Some(9)), Some((csr::MSCRATCH, 9)));
    assert_eq!(rw.target(csr::CYCLE, Some(9)), None);
    assert_eq!(rw.target(csr::MSCRATCH, None), None);
}
