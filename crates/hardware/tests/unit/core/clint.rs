//! # Interrupt/Trap Controller Tests
//!
//! Verifies the first-match priority order (exception, interrupt, return,
//! none) and the CSR values each transition produces.

use rstest::rstest;
use socsim_core::core::arch::csr::{MIE_MEIE, MIE_MTIE, MSTATUS_MIE, MSTATUS_MPIE};
use socsim_core::core::clint::{
    Clint, ClintInputs, EXTERNAL_FLAG, InterruptSource, TIMER_FLAG, TrapCsrs, TrapTransition,
};
use socsim_core::isa::privileged::cause;
use socsim_core::isa::privileged::opcodes::{EBREAK, ECALL, MRET};

const NOP: u32 = 0x0000_0013;
const HANDLER: u32 = 0x0000_1100;

fn inputs(instruction: u32, interrupt_flag: u32, mstatus: u32, mie: u32) -> ClintInputs {
    ClintInputs {
        instruction,
        instruction_address: 0x1024,
        interrupt_flag,
        csrs: TrapCsrs {
            mstatus,
            mie,
            mtvec: HANDLER,
            mepc: 0x2000,
            mcause: 0,
        },
    }
}

#[test]
fn exception_beats_pending_interrupt() {
    let out = Clint::evaluate(&inputs(ECALL, TIMER_FLAG, MSTATUS_MIE, MIE_MTIE));
    assert_eq!(
        out.transition,
        TrapTransition::Exception {
            cause: cause::exception::ENVIRONMENT_CALL_FROM_M_MODE
        }
    );
    assert_eq!(out.csrs.mcause, 11);
    assert_eq!(out.csrs.mepc, 0x1024);
    assert!(out.interrupt_assert);
    assert_eq!(out.interrupt_handler_address, HANDLER);
}

#[test]
fn ebreak_reports_breakpoint() {
    let out = Clint::evaluate(&inputs(EBREAK, 0, 0, 0));
    assert_eq!(out.csrs.mcause, cause::exception::BREAKPOINT);
}

#[test]
fn timer_interrupt_sets_interrupt_coded_cause() {
    let out = Clint::evaluate(&inputs(NOP, TIMER_FLAG, MSTATUS_MIE, MIE_MTIE));
    assert_eq!(
        out.transition,
        TrapTransition::Interrupt {
            source: InterruptSource::Timer
        }
    );
    assert_eq!(out.csrs.mcause, 0x8000_0007);
    assert_eq!(out.csrs.mepc, 0x1024);
    assert_eq!(out.csrs.mstatus & MSTATUS_MIE, 0);
    assert_eq!(out.csrs.mstatus & MSTATUS_MPIE, MSTATUS_MPIE);
}

#[test]
fn timer_is_checked_before_external() {
    let out = Clint::evaluate(&inputs(
        NOP,
        TIMER_FLAG | EXTERNAL_FLAG,
        MSTATUS_MIE,
        MIE_MTIE | MIE_MEIE,
    ));
    assert_eq!(out.csrs.mcause, cause::interrupt::MACHINE_TIMER);
}

#[test]
fn external_interrupt_when_timer_masked() {
    let out = Clint::evaluate(&inputs(
        NOP,
        TIMER_FLAG | EXTERNAL_FLAG,
        MSTATUS_MIE,
        MIE_MEIE,
    ));
    assert_eq!(out.csrs.mcause, cause::interrupt::MACHINE_EXTERNAL);
}

#[rstest]
#[case::global_disable(TIMER_FLAG, 0, MIE_MTIE)]
#[case::source_disable(TIMER_FLAG, MSTATUS_MIE, 0)]
#[case::no_flag(0, MSTATUS_MIE, MIE_MTIE)]
#[case::unknown_source(1 << 5, MSTATUS_MIE, MIE_MTIE | MIE_MEIE)]
fn interrupt_not_taken(#[case] flag: u32, #[case] mstatus: u32, #[case] mie: u32) {
    let out = Clint::evaluate(&inputs(NOP, flag, mstatus, mie));
    assert_eq!(out.transition, TrapTransition::None);
    assert!(!out.direct_write_enable);
    assert!(!out.interrupt_assert);
    assert_eq!(out.csrs.mstatus, mstatus);
}

#[test]
fn mret_redirects_to_mepc_without_touching_cause() {
    let out = Clint::evaluate(&inputs(MRET, 0, MSTATUS_MPIE, 0));
    assert_eq!(out.transition, TrapTransition::Return);
    assert_eq!(out.interrupt_handler_address, 0x2000);
    assert_eq!(out.csrs.mepc, 0x2000);
    assert_eq!(out.csrs.mcause, 0);
    assert_eq!(out.csrs.mstatus & MSTATUS_MIE, MSTATUS_MIE);
}

#[rstest]
#[case::enabled(MSTATUS_MIE)]
#[case::disabled(0)]
fn trap_then_mret_restores_global_enable(#[case] before: u32) {
    let trap = Clint::evaluate(&inputs(ECALL, 0, before, 0));
    assert_eq!(trap.csrs.mstatus & MSTATUS_MIE, 0);

    let mut ret_in = inputs(MRET, 0, trap.csrs.mstatus, 0);
    ret_in.csrs.mepc = trap.csrs.mepc;
    let ret = Clint::evaluate(&ret_in);
    assert_eq!(ret.csrs.mstatus & MSTATUS_MIE, before);
    assert_eq!(ret.interrupt_handler_address, 0x1024);
}

#[test]
fn mtvec_mode_bits_are_ignored_for_redirect() {
    let mut i = inputs(ECALL, 0, 0, 0);
    i.csrs.mtvec = HANDLER | 1;
    assert_eq!(Clint::evaluate(&i).interrupt_handler_address, HANDLER);
}

#[test]
fn classify_matches_evaluate() {
    let i = inputs(NOP, TIMER_FLAG, MSTATUS_MIE, MIE_MTIE);
    assert_eq!(Clint::classify(&i), Clint::evaluate(&i).transition);
}
