//! Single-Cycle Reference Core.
//!
//! This module defines `SingleCycleCore`, the `CpuCore` implementation shipped with
//! the simulator. It coordinates the following:
//! 1. **State Management:** Holds the PC, the integer register file and the CSRs.
//! 2. **Combinational Evaluation:** `eval` derives the output wires from the current
//!    state and inputs without mutating anything.
//! 3. **Commit:** `clock_edge` retires one instruction per rising edge, or enters or
//!    leaves a trap handler as selected by the interrupt/trap controller.
//!
//! Both halves share one planning function, so the wires the driver routes always
//! agree with what the core commits.

/// Zicsr read-modify-write semantics.
pub mod csr;

/// Per-instruction planning: decode, execute and trap selection.
pub mod execution;

/// Load/store byte-lane handling.
pub mod memory;

use crate::common::constants::DEFAULT_LOAD_ADDRESS;
use crate::core::CpuCore;
use crate::core::arch::csr::Csrs;
use crate::core::arch::gpr::Gpr;
use crate::core::clint::TrapTransition;
use crate::core::ports::{CoreInputs, CoreOutputs, EdgeReport};

use self::execution::Plan;

/// RV32I + Zicsr core retiring one instruction per rising clock edge.
#[derive(Clone, Debug)]
pub struct SingleCycleCore {
    /// Program counter.
    pc: u32,
    /// PC loaded on reset.
    reset_vector: u32,
    /// Integer registers.
    gpr: Gpr,
    /// Control and Status Registers.
    csrs: Csrs,
    /// Interrupt flag vector sampled on the last edge, exposed through `mip`.
    pending: u32,
}

impl Default for SingleCycleCore {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_ADDRESS)
    }
}

impl SingleCycleCore {
    /// Creates a core that starts (and restarts on reset) at `reset_vector`.
    pub fn new(reset_vector: u32) -> Self {
        Self {
            pc: reset_vector,
            reset_vector,
            gpr: Gpr::new(),
            csrs: Csrs::default(),
            pending: 0,
        }
    }

    /// Returns the PC loaded on reset.
    pub const fn reset_vector(&self) -> u32 {
        self.reset_vector
    }

    /// Returns the integer register file.
    pub const fn gpr(&self) -> &Gpr {
        &self.gpr
    }

    /// Returns the CSR file.
    pub const fn csrs(&self) -> &Csrs {
        &self.csrs
    }

    /// Restores the power-on state; memory-mapped state is not touched.
    pub fn reset(&mut self) {
        self.pc = self.reset_vector;
        self.gpr = Gpr::new();
        self.csrs = Csrs::default();
        self.pending = 0;
    }

    fn commit(&mut self, plan: &Plan) -> EdgeReport {
        self.csrs.mcycle = self.csrs.mcycle.wrapping_add(1);

        let trap = plan.trap;
        if trap.transition.enters_handler() {
            tracing::debug!(
                pc = self.pc,
                transition = ?trap.transition,
                handler = trap.interrupt_handler_address,
                "entering trap handler"
            );
        } else {
            if let Some((rd, value)) = plan.writeback {
                self.gpr.write(rd, value);
            }
            if let Some((addr, value)) = plan.csr_write {
                self.csrs.write(addr, value);
            }
            if plan.illegal {
                tracing::warn!(
                    pc = self.pc,
                    instruction = plan.instruction,
                    "illegal instruction retired as no-op"
                );
            }
            self.csrs.minstret = self.csrs.minstret.wrapping_add(1);
        }

        if trap.direct_write_enable {
            self.csrs.mstatus = trap.csrs.mstatus;
            self.csrs.mepc = trap.csrs.mepc;
            self.csrs.mcause = trap.csrs.mcause;
        }
        if trap.interrupt_assert {
            if matches!(trap.transition, TrapTransition::Return) {
                tracing::debug!(target_pc = trap.interrupt_handler_address, "mret");
            }
            self.pc = trap.interrupt_handler_address;
        } else {
            self.pc = plan.next_pc;
        }

        EdgeReport {
            retired: !trap.transition.enters_handler(),
            transition: trap.transition,
        }
    }
}

impl CpuCore for SingleCycleCore {
    fn eval(&self, inputs: &CoreInputs) -> CoreOutputs {
        if inputs.reset {
            return CoreOutputs {
                instruction_address: self.reset_vector,
                ..CoreOutputs::default()
            };
        }
        if !inputs.instruction_valid {
            return CoreOutputs {
                instruction_address: self.pc,
                ..CoreOutputs::default()
            };
        }
        self.plan(inputs).outputs
    }

    fn clock_edge(&mut self, inputs: &CoreInputs) -> EdgeReport {
        if inputs.reset {
            self.reset();
            return EdgeReport::IDLE;
        }
        self.pending = inputs.interrupt_flag;
        if !inputs.instruction_valid {
            return EdgeReport::IDLE;
        }
        let plan = self.plan(inputs);
        self.commit(&plan)
    }

    fn instruction_address(&self) -> u32 {
        self.pc
    }

    fn debug_read_register(&self, index: usize) -> u32 {
        self.gpr.read(index)
    }

    fn debug_read_csr(&self, address: u32) -> u32 {
        self.csrs.read(address, self.pending)
    }
}
