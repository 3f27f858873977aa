//! Instruction Planning.
//!
//! A single pure function turns the current architectural state plus the input
//! wires into a `Plan`: the output wires for this cycle and every write the core
//! would commit on the next rising edge. It performs the following:
//! 1. **Decode:** Splits the fetched word into its fields.
//! 2. **Execute:** Computes ALU results, branch targets and load/store lanes.
//! 3. **Trap Selection:** Runs the interrupt/trap controller; a trap suppresses
//!    every other side effect of the instruction, including the store.

use super::SingleCycleCore;
use super::csr::CsrOp;
use super::memory::{load_value, store_lanes};
use crate::common::DeviceSelect;
use crate::core::clint::{Clint, ClintInputs, ClintOutputs, TrapCsrs};
use crate::core::ports::{CoreInputs, CoreOutputs, MemoryBundle};
use crate::isa::decode::decode;
use crate::isa::instruction::Decoded;
use crate::isa::privileged::opcodes::{self as sys, OP_SYSTEM};
use crate::isa::rv32i::{funct3, funct7, opcodes};

/// Everything one instruction does, computed before anything is committed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plan {
    /// Output wires for this cycle.
    pub outputs: CoreOutputs,
    /// Raw instruction word.
    pub instruction: u32,
    /// PC after the instruction if no trap is taken.
    pub next_pc: u32,
    /// Destination register and value.
    pub writeback: Option<(usize, u32)>,
    /// CSR address and new value.
    pub csr_write: Option<(u32, u32)>,
    /// Decoder found no matching instruction.
    pub illegal: bool,
    /// Interrupt/trap controller result.
    pub trap: ClintOutputs,
}

impl SingleCycleCore {
    /// Computes the outputs and pending commit for the current instruction.
    pub(crate) fn plan(&self, inputs: &CoreInputs) -> Plan {
        let pc = self.pc;
        let d = decode(inputs.instruction);
        let mut plan = Plan {
            outputs: CoreOutputs {
                instruction_address: pc,
                ..CoreOutputs::default()
            },
            instruction: inputs.instruction,
            next_pc: pc.wrapping_add(4),
            ..Plan::default()
        };

        self.execute(&d, inputs, &mut plan);

        plan.outputs.device_select = DeviceSelect::from_address(plan.outputs.memory.address);
        plan.trap = Clint::evaluate(&ClintInputs {
            instruction: inputs.instruction,
            instruction_address: pc,
            interrupt_flag: inputs.interrupt_flag,
            csrs: TrapCsrs {
                mstatus: self.csrs.mstatus,
                mie: self.csrs.mie,
                mtvec: self.csrs.mtvec,
                mepc: self.csrs.mepc,
                mcause: self.csrs.mcause,
            },
        });
        if plan.trap.transition.enters_handler() {
            plan.outputs.memory.write_enable = false;
        }
        plan
    }

    fn execute(&self, d: &Decoded, inputs: &CoreInputs, plan: &mut Plan) {
        let pc = self.pc;
        let rs1 = self.gpr.read(d.rs1);
        let rs2 = self.gpr.read(d.rs2);
        let imm = d.imm as u32;

        match d.opcode {
            opcodes::OP_LUI => plan.writeback = Some((d.rd, imm)),
            opcodes::OP_AUIPC => plan.writeback = Some((d.rd, pc.wrapping_add(imm))),
            opcodes::OP_JAL => {
                plan.writeback = Some((d.rd, pc.wrapping_add(4)));
                plan.next_pc = pc.wrapping_add(imm);
            }
            opcodes::OP_JALR => {
                plan.writeback = Some((d.rd, pc.wrapping_add(4)));
                plan.next_pc = rs1.wrapping_add(imm) & !1;
            }
            opcodes::OP_BRANCH => match branch_taken(d.funct3, rs1, rs2) {
                Some(true) => plan.next_pc = pc.wrapping_add(imm),
                Some(false) => {}
                None => plan.illegal = true,
            },
            opcodes::OP_LOAD => {
                let address = rs1.wrapping_add(imm);
                plan.outputs.memory.address = address;
                match load_value(d.funct3, address, inputs.read_data) {
                    Some(value) => plan.writeback = Some((d.rd, value)),
                    None => plan.illegal = true,
                }
            }
            opcodes::OP_STORE => {
                let address = rs1.wrapping_add(imm);
                match store_lanes(d.funct3, address, rs2) {
                    Some((write_data, write_strobe)) => {
                        plan.outputs.memory = MemoryBundle {
                            address,
                            write_data,
                            write_enable: true,
                            write_strobe,
                        };
                    }
                    None => plan.illegal = true,
                }
            }
            opcodes::OP_IMM => match alu_imm(d, rs1, imm) {
                Some(value) => plan.writeback = Some((d.rd, value)),
                None => plan.illegal = true,
            },
            opcodes::OP_REG => match alu_reg(d, rs1, rs2) {
                Some(value) => plan.writeback = Some((d.rd, value)),
                None => plan.illegal = true,
            },
            opcodes::OP_MISC_MEM => {}
            OP_SYSTEM => self.execute_system(d, inputs, plan),
            _ => plan.illegal = true,
        }
    }

    fn execute_system(&self, d: &Decoded, inputs: &CoreInputs, plan: &mut Plan) {
        if d.funct3 == sys::PRIV {
            // ecall, ebreak and mret are carried out by the trap controller.
            if !matches!(d.raw, sys::ECALL | sys::EBREAK | sys::MRET | sys::WFI) {
                plan.illegal = true;
            }
            return;
        }
        let Some(op) = CsrOp::from_funct3(d.funct3) else {
            plan.illegal = true;
            return;
        };
        let source = if op.is_immediate() {
            d.rs1 as u32
        } else {
            self.gpr.read(d.rs1)
        };
        let old = self.csrs.read(d.csr, inputs.interrupt_flag);
        plan.writeback = Some((d.rd, old));
        plan.csr_write = op.target(d.csr, op.apply(old, source, d.rs1 != 0));
    }
}

fn branch_taken(f3: u32, a: u32, b: u32) -> Option<bool> {
    let taken = match f3 {
        funct3::BEQ => a == b,
        funct3::BNE => a != b,
        funct3::BLT => (a as i32) < (b as i32),
        funct3::BGE => (a as i32) >= (b as i32),
        funct3::BLTU => a < b,
        funct3::BGEU => a >= b,
        _ => return None,
    };
    Some(taken)
}

fn alu_imm(d: &Decoded, a: u32, imm: u32) -> Option<u32> {
    let shamt = imm & 0x1F;
    let value = match d.funct3 {
        funct3::ADD_SUB => a.wrapping_add(imm),
        funct3::SLT => u32::from((a as i32) < (imm as i32)),
        funct3::SLTU => u32::from(a < imm),
        funct3::XOR => a ^ imm,
        funct3::OR => a | imm,
        funct3::AND => a & imm,
        funct3::SLL if d.funct7 == funct7::DEFAULT => a << shamt,
        funct3::SRL_SRA if d.funct7 == funct7::DEFAULT => a >> shamt,
        funct3::SRL_SRA if d.funct7 == funct7::SUB_SRA => ((a as i32) >> shamt) as u32,
        _ => return None,
    };
    Some(value)
}

fn alu_reg(d: &Decoded, a: u32, b: u32) -> Option<u32> {
    let shamt = b & 0x1F;
    let value = match (d.funct7, d.funct3) {
        (funct7::DEFAULT, funct3::ADD_SUB) => a.wrapping_add(b),
        (funct7::SUB_SRA, funct3::ADD_SUB) => a.wrapping_sub(b),
        (funct7::DEFAULT, funct3::SLL) => a << shamt,
        (funct7::DEFAULT, funct3::SLT) => u32::from((a as i32) < (b as i32)),
        (funct7::DEFAULT, funct3::SLTU) => u32::from(a < b),
        (funct7::DEFAULT, funct3::XOR) => a ^ b,
        (funct7::DEFAULT, funct3::SRL_SRA) => a >> shamt,
        (funct7::SUB_SRA, funct3::SRL_SRA) => ((a as i32) >> shamt) as u32,
        (funct7::DEFAULT, funct3::OR) => a | b,
        (funct7::DEFAULT, funct3::AND) => a & b,
        _ => return None,
    };
    Some(value)
}
