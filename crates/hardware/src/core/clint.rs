//! Core-Local Interrupt/Trap Controller.
//!
//! The controller is purely combinational: every cycle it looks at the current
//! instruction, the interrupt flag vector and a snapshot of the trap CSRs, and
//! selects exactly one transition:
//! 1. **Exception:** `ecall` or `ebreak` is executing.
//! 2. **Interrupt:** a flag bit is set, `mstatus.MIE` is set and the matching `mie` bit is set.
//! 3. **Return:** `mret` is executing.
//! 4. **None:** CSR outputs pass through and no redirect is asserted.
//!
//! The order above is the priority order. It is encoded as an ordered list of
//! guards evaluated first-match, so the priority is data rather than control flow.
//! Committing the CSR writes and the PC redirect is the caller's job; it must do so
//! only when `direct_write_enable` / `interrupt_assert` are set.

use std::fmt;

use crate::core::arch::csr::{MIE_MEIE, MIE_MTIE, MSTATUS_MIE, MSTATUS_MPIE, MTVEC_MODE_MASK};
use crate::isa::privileged::cause::{exception, interrupt};
use crate::isa::privileged::opcodes::{EBREAK, ECALL, MRET};

/// Flag bit driven by the timer.
pub const TIMER_FLAG: u32 = 1 << 0;

/// Flag bit driven by external sources (UART receive).
pub const EXTERNAL_FLAG: u32 = 1 << 1;

/// Trap-related CSR values, as read by or written from the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrapCsrs {
    /// `mstatus` value.
    pub mstatus: u32,
    /// `mie` value.
    pub mie: u32,
    /// `mtvec` value.
    pub mtvec: u32,
    /// `mepc` value.
    pub mepc: u32,
    /// `mcause` value.
    pub mcause: u32,
}

/// Combinational inputs of the controller for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClintInputs {
    /// Instruction currently executing.
    pub instruction: u32,
    /// Address of the instruction currently executing.
    pub instruction_address: u32,
    /// Interrupt flag vector.
    pub interrupt_flag: u32,
    /// Current trap CSR values.
    pub csrs: TrapCsrs,
}

/// Interrupt sources known to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterruptSource {
    /// Machine timer, flag bit 0.
    Timer,
    /// Machine external interrupt, flag bit 1.
    External,
}

impl InterruptSource {
    /// Sources in the order they are checked.
    pub const PRIORITY: [Self; 2] = [Self::Timer, Self::External];

    /// Bit of the interrupt flag vector driven by this source.
    pub const fn flag(self) -> u32 {
        match self {
            Self::Timer => TIMER_FLAG,
            Self::External => EXTERNAL_FLAG,
        }
    }

    /// Flag line index (bit position) of this source.
    pub const fn line(self) -> u32 {
        self.flag().trailing_zeros()
    }

    /// `mie` bit gating this source.
    pub const fn enable_mask(self) -> u32 {
        match self {
            Self::Timer => MIE_MTIE,
            Self::External => MIE_MEIE,
        }
    }

    /// Value written to `mcause` when this source is taken.
    pub const fn cause(self) -> u32 {
        match self {
            Self::Timer => interrupt::MACHINE_TIMER,
            Self::External => interrupt::MACHINE_EXTERNAL,
        }
    }
}

impl fmt::Display for InterruptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer => write!(f, "timer"),
            Self::External => write!(f, "external"),
        }
    }
}

/// The transition selected by the controller for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrapTransition {
    /// Synchronous exception with the given `mcause` code.
    Exception {
        /// Exception code written to `mcause`.
        cause: u32,
    },
    /// Asynchronous interrupt from `source`.
    Interrupt {
        /// Interrupt source being taken.
        source: InterruptSource,
    },
    /// `mret`: return from the trap handler.
    Return,
    /// No trap activity this cycle.
    #[default]
    None,
}

impl TrapTransition {
    /// Returns `true` when the transition enters a trap handler.
    pub const fn enters_handler(self) -> bool {
        matches!(self, Self::Exception { .. } | Self::Interrupt { .. })
    }
}

/// Outputs of the controller for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClintOutputs {
    /// Selected transition.
    pub transition: TrapTransition,
    /// Values the CSRs must hold after this cycle commits.
    pub csrs: TrapCsrs,
    /// Asserted when `csrs` differs from the inputs and must be written back.
    pub direct_write_enable: bool,
    /// Asserted when the PC must be redirected to `interrupt_handler_address`.
    pub interrupt_assert: bool,
    /// Redirect target: the handler base for traps, `mepc` for `mret`.
    pub interrupt_handler_address: u32,
}

type Guard = fn(&ClintInputs) -> Option<TrapTransition>;

/// Guards in priority order; the first one that fires wins.
const GUARDS: [Guard; 3] = [exception_guard, interrupt_guard, return_guard];

/// Stateless interrupt/trap controller.
#[derive(Clone, Copy, Debug, Default)]
pub struct Clint;

impl Clint {
    /// Selects the transition for this cycle.
    pub fn classify(inputs: &ClintInputs) -> TrapTransition {
        GUARDS
            .iter()
            .find_map(|guard| guard(inputs))
            .unwrap_or_default()
    }

    /// Evaluates the controller for one cycle.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Current instruction, interrupt flags and trap CSRs.
    ///
    /// # Returns
    ///
    /// The selected transition together with the CSR values and redirect that the
    /// caller commits on the next rising edge.
    pub fn evaluate(inputs: &ClintInputs) -> ClintOutputs {
        let transition = Self::classify(inputs);
        let current = inputs.csrs;
        match transition {
            TrapTransition::Exception { cause } => Self::enter(inputs, transition, cause),
            TrapTransition::Interrupt { source } => {
                Self::enter(inputs, transition, source.cause())
            }
            TrapTransition::Return => {
                let mie = if current.mstatus & MSTATUS_MPIE == 0 {
                    0
                } else {
                    MSTATUS_MIE
                };
                ClintOutputs {
                    transition,
                    csrs: TrapCsrs {
                        mstatus: (current.mstatus & !MSTATUS_MIE) | mie,
                        ..current
                    },
                    direct_write_enable: true,
                    interrupt_assert: true,
                    interrupt_handler_address: current.mepc,
                }
            }
            TrapTransition::None => ClintOutputs {
                transition,
                csrs: current,
                direct_write_enable: false,
                interrupt_assert: false,
                interrupt_handler_address: 0,
            },
        }
    }

    /// Shared CSR update for exceptions and interrupts.
    fn enter(inputs: &ClintInputs, transition: TrapTransition, mcause: u32) -> ClintOutputs {
        let current = inputs.csrs;
        let mpie = if current.mstatus & MSTATUS_MIE == 0 {
            0
        } else {
            MSTATUS_MPIE
        };
        let mstatus = (current.mstatus & !(MSTATUS_MIE | MSTATUS_MPIE)) | mpie;
        ClintOutputs {
            transition,
            csrs: TrapCsrs {
                mstatus,
                mepc: inputs.instruction_address,
                mcause,
                ..current
            },
            direct_write_enable: true,
            interrupt_assert: true,
            interrupt_handler_address: current.mtvec & !MTVEC_MODE_MASK,
        }
    }
}

fn exception_guard(inputs: &ClintInputs) -> Option<TrapTransition> {
    match inputs.instruction {
        ECALL => Some(TrapTransition::Exception {
            cause: exception::ENVIRONMENT_CALL_FROM_M_MODE,
        }),
        EBREAK => Some(TrapTransition::Exception {
            cause: exception::BREAKPOINT,
        }),
        _ => None,
    }
}

fn interrupt_guard(inputs: &ClintInputs) -> Option<TrapTransition> {
    let flag = inputs.interrupt_flag;
    if flag == 0 || inputs.csrs.mstatus & MSTATUS_MIE == 0 {
        return None;
    }
    let taken = InterruptSource::PRIORITY
        .into_iter()
        .find(|source| flag & source.flag() != 0 && inputs.csrs.mie & source.enable_mask() != 0);
    if taken.is_none() {
        let known = TIMER_FLAG | EXTERNAL_FLAG;
        if flag & !known != 0 {
            tracing::warn!(flag, "interrupt flag carries an unknown source; ignored");
        }
    }
    taken.map(|source| TrapTransition::Interrupt { source })
}

fn return_guard(inputs: &ClintInputs) -> Option<TrapTransition> {
    (inputs.instruction == MRET).then_some(TrapTransition::Return)
}
