//! Simulation Statistics.
//!
//! This module tracks what happened during a run. It provides:
//! 1. **Driver Counters:** Time steps taken and CPU rising edges seen.
//! 2. **Core Counters:** Retired instructions and every trap-controller transition.
//! 3. **Traffic Counters:** Memory writes, MMIO reads/writes and presented frames.
//!
//! Counters are plain integers bumped by the driver; `print` logs a summary
//! through `tracing` once the run ends.

use std::time::Instant;

use serde::Serialize;

use crate::core::clint::TrapTransition;
use crate::core::ports::EdgeReport;

/// Counters collected by the clock-edge driver.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    /// Host time at which the run started.
    #[serde(skip)]
    pub start_time: Instant,

    /// Driver time steps.
    pub steps: u64,
    /// CPU rising edges outside reset.
    pub cycles: u64,
    /// Instructions retired.
    pub instructions_retired: u64,

    /// Exceptions taken (`ecall`, `ebreak`).
    pub exceptions: u64,
    /// Interrupts taken.
    pub interrupts: u64,
    /// `mret` redirects.
    pub trap_returns: u64,

    /// Stores committed to memory.
    pub memory_writes: u64,
    /// Loads routed to a peripheral.
    pub mmio_reads: u64,
    /// Stores routed to a peripheral.
    pub mmio_writes: u64,
    /// Frames presented to the display.
    pub frames_presented: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            steps: 0,
            cycles: 0,
            instructions_retired: 0,
            exceptions: 0,
            interrupts: 0,
            trap_returns: 0,
            memory_writes: 0,
            mmio_reads: 0,
            mmio_writes: 0,
            frames_presented: 0,
        }
    }
}

impl SimStats {
    /// Folds one rising-edge report into the counters.
    pub const fn record_edge(&mut self, report: &EdgeReport) {
        self.cycles += 1;
        if report.retired {
            self.instructions_retired += 1;
        }
        match report.transition {
            TrapTransition::Exception { .. } => self.exceptions += 1,
            TrapTransition::Interrupt { .. } => self.interrupts += 1,
            TrapTransition::Return => self.trap_returns += 1,
            TrapTransition::None => {}
        }
    }

    /// Logs a summary of the run.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };
        tracing::info!(
            host_seconds = seconds,
            steps = self.steps,
            cycles = self.cycles,
            sim_freq_khz = khz.round(),
            instructions = self.instructions_retired,
            "simulation summary"
        );
        tracing::info!(
            exceptions = self.exceptions,
            interrupts = self.interrupts,
            trap_returns = self.trap_returns,
            "trap activity"
        );
        tracing::info!(
            memory_writes = self.memory_writes,
            mmio_reads = self.mmio_reads,
            mmio_writes = self.mmio_writes,
            frames = self.frames_presented,
            "bus traffic"
        );
    }
}
