//! Interrupt flag aggregation.
//!
//! Peripherals expose raw interrupt signals; the core consumes a single flag
//! vector. `InterruptLines` sits between them:
//! 1. **Level lines** follow their signal every cycle (the timer).
//! 2. **Edge lines** latch on a rising edge and stay set until the core takes
//!    the interrupt (UART receive).
//! 3. **Forced bits** are ORed in unconditionally; harnesses use them to
//!    inject interrupts without a device.

use crate::core::clint::InterruptSource;
use crate::soc::traits::{IrqSignal, Trigger};

/// Per-line interrupt state sampled once per CPU cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterruptLines {
    level: u32,
    latched: u32,
    previous: u32,
    forced: u32,
}

impl InterruptLines {
    /// Creates an idle set of lines.
    pub const fn new() -> Self {
        Self {
            level: 0,
            latched: 0,
            previous: 0,
            forced: 0,
        }
    }

    /// Samples the current peripheral signals.
    ///
    /// Lines wider than the flag vector are logged and dropped.
    pub fn sample<I>(&mut self, signals: I)
    where
        I: IntoIterator<Item = IrqSignal>,
    {
        let mut level = 0;
        let mut raw = 0;
        for signal in signals {
            let Some(bit) = 1u32.checked_shl(signal.line) else {
                tracing::warn!(line = signal.line, "interrupt line out of range; ignored");
                continue;
            };
            if !signal.asserted {
                continue;
            }
            raw |= bit;
            if signal.trigger == Trigger::Level {
                level |= bit;
            } else if self.previous & bit == 0 {
                self.latched |= bit;
            }
        }
        self.level = level;
        self.previous = raw;
    }

    /// Returns the flag vector presented to the core.
    pub const fn flag(&self) -> u32 {
        self.level | self.latched | self.forced
    }

    /// Clears the edge latch of a source the core has just taken.
    pub const fn acknowledge(&mut self, source: InterruptSource) {
        self.latched &= !source.flag();
    }

    /// Replaces the externally forced flag bits.
    pub const fn force(&mut self, mask: u32) {
        self.forced = mask;
    }

    /// Returns the externally forced flag bits.
    pub const fn forced(&self) -> u32 {
        self.forced
    }
}
