//! Programmable interval timer.
//!
//! A free-running counter that advances once per CPU cycle while enabled and
//! raises the machine timer interrupt while it has reached the limit. The line
//! is level-triggered: software clears it by moving the limit (conventionally to
//! `0xFFFF_FFFF`) or by disabling the timer.
//!
//! # Memory Map
//!
//! * `0x04`: LIMIT (read/write)
//! * `0x08`: ENABLED (read/write, any non-zero value enables)

use crate::common::DeviceSelect;
use crate::common::constants::SELECT_TIMER;
use crate::core::clint::InterruptSource;
use crate::soc::traits::{IrqSignal, Peripheral, Trigger};

/// Offset of the limit register.
pub const TIMER_LIMIT: u32 = 0x04;
/// Offset of the enable register.
pub const TIMER_ENABLED: u32 = 0x08;

/// Timer device state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    limit: u32,
    enabled: bool,
    count: u32,
}

impl Timer {
    /// Creates a disabled timer with a zero limit.
    pub const fn new() -> Self {
        Self {
            limit: 0,
            enabled: false,
            count: 0,
        }
    }

    /// Current limit register value.
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether the timer is enabled.
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Cycles counted since the limit was last written.
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Whether the interrupt line is currently asserted.
    pub const fn interrupt_pending(&self) -> bool {
        self.enabled && self.count >= self.limit
    }
}

impl Peripheral for Timer {
    fn name(&self) -> &'static str {
        "TIMER"
    }

    fn device_select(&self) -> DeviceSelect {
        DeviceSelect(SELECT_TIMER)
    }

    fn read(&self, offset: u32) -> u32 {
        match offset {
            TIMER_LIMIT => self.limit,
            TIMER_ENABLED => u32::from(self.enabled),
            _ => 0,
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        match offset {
            TIMER_LIMIT => {
                self.limit = value;
                self.count = 0;
            }
            TIMER_ENABLED => self.enabled = value != 0,
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.enabled {
            self.count = self.count.wrapping_add(1);
        }
    }

    fn irq(&self) -> Option<IrqSignal> {
        Some(IrqSignal {
            line: InterruptSource::Timer.line(),
            trigger: Trigger::Level,
            asserted: self.interrupt_pending(),
        })
    }

    fn as_timer(&self) -> Option<&Timer> {
        Some(self)
    }
}
