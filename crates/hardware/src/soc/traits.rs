//! Peripheral trait for memory-mapped I/O.
//!
//! This module defines the `Peripheral` trait implemented by every device that owns a
//! device-select code. It provides:
//! 1. **Identification:** `name` and the `device_select` code used for bus routing.
//! 2. **Access:** Word read/write at window-relative register offsets.
//! 3. **Lifecycle:** Optional `tick` once per CPU cycle and interrupt signalling.
//! 4. **Downcasting:** Optional casts to `Uart`, `Vga` or `Timer` for device-specific access.
//!
//! Register writes arrive only on a rising edge with write enable asserted, so
//! implementors are plain state cells. Reads must not change state: the driver
//! may sample the read-data path at any time.

use std::fmt;

use crate::common::DeviceSelect;
use crate::soc::devices::{Timer, Uart, Vga};

/// How an interrupt line is turned into a flag bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The flag follows the signal.
    Level,
    /// A rising edge of the signal sets a latch that holds until acknowledged.
    Edge,
}

/// Interrupt output of a peripheral, sampled once per CPU cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IrqSignal {
    /// Bit of the interrupt flag vector this signal drives.
    pub line: u32,
    /// Level or edge semantics.
    pub trigger: Trigger,
    /// Current signal value.
    pub asserted: bool,
}

/// Trait for memory-mapped peripherals attached to the system bus.
pub trait Peripheral: fmt::Debug + Send {
    /// Returns a short name for this device (e.g., `"UART0"`).
    fn name(&self) -> &'static str;
    /// Returns the device-select code this device answers to.
    fn device_select(&self) -> DeviceSelect;
    /// Reads the register at a word-aligned offset. Unmapped offsets read as 0.
    fn read(&self, offset: u32) -> u32;
    /// Writes the register at a word-aligned offset. Unmapped offsets are ignored.
    fn write(&mut self, offset: u32, value: u32);

    /// Advances device state by one CPU cycle.
    fn tick(&mut self) {}
    /// Returns the interrupt signal of this device, if it has one.
    fn irq(&self) -> Option<IrqSignal> {
        None
    }

    /// Returns a reference as `Uart` if this device is the UART; otherwise `None`.
    fn as_uart(&self) -> Option<&Uart> {
        None
    }
    /// Returns a mutable reference as `Uart` if this device is the UART; otherwise `None`.
    fn as_uart_mut(&mut self) -> Option<&mut Uart> {
        None
    }
    /// Returns a reference as `Vga` if this device is the VGA controller; otherwise `None`.
    fn as_vga(&self) -> Option<&Vga> {
        None
    }
    /// Returns a mutable reference as `Vga` if this device is the VGA controller; otherwise `None`.
    fn as_vga_mut(&mut self) -> Option<&mut Vga> {
        None
    }
    /// Returns a reference as `Timer` if this device is the timer; otherwise `None`.
    fn as_timer(&self) -> Option<&Timer> {
        None
    }
}
