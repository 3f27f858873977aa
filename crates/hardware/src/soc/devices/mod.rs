//! Memory-Mapped IO Devices.
//!
//! This module contains the peripherals that own a device-select code: the
//! interval timer, the serial port and the VGA framebuffer controller.

/// Programmable interval timer driving the machine timer interrupt.
pub mod timer;

/// Minimal serial port with enable-gated transmit and interrupting receive.
pub mod uart;

/// VGA framebuffer controller with palette and pixel-clock scanout.
pub mod vga;

pub use timer::Timer;
pub use uart::Uart;
pub use vga::{PixelOutput, Vga, VgaTiming};

pub use crate::soc::traits::Peripheral;
