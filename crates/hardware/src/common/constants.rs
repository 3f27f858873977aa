//! System-wide constants.
//!
//! Defines the MMIO address map shared by the core-side address decoder and the
//! driver-side dispatch, plus the program-loading and halt conventions of the
//! simulation harness.

/// Number of high address bits carrying the device-select tag.
pub const DEVICE_SELECT_BITS: u32 = 3;

/// Bit position of the device-select tag within an effective address.
pub const DEVICE_SHIFT: u32 = 32 - DEVICE_SELECT_BITS;

/// Mask applied to a CPU address before it is combined with the device-select tag.
pub const DEVICE_MASK: u32 = (1 << DEVICE_SHIFT) - 1;

/// Size in bytes of the register window owned by each peripheral (4 KiB).
pub const PERIPHERAL_WINDOW: u32 = 0x1000;

/// Mask extracting a register offset from an effective address.
pub const OFFSET_MASK: u32 = PERIPHERAL_WINDOW - 1;

/// Device-select code for plain memory.
pub const SELECT_MEMORY: u8 = 0;

/// Device-select code for the VGA framebuffer controller.
pub const SELECT_VGA: u8 = 1;

/// Device-select code for the UART.
pub const SELECT_UART: u8 = 2;

/// Device-select code for the timer.
pub const SELECT_TIMER: u8 = 3;

/// Canonical base address software uses for the VGA controller.
pub const VGA_BASE: u32 = 0x3000_0000;

/// Canonical base address software uses for the UART.
pub const UART_BASE: u32 = 0x4000_0000;

/// Canonical base address software uses for the timer.
pub const TIMER_BASE: u32 = 0x7000_0000;

/// Byte address at which flat program images are loaded.
pub const DEFAULT_LOAD_ADDRESS: u32 = 0x1000;

/// Magic value that, written to the halt address, stops the simulation.
pub const HALT_SENTINEL: u32 = 0xBABE_CAFE;

/// Size in bytes of one memory word.
pub const WORD_BYTES: u32 = 4;
