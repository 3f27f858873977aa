//! Device-select tags and effective addresses.
//!
//! The CPU presents a 32-bit address together with a small device-select tag.
//! The driver combines both into an *effective address*:
//! `(device_select << DEVICE_SHIFT) | (address & DEVICE_MASK)`.
//! Peripherals see only the low `OFFSET_MASK` bits of it, plain memory sees
//! the masked CPU address.

use std::fmt;

use super::constants::{
    DEVICE_MASK, DEVICE_SELECT_BITS, DEVICE_SHIFT, OFFSET_MASK, SELECT_MEMORY,
};

/// Small tag selecting which peripheral (or plain memory) owns an access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DeviceSelect(pub u8);

impl DeviceSelect {
    /// Tag for plain memory.
    pub const MEMORY: Self = Self(SELECT_MEMORY);

    /// Number of distinct tags representable in the select field.
    pub const COUNT: usize = 1 << DEVICE_SELECT_BITS;

    /// Derives the tag from the top address bits, as the core-side decoder does.
    #[inline]
    pub const fn from_address(address: u32) -> Self {
        Self((address >> DEVICE_SHIFT) as u8)
    }

    /// Returns the tag truncated to the width of the select field.
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 as usize) & (Self::COUNT - 1)
    }

    /// Returns `true` for the plain-memory tag.
    #[inline]
    pub const fn is_memory(self) -> bool {
        self.index() == SELECT_MEMORY as usize
    }
}

impl fmt::Display for DeviceSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sel{}", self.0)
    }
}

/// Address formed from a device-select tag and the low CPU address bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct EffectiveAddress(pub u32);

impl EffectiveAddress {
    /// Combines a device-select tag with a CPU address.
    #[inline]
    pub const fn new(select: DeviceSelect, address: u32) -> Self {
        Self(((select.index() as u32) << DEVICE_SHIFT) | (address & DEVICE_MASK))
    }

    /// Returns the device-select tag carried in the high bits.
    #[inline]
    pub const fn select(self) -> DeviceSelect {
        DeviceSelect::from_address(self.0)
    }

    /// Returns the register offset within a peripheral window.
    #[inline]
    pub const fn offset(self) -> u32 {
        self.0 & OFFSET_MASK
    }

    /// Returns the address with the device-select bits stripped, as seen by memory.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0 & DEVICE_MASK
    }

    /// Returns the underlying value.
    #[inline]
    pub const fn val(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EffectiveAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
