//! System interconnect for memory and MMIO access.
//!
//! This module implements the bus that routes effective addresses to their owner. It provides:
//! 1. **Device registration:** Peripherals register under their device-select code; a code
//!    can be owned by at most one device.
//! 2. **Access routing:** A matching select goes to that peripheral's register window, anything
//!    else falls through to memory with the select bits stripped. A write reaches exactly one
//!    target, so an MMIO store never aliases into memory.
//! 3. **Tick and IRQ:** Every peripheral is ticked once per CPU cycle and its interrupt signal
//!    is collected for the interrupt lines.

use crate::common::constants::WORD_BYTES;
use crate::common::{DeviceSelect, EffectiveAddress};
use crate::soc::devices::{Peripheral, Timer, Uart, Vga};
use crate::soc::memory::{Memory, WriteStrobe};
use crate::soc::traits::IrqSignal;

/// Target of one bus access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Plain memory at the masked byte address.
    Memory {
        /// Byte address with the device-select bits stripped.
        address: u32,
    },
    /// A registered peripheral.
    Peripheral {
        /// Index into the peripheral list.
        index: usize,
        /// Word-aligned register offset within the device window.
        offset: u32,
    },
}

/// System bus owning memory and all peripherals.
#[derive(Debug)]
pub struct SystemBus {
    memory: Memory,
    peripherals: Vec<Box<dyn Peripheral>>,
    by_select: [Option<usize>; DeviceSelect::COUNT],
}

impl SystemBus {
    /// Creates a bus with the given memory and no peripherals.
    pub fn new(memory: Memory) -> Self {
        Self {
            memory,
            peripherals: Vec::new(),
            by_select: [None; DeviceSelect::COUNT],
        }
    }

    /// Registers a peripheral under its device-select code.
    ///
    /// The memory code and codes that already have an owner are refused: the
    /// device is dropped with a warning and the existing map is left untouched.
    ///
    /// # Returns
    ///
    /// `true` if the device was registered.
    pub fn add_peripheral(&mut self, device: Box<dyn Peripheral>) -> bool {
        let select = device.device_select();
        if select.is_memory() {
            tracing::warn!(device = device.name(), "device-select 0 belongs to memory; device not attached");
            return false;
        }
        if let Some(existing) = self.by_select[select.index()] {
            tracing::warn!(
                device = device.name(),
                owner = self.peripherals[existing].name(),
                %select,
                "device-select already owned; device not attached"
            );
            return false;
        }
        tracing::debug!(device = device.name(), %select, "attached peripheral");
        self.by_select[select.index()] = Some(self.peripherals.len());
        self.peripherals.push(device);
        true
    }

    /// Decides which target owns an effective address.
    pub fn route(&self, address: EffectiveAddress) -> Route {
        match self.by_select[address.select().index()] {
            Some(index) => Route::Peripheral {
                index,
                offset: address.offset() & !(WORD_BYTES - 1),
            },
            None => Route::Memory {
                address: address.raw(),
            },
        }
    }

    /// Reads the word at an effective address without side effects.
    pub fn read(&self, address: EffectiveAddress) -> u32 {
        match self.route(address) {
            Route::Memory { address } => self.memory.read(address),
            Route::Peripheral { index, offset } => self
                .peripherals
                .get(index)
                .map_or(0, |device| device.read(offset)),
        }
    }

    /// Commits a write to exactly one target.
    ///
    /// Peripherals receive the whole word and ignore the strobe; memory honors it.
    ///
    /// # Returns
    ///
    /// The route the write took.
    pub fn write(&mut self, address: EffectiveAddress, data: u32, strobe: WriteStrobe) -> Route {
        let route = self.route(address);
        match route {
            Route::Memory { address } => self.memory.write(address, data, strobe),
            Route::Peripheral { index, offset } => {
                if let Some(device) = self.peripherals.get_mut(index) {
                    device.write(offset, data);
                }
            }
        }
        route
    }

    /// Advances every peripheral by one CPU cycle.
    pub fn tick(&mut self) {
        for device in &mut self.peripherals {
            device.tick();
        }
    }

    /// Interrupt signals of all peripherals that have one.
    pub fn irq_signals(&self) -> impl Iterator<Item = IrqSignal> + '_ {
        self.peripherals.iter().filter_map(|device| device.irq())
    }

    /// Returns the memory.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns the memory mutably (program loading, test setup).
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Returns the peripheral registered under `select`, if any.
    pub fn peripheral(&self, select: DeviceSelect) -> Option<&dyn Peripheral> {
        let index = self.by_select[select.index()]?;
        self.peripherals.get(index).map(Box::as_ref)
    }

    /// Returns the UART if one is attached.
    pub fn uart(&self) -> Option<&Uart> {
        self.peripherals.iter().find_map(|d| d.as_uart())
    }

    /// Returns the UART mutably if one is attached.
    pub fn uart_mut(&mut self) -> Option<&mut Uart> {
        self.peripherals.iter_mut().find_map(|d| d.as_uart_mut())
    }

    /// Returns the VGA controller if one is attached.
    pub fn vga(&self) -> Option<&Vga> {
        self.peripherals.iter().find_map(|d| d.as_vga())
    }

    /// Returns the VGA controller mutably if one is attached.
    pub fn vga_mut(&mut self) -> Option<&mut Vga> {
        self.peripherals.iter_mut().find_map(|d| d.as_vga_mut())
    }

    /// Returns the timer if one is attached.
    pub fn timer(&self) -> Option<&Timer> {
        self.peripherals.iter().find_map(|d| d.as_timer())
    }
}
