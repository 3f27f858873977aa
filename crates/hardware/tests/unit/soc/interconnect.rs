//! # Interconnect Tests
//!
//! Routing by device-select code and the one-owner-per-code registration rule.

use pretty_assertions::assert_eq;
use socsim_core::common::constants::{SELECT_TIMER, SELECT_UART};
use socsim_core::common::{DeviceSelect, EffectiveAddress};
use socsim_core::soc::SystemBus;
use socsim_core::soc::devices::{Peripheral, Timer, Uart};
use socsim_core::soc::interconnect::Route;
use socsim_core::soc::memory::{Memory, WriteStrobe};
use socsim_core::soc::traits::{IrqSignal, Trigger};

/// Peripheral that claims the memory code.
#[derive(Debug)]
struct Squatter;

impl Peripheral for Squatter {
    fn name(&self) -> &'static str {
        "SQUATTER"
    }
    fn device_select(&self) -> DeviceSelect {
        DeviceSelect::MEMORY
    }
    fn read(&self, _offset: u32) -> u32 {
        0xFFFF_FFFF
    }
    fn write(&mut self, _offset: u32, _value: u32) {}
}

fn bus() -> SystemBus {
    let mut bus = SystemBus::new(Memory::new(1024));
    assert!(bus.add_peripheral(Box::new(Uart::new(false))));
    assert!(bus.add_peripheral(Box::new(Timer::new())));
    bus
}

fn uart_address(offset: u32) -> EffectiveAddress {
    EffectiveAddress::new(DeviceSelect(SELECT_UART), offset)
}

#[test]
fn unowned_select_falls_through_to_memory() {
    let bus = bus();
    let address = EffectiveAddress::new(DeviceSelect(1), 0x40);
    assert_eq!(bus.route(address), Route::Memory { address: 0x40 });
}

#[test]
fn owned_select_routes_to_word_aligned_offset() {
    let bus = bus();
    assert_eq!(
        bus.route(uart_address(0x4000_000A)),
        Route::Peripheral { index: 0, offset: 0x8 }
    );
}

#[test]
fn peripheral_write_does_not_touch_memory() {
    let mut bus = bus();
    let route = bus.write(uart_address(0x8), 1, WriteStrobe::ALL);
    assert!(matches!(route, Route::Peripheral { .. }));
    assert_eq!(bus.memory().read(0x8), 0);
    assert!(bus.uart().expect("uart").enabled());
    assert_eq!(bus.read(uart_address(0x8)), 1);
}

#[test]
fn memory_write_honors_strobe() {
    let mut bus = bus();
    let address = EffectiveAddress::new(DeviceSelect::MEMORY, 0x20);
    let _ = bus.write(address, 0xAABB_CCDD, WriteStrobe::from_bits(0b0011));
    assert_eq!(bus.read(address), 0x0000_CCDD);
}

#[test]
fn duplicate_select_is_refused() {
    let mut bus = bus();
    assert!(!bus.add_peripheral(Box::new(Timer::new())));
    let timer = bus.peripheral(DeviceSelect(SELECT_TIMER)).expect("timer");
    assert_eq!(timer.name(), "TIMER");
}

#[test]
fn memory_select_cannot_be_claimed() {
    let mut bus = bus();
    assert!(!bus.add_peripheral(Box::new(Squatter)));
    assert_eq!(bus.read(EffectiveAddress::new(DeviceSelect::MEMORY, 0)), 0);
}

#[test]
fn irq_signals_come_from_every_device() {
    let bus = bus();
    let signals: Vec<IrqSignal> = bus.irq_signals().collect();
    assert_eq!(signals.len(), 2);
    assert!(signals.iter().any(|s| s.trigger == Trigger::Edge && s.line == 1));
    assert!(signals.iter().any(|s| s.trigger == Trigger::Level && s.line == 0));
    assert!(signals.iter().all(|s| !s.asserted));
}

#[test]
fn tick_reaches_peripherals() {
    let mut bus = bus();
    let timer_enable = EffectiveAddress::new(DeviceSelect(SELECT_TIMER), 0x8);
    let _ = bus.write(timer_enable, 1, WriteStrobe::ALL);
    bus.tick();
    bus.tick();
    assert_eq!(bus.timer().expect("timer").count(), 2);
    assert!(bus.vga().is_none());
}
