//! # Address Decoding Tests
//!
//! Verifies the device-select tag derived from the canonical peripheral bases
//! and the split of an effective address into memory and register views.

use rstest::rstest;
use socsim_core::common::constants::*;
use socsim_core::common::{DeviceSelect, EffectiveAddress};

#[rstest]
#[case(0x0000_1000, SELECT_MEMORY)]
#[case(VGA_BASE, SELECT_VGA)]
#[case(UART_BASE, SELECT_UART)]
#[case(TIMER_BASE, SELECT_TIMER)]
fn canonical_bases_decode_to_their_select(#[case] address: u32, #[case] select: u8) {
    assert_eq!(DeviceSelect::from_address(address), DeviceSelect(select));
}

#[test]
fn effective_address_combines_select_and_masked_address() {
    let ea = EffectiveAddress::new(DeviceSelect(SELECT_UART), UART_BASE + 0x10);
    assert_eq!(ea.select(), DeviceSelect(SELECT_UART));
    assert_eq!(ea.offset(), 0x10);
    assert_eq!(ea.raw(), 0x10);
    assert_eq!(ea.val(), UART_BASE + 0x10);
}

#[test]
fn memory_select_strips_high_bits() {
    let ea = EffectiveAddress::new(DeviceSelect::MEMORY, 0xE000_2004);
    assert!(ea.select().is_memory());
    assert_eq!(ea.raw(), 0x2004);
}

#[test]
fn select_index_is_truncated_to_field_width() {
    assert_eq!(DeviceSelect(9).index(), 1);
    assert_eq!(DeviceSelect::COUNT, 8);
}

#[test]
fn offsets_stay_within_peripheral_window() {
    let ea = EffectiveAddress::new(DeviceSelect(SELECT_VGA), VGA_BASE + PERIPHERAL_WINDOW + 4);
    assert_eq!(ea.offset(), 4);
}
