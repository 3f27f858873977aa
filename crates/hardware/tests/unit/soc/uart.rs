//! # UART Tests

use pretty_assertions::assert_eq;
use socsim_core::soc::devices::Peripheral;
use socsim_core::soc::devices::Uart;
use socsim_core::soc::devices::uart::{DEFAULT_BAUD, UART_BAUD, UART_ENABLE, UART_RX, UART_TX};
use socsim_core::soc::traits::Trigger;

#[test]
fn reset_state() {
    let uart = Uart::default();
    assert_eq!(uart.read(UART_BAUD), DEFAULT_BAUD);
    assert_eq!(uart.read(UART_ENABLE), 0);
    assert_eq!(uart.read(UART_RX), 0);
    assert_eq!(uart.name(), "UART0");
}

#[test]
fn transmit_requires_enable() {
    let mut uart = Uart::new(false);
    uart.write(UART_TX, u32::from(b'x'));
    assert!(uart.transmitted().is_empty());

    uart.write(UART_ENABLE, 1);
    uart.write(UART_TX, 0x141);
    assert_eq!(uart.transmitted(), b"A");
    assert_eq!(uart.take_transmitted(), b"A".to_vec());
    assert!(uart.transmitted().is_empty());
}

#[test]
fn tx_and_baud_registers() {
    let mut uart = Uart::new(false);
    uart.write(UART_BAUD, 9600);
    assert_eq!(uart.baud(), 9600);
    assert_eq!(uart.read(UART_TX), 0);
}

#[test]
fn received_bytes_arrive_every_other_tick() {
    let mut uart = Uart::new(false);
    uart.receive(b"ab");

    uart.tick();
    assert_eq!(uart.read(UART_RX), u32::from(b'a'));
    let irq = uart.irq().expect("uart has an interrupt line");
    assert_eq!((irq.line, irq.trigger, irq.asserted), (1, Trigger::Edge, true));

    uart.tick();
    assert_eq!(uart.read(UART_RX), u32::from(b'a'));
    assert!(!uart.irq().expect("line").asserted);

    uart.tick();
    assert_eq!(uart.read(UART_RX), u32::from(b'b'));
    assert!(uart.irq().expect("line").asserted);
}

#[test]
fn rx_is_read_only() {
    let mut uart = Uart::new(false);
    uart.write(UART_RX, 0x55);
    assert_eq!(uart.read(UART_RX), 0);
}
