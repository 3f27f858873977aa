//! Universal Asynchronous Receiver-Transmitter (UART).
//!
//! A minimal memory-mapped serial port. It performs the following:
//! 1. **Transmit:** Bytes written to TX are recorded and optionally echoed to stdout,
//!    but only while the enable latch is set.
//! 2. **Receive:** Host-injected bytes (or bytes from a stdin reader thread) are
//!    delivered into RX one every other CPU cycle, each pulsing the external interrupt line.
//!
//! # Memory Map
//!
//! * `0x04`: BAUD (read/write, default 115200)
//! * `0x08`: ENABLE (read/write)
//! * `0x0C`: RX (read-only, last received byte)
//! * `0x10`: TX (write-only)

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::mpsc::{Receiver, channel};
use std::thread;

use crate::common::DeviceSelect;
use crate::common::constants::SELECT_UART;
use crate::core::clint::InterruptSource;
use crate::soc::traits::{IrqSignal, Peripheral, Trigger};

/// Offset of the baud rate register.
pub const UART_BAUD: u32 = 0x04;
/// Offset of the enable register.
pub const UART_ENABLE: u32 = 0x08;
/// Offset of the receive data register.
pub const UART_RX: u32 = 0x0C;
/// Offset of the transmit data register.
pub const UART_TX: u32 = 0x10;

/// Baud rate after reset.
pub const DEFAULT_BAUD: u32 = 115_200;

/// UART device structure.
#[derive(Debug)]
pub struct Uart {
    baud: u32,
    enabled: bool,
    last_rx: u8,
    /// Bytes waiting to be delivered to RX.
    pending: VecDeque<u8>,
    /// Channel receiver for the optional stdin thread.
    stdin: Option<Receiver<u8>>,
    /// High for exactly one tick after a byte lands in RX.
    rx_pulse: bool,
    /// Every byte transmitted while enabled.
    tx_log: Vec<u8>,
    /// Echo transmitted bytes to stdout.
    echo: bool,
}

impl Default for Uart {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Uart {
    /// Creates a disabled UART.
    ///
    /// # Arguments
    ///
    /// * `echo` - When true, transmitted bytes are also written to stdout.
    pub const fn new(echo: bool) -> Self {
        Self {
            baud: DEFAULT_BAUD,
            enabled: false,
            last_rx: 0,
            pending: VecDeque::new(),
            stdin: None,
            rx_pulse: false,
            tx_log: Vec::new(),
            echo,
        }
    }

    /// Spawns a background thread forwarding stdin bytes into the receive queue.
    pub fn attach_stdin(&mut self) {
        let (tx, rx) = channel();
        let _ = thread::spawn(move || {
            let mut buffer = [0u8; 1];
            let stdin = io::stdin();
            let mut handle = stdin.lock();
            while handle.read_exact(&mut buffer).is_ok() {
                if tx.send(buffer[0]).is_err() {
                    break;
                }
            }
        });
        self.stdin = Some(rx);
    }

    /// Queues bytes for delivery to RX.
    pub fn receive(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes);
    }

    /// Bytes transmitted so far.
    pub fn transmitted(&self) -> &[u8] {
        &self.tx_log
    }

    /// Removes and returns the bytes transmitted so far.
    pub fn take_transmitted(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx_log)
    }

    /// Current baud rate register.
    pub const fn baud(&self) -> u32 {
        self.baud
    }

    /// Whether the transmit enable latch is set.
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    fn poll_stdin(&mut self) {
        if let Some(rx) = &self.stdin {
            while let Ok(byte) = rx.try_recv() {
                self.pending.push_back(byte);
            }
        }
    }

    fn transmit(&mut self, byte: u8) {
        if !self.enabled {
            tracing::trace!(byte, "UART disabled; transmit dropped");
            return;
        }
        self.tx_log.push(byte);
        if self.echo {
            let mut out = io::stdout();
            let _ = out.write_all(&[byte]).and_then(|()| out.flush());
        }
    }
}

impl Peripheral for Uart {
    fn name(&self) -> &'static str {
        "UART0"
    }

    fn device_select(&self) -> DeviceSelect {
        DeviceSelect(SELECT_UART)
    }

    fn read(&self, offset: u32) -> u32 {
        match offset {
            UART_BAUD => self.baud,
            UART_ENABLE => u32::from(self.enabled),
            UART_RX => u32::from(self.last_rx),
            _ => 0,
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        match offset {
            UART_BAUD => self.baud = value,
            UART_ENABLE => self.enabled = value != 0,
            UART_TX => self.transmit((value & 0xFF) as u8),
            _ => {}
        }
    }

    fn tick(&mut self) {
        self.poll_stdin();
        // The line drops for a cycle between bytes so every byte is a fresh edge.
        if self.rx_pulse {
            self.rx_pulse = false;
        } else if let Some(byte) = self.pending.pop_front() {
            self.last_rx = byte;
            self.rx_pulse = true;
        }
    }

    fn irq(&self) -> Option<IrqSignal> {
        Some(IrqSignal {
            line: InterruptSource::External.line(),
            trigger: Trigger::Edge,
            asserted: self.rx_pulse,
        })
    }

    fn as_uart(&self) -> Option<&Uart> {
        Some(self)
    }

    fn as_uart_mut(&mut self) -> Option<&mut Uart> {
        Some(self)
    }
}
