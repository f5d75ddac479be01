//! PS/2 controller port boundary
//!
//! The byte-level controller handshake lives below this trait. The driver
//! only needs a blocking receive, a send, and a wait for the controller to
//! accept the next byte.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Keyboard command: select scancode set (followed by the set number)
pub const CMD_SET_SCANCODE_SET: u8 = 0xF0;

/// Scancode set selected during initialization
pub const SCANCODE_SET_2: u8 = 0x02;

/// Keyboard command: enable scanning
pub const CMD_ENABLE_SCANNING: u8 = 0xF4;

/// Bytes sent to the keyboard during initialization, in order
pub const INIT_SEQUENCE: [u8; 3] = [CMD_SET_SCANCODE_SET, SCANCODE_SET_2, CMD_ENABLE_SCANNING];

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The byte source has gone away and will never produce another byte
    #[error("keyboard port closed")]
    Closed,
    /// The controller rejected a byte
    #[error("failed to send {byte:#04x} to keyboard controller")]
    SendFailed { byte: u8 },
}

/// Hardware boundary for one keyboard port
pub trait Ps2Port: Send {
    /// Block until the keyboard produces a byte
    fn receive_byte(&mut self) -> Result<u8, PortError>;

    /// Send a command or data byte to the keyboard
    fn send_byte(&mut self, byte: u8) -> Result<(), PortError>;

    /// Block until the controller is ready for the next byte
    fn wait_for_ready(&mut self) -> Result<(), PortError>;
}

impl<P: Ps2Port + ?Sized> Ps2Port for Box<P> {
    fn receive_byte(&mut self) -> Result<u8, PortError> {
        (**self).receive_byte()
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), PortError> {
        (**self).send_byte(byte)
    }

    fn wait_for_ready(&mut self) -> Result<(), PortError> {
        (**self).wait_for_ready()
    }
}

/// Run the keyboard initialization sequence on `port`.
///
/// Selects scancode set 2 and enables scanning, waiting for the controller
/// after every byte.
pub fn send_init_sequence<P: Ps2Port + ?Sized>(port: &mut P) -> Result<(), PortError> {
    for byte in INIT_SEQUENCE {
        port.send_byte(byte)?;
        port.wait_for_ready()?;
    }
    Ok(())
}

/// A port fed from an in-process channel.
///
/// Bytes pushed through the paired [`PortFeeder`] are received in order.
/// Once every feeder is dropped and the queue is drained, `receive_byte`
/// reports [`PortError::Closed`]. Bytes sent to the keyboard are recorded.
pub struct ChannelPort {
    rx: mpsc::Receiver<u8>,
    sent: Arc<Mutex<Vec<u8>>>,
}

/// Sending half of a [`ChannelPort`]
#[derive(Clone)]
pub struct PortFeeder {
    tx: mpsc::Sender<u8>,
    sent: Arc<Mutex<Vec<u8>>>,
}

impl ChannelPort {
    pub fn new() -> (ChannelPort, PortFeeder) {
        let (tx, rx) = mpsc::channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let port = ChannelPort {
            rx,
            sent: Arc::clone(&sent),
        };
        (port, PortFeeder { tx, sent })
    }

    /// A port that yields `bytes` and then closes
    pub fn from_bytes(bytes: &[u8]) -> ChannelPort {
        let (port, feeder) = ChannelPort::new();
        feeder.push_all(bytes);
        port
    }
}

impl Ps2Port for ChannelPort {
    fn receive_byte(&mut self) -> Result<u8, PortError> {
        self.rx.recv().map_err(|_| PortError::Closed)
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), PortError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(byte);
        Ok(())
    }

    fn wait_for_ready(&mut self) -> Result<(), PortError> {
        Ok(())
    }
}

impl PortFeeder {
    /// Queue one byte for the port. Returns `false` if the port is gone.
    pub fn push(&self, byte: u8) -> bool {
        self.tx.send(byte).is_ok()
    }

    /// Queue every byte in `bytes`, stopping early if the port is gone
    pub fn push_all(&self, bytes: &[u8]) -> usize {
        bytes.iter().take_while(|&&b| self.push(b)).count()
    }

    /// Bytes the driver has sent to the keyboard so far
    pub fn sent(&self) -> Vec<u8> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_sequence_is_bit_exact() {
        let (mut port, feeder) = ChannelPort::new();
        send_init_sequence(&mut port).expect("init sequence");
        assert_eq!(feeder.sent(), vec![0xF0, 0x02, 0xF4]);
    }

    #[test]
    fn bytes_arrive_in_order_then_close() {
        let mut port = ChannelPort::from_bytes(&[0xE0, 0x75, 0x1C]);
        assert_eq!(port.receive_byte().unwrap(), 0xE0);
        assert_eq!(port.receive_byte().unwrap(), 0x75);
        assert_eq!(port.receive_byte().unwrap(), 0x1C);
        assert!(matches!(port.receive_byte(), Err(PortError::Closed)));
    }

    #[test]
    fn push_reports_a_dropped_port() {
        let (port, feeder) = ChannelPort::new();
        drop(port);
        assert!(!feeder.push(0x1C));
        assert_eq!(feeder.push_all(&[1, 2, 3]), 0);
    }

    struct FailingPort;

    impl Ps2Port for FailingPort {
        fn receive_byte(&mut self) -> Result<u8, PortError> {
            Err(PortError::Closed)
        }

        fn send_byte(&mut self, byte: u8) -> Result<(), PortError> {
            Err(PortError::SendFailed { byte })
        }

        fn wait_for_ready(&mut self) -> Result<(), PortError> {
            Ok(())
        }
    }

    #[test]
    fn init_sequence_stops_at_first_failure() {
        let err = send_init_sequence(&mut FailingPort).unwrap_err();
        assert_eq!(err.to_string(), "failed to send 0xf0 to keyboard controller");
    }
}
