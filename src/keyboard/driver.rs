//! Keyboard driver entry points

use super::port::{send_init_sequence, PortError, Ps2Port};
use super::pump::{InputPump, PumpStats};
use super::{KeyEvent, ScancodeTranslator};
use crate::bus::{BusError, ChannelMode, Message, MessageBus, Payload, Subscriber, KEYPRESS_TOPIC};
use crate::config::DriverConfig;
use std::io;
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Error type for driver setup and teardown
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("keyboard handshake failed: {0}")]
    Handshake(#[from] PortError),
    #[error("failed to register keypress channel: {0}")]
    Channel(#[from] BusError),
    #[error("failed to spawn input pump: {0}")]
    Spawn(#[source] io::Error),
    #[error("input pump panicked")]
    PumpPanicked,
}

/// A running keyboard: the input pump task and the bus it publishes on
pub struct KeyboardDriver {
    bus: MessageBus,
    pump: JoinHandle<PumpStats>,
}

impl KeyboardDriver {
    /// Bring up the keyboard on `port` and start publishing events on `bus`.
    ///
    /// Sends the scancode-set-2 / enable-scanning handshake (unless
    /// disabled), registers the multicast keypress channel and spawns the
    /// input pump on its own thread.
    pub fn initialize<P>(
        mut port: P,
        bus: MessageBus,
        config: &DriverConfig,
        translator: ScancodeTranslator,
    ) -> Result<Self, DriverError>
    where
        P: Ps2Port + 'static,
    {
        if config.handshake {
            log::debug!("initializing port 1 keyboard");
            send_init_sequence(&mut port)?;
        }

        // Registered before the pump starts so its first event has a channel
        bus.register_channel(KEYPRESS_TOPIC, ChannelMode::Multicast, &config.thread_name)?;

        let pump = InputPump::new(port, bus.clone(), translator);
        let pump = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || pump.run())
            .map_err(DriverError::Spawn)?;

        log::debug!("input pump {:?} started", config.thread_name);
        Ok(Self { bus, pump })
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// Wait for the pump to stop (the port closed) and drop the driver's
    /// bus handle.
    pub fn join(self) -> Result<PumpStats, DriverError> {
        let KeyboardDriver { bus, pump } = self;
        drop(bus);
        pump.join().map_err(|_| DriverError::PumpPanicked)
    }
}

/// Block until the next key event reaches `subscriber`.
///
/// Declares interest in the keypress topic first. Messages on any other
/// topic, or with a different payload, are discarded and the wait goes on.
pub fn get_next_key_event(subscriber: &Subscriber) -> Result<KeyEvent, BusError> {
    subscriber.set_listen_status(KEYPRESS_TOPIC, true);
    loop {
        match subscriber.wait_for_message()? {
            Message {
                topic,
                payload: Payload::KeyEvent(event),
            } if topic == KEYPRESS_TOPIC => return Ok(event),
            other => log::trace!("ignoring message on {:?}", other.topic),
        }
    }
}
