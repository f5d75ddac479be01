//! Input pump: byte stream to published key events

use super::port::{PortError, Ps2Port};
use super::{KeyEvent, ModifierState, ScancodeTranslator};
use crate::bus::{Message, MessageBus};
use serde::Serialize;

/// Prefix announcing an extended-table key
pub const EXTENDED_PREFIX: u8 = 0xE0;

/// Prefix announcing a key release
pub const BREAK_PREFIX: u8 = 0xF0;

/// Assembles prefixed scancode sequences and translates them.
///
/// Both prefixes are independent flags. They are carried until the next
/// non-prefix byte and then cleared.
#[derive(Debug, Clone, Default)]
pub struct ScancodeDecoder {
    translator: ScancodeTranslator,
    extended: bool,
    released: bool,
}

impl ScancodeDecoder {
    pub fn new(translator: ScancodeTranslator) -> Self {
        Self {
            translator,
            extended: false,
            released: false,
        }
    }

    /// Feed one raw byte. Returns an event once a sequence completes.
    pub fn feed(&mut self, byte: u8) -> Option<KeyEvent> {
        match byte {
            EXTENDED_PREFIX => {
                self.extended = true;
                None
            }
            BREAK_PREFIX => {
                self.released = true;
                None
            }
            raw => {
                let event = self.translator.decode(self.extended, self.released, raw);
                self.extended = false;
                self.released = false;
                Some(event)
            }
        }
    }

    /// Whether a prefix has been seen without its data byte
    pub fn is_mid_sequence(&self) -> bool {
        self.extended || self.released
    }

    pub fn modifiers(&self) -> ModifierState {
        self.translator.modifiers()
    }
}

/// Counters reported when the pump stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpStats {
    /// Raw bytes read from the port
    pub bytes_read: u64,
    /// Events handed to the bus
    pub events_published: u64,
    /// Events that no subscriber was listening for
    pub events_unheard: u64,
    /// Modifier latches when the pump stopped
    pub final_modifiers: ModifierState,
}

/// The producer task.
///
/// Reads bytes from a [`Ps2Port`], decodes them and publishes each event on
/// the keypress topic in arrival order.
pub struct InputPump<P> {
    port: P,
    decoder: ScancodeDecoder,
    bus: MessageBus,
    stats: PumpStats,
}

impl<P: Ps2Port> InputPump<P> {
    pub fn new(port: P, bus: MessageBus, translator: ScancodeTranslator) -> Self {
        Self {
            port,
            decoder: ScancodeDecoder::new(translator),
            bus,
            stats: PumpStats::default(),
        }
    }

    /// Handle a single byte
    pub fn process_byte(&mut self, byte: u8) {
        self.stats.bytes_read += 1;
        let Some(event) = self.decoder.feed(byte) else {
            return;
        };

        log::trace!(
            "{} {} (char {:#04x})",
            super::keymap::describe(event.keycode),
            if event.released { "released" } else { "pressed" },
            event.character,
        );

        match self.bus.send(Message::key_event(event)) {
            Ok(0) => {
                self.stats.events_published += 1;
                self.stats.events_unheard += 1;
            }
            Ok(_) => self.stats.events_published += 1,
            Err(e) => log::warn!("dropping key event: {e}"),
        }
    }

    /// Run until the port closes or fails.
    ///
    /// Real hardware never closes, so on a live keyboard this never returns.
    pub fn run(mut self) -> PumpStats {
        loop {
            match self.port.receive_byte() {
                Ok(byte) => self.process_byte(byte),
                Err(PortError::Closed) => break,
                Err(e) => {
                    log::warn!("keyboard port error, stopping input pump: {e}");
                    break;
                }
            }
        }

        if self.decoder.is_mid_sequence() {
            log::debug!("port closed in the middle of a scancode sequence");
        }
        self.stats.final_modifiers = self.decoder.modifiers();
        log::debug!(
            "input pump stopped after {} bytes, {} events",
            self.stats.bytes_read,
            self.stats.events_published
        );
        self.stats
    }
}
