//! Scancode translation
//!
//! Turns one prefix-flagged raw byte into a [`KeyEvent`], updating the
//! modifier latches on the way.

use super::keymap::{self, KeyCode};
use super::{KeyEvent, ModifierState};

/// Apply the US shift mapping to a character.
///
/// Digits and punctuation use a fixed table. Everything else has bit 5
/// cleared, which uppercases ASCII letters and is a no-op or meaningless
/// for other values.
pub fn shift_char(c: u8) -> u8 {
    match c {
        b'1' => b'!',
        b'2' => b'@',
        b'3' => b'#',
        b'4' => b'$',
        b'5' => b'%',
        b'6' => b'^',
        b'7' => b'&',
        b'8' => b'*',
        b'9' => b'(',
        b'0' => b')',
        b'`' => b'~',
        b'\'' => b'"',
        b'-' => b'_',
        b'=' => b'+',
        b';' => b':',
        b',' => b'<',
        b'.' => b'>',
        b'/' => b'?',
        b' ' => b' ',
        other => other & !(1 << 5),
    }
}

/// Decode `raw` against `modifiers`.
///
/// `extended` selects the table, `released` marks a break sequence.
/// Bytes past the end of the table decode to [`KeyCode::UNKNOWN`].
pub fn decode(modifiers: &mut ModifierState, extended: bool, released: bool, raw: u8) -> KeyEvent {
    let keycode = keymap::lookup(extended, raw).unwrap_or(KeyCode::UNKNOWN);
    modifiers.apply(keycode, released);

    let character = if modifiers.shift {
        shift_char(keycode.0)
    } else {
        keycode.0
    };

    KeyEvent {
        keycode,
        character,
        is_ascii: keycode.is_printable(),
        shift: modifiers.shift,
        ctrl: modifiers.ctrl,
        alt: modifiers.alt,
        released,
    }
}

/// Owns the modifier latches for a single byte stream
#[derive(Debug, Clone, Default)]
pub struct ScancodeTranslator {
    modifiers: ModifierState,
    log_unknown: bool,
}

impl ScancodeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a debug log line for every out-of-range byte
    pub fn with_unknown_logging(mut self, enabled: bool) -> Self {
        self.log_unknown = enabled;
        self
    }

    pub fn decode(&mut self, extended: bool, released: bool, raw: u8) -> KeyEvent {
        let event = decode(&mut self.modifiers, extended, released, raw);
        if self.log_unknown && event.keycode == KeyCode::UNKNOWN {
            let set = if extended { "extended" } else { "base" };
            log::debug!("unknown {set} scancode received from keyboard: {raw:#04x}");
        }
        event
    }

    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }
}
