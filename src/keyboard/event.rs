//! Keyboard event type

use super::KeyCode;
use serde::Serialize;

/// A decoded key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyEvent {
    /// Logical key code from the scancode tables
    pub keycode: KeyCode,
    /// Character after the shift transform
    pub character: u8,
    /// Keycode lies in printable ASCII
    pub is_ascii: bool,
    /// Shift latch at decode time
    pub shift: bool,
    /// Ctrl latch at decode time
    pub ctrl: bool,
    /// Alt latch at decode time
    pub alt: bool,
    /// Decoded from a break (`0xF0`) sequence
    pub released: bool,
}

impl KeyEvent {
    pub fn is_press(&self) -> bool {
        !self.released
    }
}
