//! Shared test utilities for keyboard modules
//!
//! Provides helpers for building key events.

use super::{KeyCode, KeyEvent};

/// Creates an event with full control over every field.
pub fn make_event(keycode: KeyCode, character: u8, shift: bool, released: bool) -> KeyEvent {
    KeyEvent {
        keycode,
        character,
        is_ascii: keycode.is_printable(),
        shift,
        ctrl: false,
        alt: false,
        released,
    }
}

/// Creates an unshifted key press event.
pub fn press(keycode: KeyCode) -> KeyEvent {
    make_event(keycode, keycode.0, false, false)
}

/// Creates an unshifted key release event.
pub fn release(keycode: KeyCode) -> KeyEvent {
    make_event(keycode, keycode.0, false, true)
}

/// Press followed by release of the same key.
pub fn tap(keycode: KeyCode) -> [KeyEvent; 2] {
    [press(keycode), release(keycode)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_creates_press_event() {
        let event = press(KeyCode(b'a'));
        assert_eq!(event.keycode, KeyCode(b'a'));
        assert_eq!(event.character, b'a');
        assert!(event.is_ascii);
        assert!(!event.released);
    }

    #[test]
    fn release_creates_release_event() {
        let event = release(KeyCode::ENTER);
        assert!(event.released);
        assert!(!event.is_ascii);
    }
}
