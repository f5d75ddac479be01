//! Modifier latch state

use super::KeyCode;
use serde::Serialize;

/// Shift/ctrl/alt latches.
///
/// Only the translator writes this. A latch changes only when the
/// corresponding modifier key is pressed or released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the latch belonging to `key`, if any.
    ///
    /// Returns `true` when `key` is a modifier.
    pub fn apply(&mut self, key: KeyCode, released: bool) -> bool {
        let latch = if key.is_shift() {
            &mut self.shift
        } else if key.is_ctrl() {
            &mut self.ctrl
        } else if key.is_alt() {
            &mut self.alt
        } else {
            return false;
        };
        *latch = !released;
        true
    }
}
