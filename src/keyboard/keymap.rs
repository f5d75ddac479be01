//! Key code definitions and scancode set 2 lookup tables

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Logical key code produced by the scancode tables.
///
/// Printable keys carry their unshifted ASCII value; everything else lives
/// outside the printable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KeyCode(pub u8);

impl KeyCode {
    /// Unassigned slot inside a table's valid range
    pub const NONE: KeyCode = KeyCode(0x00);
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0A);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(b' ');

    pub const F1: KeyCode = KeyCode(0x81);
    pub const F2: KeyCode = KeyCode(0x82);
    pub const F3: KeyCode = KeyCode(0x83);
    pub const F4: KeyCode = KeyCode(0x84);
    pub const F5: KeyCode = KeyCode(0x85);
    pub const F6: KeyCode = KeyCode(0x86);
    pub const F7: KeyCode = KeyCode(0x87);
    pub const F8: KeyCode = KeyCode(0x88);
    pub const F9: KeyCode = KeyCode(0x89);
    pub const F10: KeyCode = KeyCode(0x8A);
    pub const F11: KeyCode = KeyCode(0x8B);
    pub const F12: KeyCode = KeyCode(0x8C);

    pub const LEFT_SHIFT: KeyCode = KeyCode(0x90);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(0x91);
    pub const LEFT_CTRL: KeyCode = KeyCode(0x92);
    pub const RIGHT_CTRL: KeyCode = KeyCode(0x93);
    pub const LEFT_ALT: KeyCode = KeyCode(0x94);
    pub const RIGHT_ALT: KeyCode = KeyCode(0x95);
    pub const LEFT_GUI: KeyCode = KeyCode(0x96);
    pub const RIGHT_GUI: KeyCode = KeyCode(0x97);
    pub const MENU: KeyCode = KeyCode(0x98);
    pub const CAPS_LOCK: KeyCode = KeyCode(0x99);
    pub const NUM_LOCK: KeyCode = KeyCode(0x9A);
    pub const SCROLL_LOCK: KeyCode = KeyCode(0x9B);
    pub const PRINT_SCREEN: KeyCode = KeyCode(0x9C);

    pub const UP: KeyCode = KeyCode(0xA0);
    pub const DOWN: KeyCode = KeyCode(0xA1);
    pub const LEFT: KeyCode = KeyCode(0xA2);
    pub const RIGHT: KeyCode = KeyCode(0xA3);
    pub const INSERT: KeyCode = KeyCode(0xA4);
    pub const DELETE: KeyCode = KeyCode(0xA5);
    pub const HOME: KeyCode = KeyCode(0xA6);
    pub const END: KeyCode = KeyCode(0xA7);
    pub const PAGE_UP: KeyCode = KeyCode(0xA8);
    pub const PAGE_DOWN: KeyCode = KeyCode(0xA9);

    pub const KEYPAD_0: KeyCode = KeyCode(0xB0);
    pub const KEYPAD_1: KeyCode = KeyCode(0xB1);
    pub const KEYPAD_2: KeyCode = KeyCode(0xB2);
    pub const KEYPAD_3: KeyCode = KeyCode(0xB3);
    pub const KEYPAD_4: KeyCode = KeyCode(0xB4);
    pub const KEYPAD_5: KeyCode = KeyCode(0xB5);
    pub const KEYPAD_6: KeyCode = KeyCode(0xB6);
    pub const KEYPAD_7: KeyCode = KeyCode(0xB7);
    pub const KEYPAD_8: KeyCode = KeyCode(0xB8);
    pub const KEYPAD_9: KeyCode = KeyCode(0xB9);
    pub const KEYPAD_PERIOD: KeyCode = KeyCode(0xBA);
    pub const KEYPAD_PLUS: KeyCode = KeyCode(0xBB);
    pub const KEYPAD_MINUS: KeyCode = KeyCode(0xBC);
    pub const KEYPAD_STAR: KeyCode = KeyCode(0xBD);
    pub const KEYPAD_SLASH: KeyCode = KeyCode(0xBE);
    pub const KEYPAD_ENTER: KeyCode = KeyCode(0xBF);

    /// Raw byte fell outside the selected table
    pub const UNKNOWN: KeyCode = KeyCode(0xFF);

    /// Whether this code is in the printable ASCII range `0x20..=0x7E`
    pub fn is_printable(&self) -> bool {
        (0x20..=0x7E).contains(&self.0)
    }

    pub fn is_shift(&self) -> bool {
        matches!(*self, KeyCode::LEFT_SHIFT | KeyCode::RIGHT_SHIFT)
    }

    pub fn is_ctrl(&self) -> bool {
        matches!(*self, KeyCode::LEFT_CTRL | KeyCode::RIGHT_CTRL)
    }

    pub fn is_alt(&self) -> bool {
        matches!(*self, KeyCode::LEFT_ALT | KeyCode::RIGHT_ALT)
    }

    pub fn is_modifier(&self) -> bool {
        self.is_shift() || self.is_ctrl() || self.is_alt()
    }
}

/// Number of entries in the base table (valid raw bytes `0x00..=0x83`)
pub const BASE_TABLE_LEN: usize = 0x84;

/// Number of entries in the extended table (valid raw bytes `0x00..=0x7D`)
pub const EXTENDED_TABLE_LEN: usize = 0x7E;

/// Scancode set 2 make codes without a prefix
pub static BASE_SCANCODES: [KeyCode; BASE_TABLE_LEN] = {
    let mut t = [KeyCode::NONE; BASE_TABLE_LEN];

    // Function row
    t[0x76] = KeyCode::ESCAPE;
    t[0x05] = KeyCode::F1;
    t[0x06] = KeyCode::F2;
    t[0x04] = KeyCode::F3;
    t[0x0C] = KeyCode::F4;
    t[0x03] = KeyCode::F5;
    t[0x0B] = KeyCode::F6;
    t[0x83] = KeyCode::F7;
    t[0x0A] = KeyCode::F8;
    t[0x01] = KeyCode::F9;
    t[0x09] = KeyCode::F10;
    t[0x78] = KeyCode::F11;
    t[0x07] = KeyCode::F12;
    t[0x7E] = KeyCode::SCROLL_LOCK;

    // Number row
    t[0x0E] = KeyCode(b'`');
    t[0x16] = KeyCode(b'1');
    t[0x1E] = KeyCode(b'2');
    t[0x26] = KeyCode(b'3');
    t[0x25] = KeyCode(b'4');
    t[0x2E] = KeyCode(b'5');
    t[0x36] = KeyCode(b'6');
    t[0x3D] = KeyCode(b'7');
    t[0x3E] = KeyCode(b'8');
    t[0x46] = KeyCode(b'9');
    t[0x45] = KeyCode(b'0');
    t[0x4E] = KeyCode(b'-');
    t[0x55] = KeyCode(b'=');
    t[0x66] = KeyCode::BACKSPACE;

    // Top letter row
    t[0x0D] = KeyCode::TAB;
    t[0x15] = KeyCode(b'q');
    t[0x1D] = KeyCode(b'w');
    t[0x24] = KeyCode(b'e');
    t[0x2D] = KeyCode(b'r');
    t[0x2C] = KeyCode(b't');
    t[0x35] = KeyCode(b'y');
    t[0x3C] = KeyCode(b'u');
    t[0x43] = KeyCode(b'i');
    t[0x44] = KeyCode(b'o');
    t[0x4D] = KeyCode(b'p');
    t[0x54] = KeyCode(b'[');
    t[0x5B] = KeyCode(b']');
    t[0x5D] = KeyCode(b'\\');

    // Home row
    t[0x58] = KeyCode::CAPS_LOCK;
    t[0x1C] = KeyCode(b'a');
    t[0x1B] = KeyCode(b's');
    t[0x23] = KeyCode(b'd');
    t[0x2B] = KeyCode(b'f');
    t[0x34] = KeyCode(b'g');
    t[0x33] = KeyCode(b'h');
    t[0x3B] = KeyCode(b'j');
    t[0x42] = KeyCode(b'k');
    t[0x4B] = KeyCode(b'l');
    t[0x4C] = KeyCode(b';');
    t[0x52] = KeyCode(b'\'');
    t[0x5A] = KeyCode::ENTER;

    // Bottom letter row
    t[0x12] = KeyCode::LEFT_SHIFT;
    t[0x1A] = KeyCode(b'z');
    t[0x22] = KeyCode(b'x');
    t[0x21] = KeyCode(b'c');
    t[0x2A] = KeyCode(b'v');
    t[0x32] = KeyCode(b'b');
    t[0x31] = KeyCode(b'n');
    t[0x3A] = KeyCode(b'm');
    t[0x41] = KeyCode(b',');
    t[0x49] = KeyCode(b'.');
    t[0x4A] = KeyCode(b'/');
    t[0x59] = KeyCode::RIGHT_SHIFT;

    // Bottom row
    t[0x14] = KeyCode::LEFT_CTRL;
    t[0x11] = KeyCode::LEFT_ALT;
    t[0x29] = KeyCode::SPACE;

    // Keypad
    t[0x77] = KeyCode::NUM_LOCK;
    t[0x7C] = KeyCode::KEYPAD_STAR;
    t[0x7B] = KeyCode::KEYPAD_MINUS;
    t[0x79] = KeyCode::KEYPAD_PLUS;
    t[0x71] = KeyCode::KEYPAD_PERIOD;
    t[0x70] = KeyCode::KEYPAD_0;
    t[0x69] = KeyCode::KEYPAD_1;
    t[0x72] = KeyCode::KEYPAD_2;
    t[0x7A] = KeyCode::KEYPAD_3;
    t[0x6B] = KeyCode::KEYPAD_4;
    t[0x73] = KeyCode::KEYPAD_5;
    t[0x74] = KeyCode::KEYPAD_6;
    t[0x6C] = KeyCode::KEYPAD_7;
    t[0x75] = KeyCode::KEYPAD_8;
    t[0x7D] = KeyCode::KEYPAD_9;

    t
};

/// Scancode set 2 make codes that follow an `0xE0` prefix
pub static EXTENDED_SCANCODES: [KeyCode; EXTENDED_TABLE_LEN] = {
    let mut t = [KeyCode::NONE; EXTENDED_TABLE_LEN];

    t[0x11] = KeyCode::RIGHT_ALT;
    t[0x14] = KeyCode::RIGHT_CTRL;
    t[0x1F] = KeyCode::LEFT_GUI;
    t[0x27] = KeyCode::RIGHT_GUI;
    t[0x2F] = KeyCode::MENU;
    t[0x7C] = KeyCode::PRINT_SCREEN;

    t[0x4A] = KeyCode::KEYPAD_SLASH;
    t[0x5A] = KeyCode::KEYPAD_ENTER;

    // Navigation cluster
    t[0x70] = KeyCode::INSERT;
    t[0x71] = KeyCode::DELETE;
    t[0x6C] = KeyCode::HOME;
    t[0x69] = KeyCode::END;
    t[0x7D] = KeyCode::PAGE_UP;
    t[0x7A] = KeyCode::PAGE_DOWN;

    // Arrow keys
    t[0x75] = KeyCode::UP;
    t[0x72] = KeyCode::DOWN;
    t[0x6B] = KeyCode::LEFT;
    t[0x74] = KeyCode::RIGHT;

    t
};

/// Look up a raw byte in the base or extended table.
///
/// Returns `None` when the byte is past the end of the selected table.
pub fn lookup(extended: bool, raw: u8) -> Option<KeyCode> {
    let table: &[KeyCode] = if extended {
        &EXTENDED_SCANCODES
    } else {
        &BASE_SCANCODES
    };
    table.get(raw as usize).copied()
}

/// Information about a non-printable key
#[derive(Debug, Clone)]
pub struct KeyInfo {
    /// Display name for the key
    pub name: &'static str,
    /// Short label
    pub label: &'static str,
}

impl KeyInfo {
    const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }
}

/// Names for every key code that is not printable ASCII
pub static KEYMAP: LazyLock<HashMap<KeyCode, KeyInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    map.insert(KeyCode::NONE, KeyInfo::new("None", "-"));
    map.insert(KeyCode::UNKNOWN, KeyInfo::new("Unknown", "?"));

    map.insert(KeyCode::BACKSPACE, KeyInfo::new("Backspace", "Bksp"));
    map.insert(KeyCode::TAB, KeyInfo::new("Tab", "Tab"));
    map.insert(KeyCode::ENTER, KeyInfo::new("Enter", "Enter"));
    map.insert(KeyCode::ESCAPE, KeyInfo::new("Escape", "Esc"));

    map.insert(KeyCode::F1, KeyInfo::new("F1", "F1"));
    map.insert(KeyCode::F2, KeyInfo::new("F2", "F2"));
    map.insert(KeyCode::F3, KeyInfo::new("F3", "F3"));
    map.insert(KeyCode::F4, KeyInfo::new("F4", "F4"));
    map.insert(KeyCode::F5, KeyInfo::new("F5", "F5"));
    map.insert(KeyCode::F6, KeyInfo::new("F6", "F6"));
    map.insert(KeyCode::F7, KeyInfo::new("F7", "F7"));
    map.insert(KeyCode::F8, KeyInfo::new("F8", "F8"));
    map.insert(KeyCode::F9, KeyInfo::new("F9", "F9"));
    map.insert(KeyCode::F10, KeyInfo::new("F10", "F10"));
    map.insert(KeyCode::F11, KeyInfo::new("F11", "F11"));
    map.insert(KeyCode::F12, KeyInfo::new("F12", "F12"));

    // Modifiers and locks
    map.insert(KeyCode::LEFT_SHIFT, KeyInfo::new("LeftShift", "Shift"));
    map.insert(KeyCode::RIGHT_SHIFT, KeyInfo::new("RightShift", "Shift"));
    map.insert(KeyCode::LEFT_CTRL, KeyInfo::new("LeftCtrl", "Ctrl"));
    map.insert(KeyCode::RIGHT_CTRL, KeyInfo::new("RightCtrl", "Ctrl"));
    map.insert(KeyCode::LEFT_ALT, KeyInfo::new("LeftAlt", "Alt"));
    map.insert(KeyCode::RIGHT_ALT, KeyInfo::new("RightAlt", "Alt"));
    map.insert(KeyCode::LEFT_GUI, KeyInfo::new("LeftMeta", "Win"));
    map.insert(KeyCode::RIGHT_GUI, KeyInfo::new("RightMeta", "Win"));
    map.insert(KeyCode::MENU, KeyInfo::new("Menu", "Menu"));
    map.insert(KeyCode::CAPS_LOCK, KeyInfo::new("CapsLock", "Caps"));
    map.insert(KeyCode::NUM_LOCK, KeyInfo::new("NumLock", "Num"));
    map.insert(KeyCode::SCROLL_LOCK, KeyInfo::new("ScrollLock", "ScrLk"));
    map.insert(KeyCode::PRINT_SCREEN, KeyInfo::new("PrintScreen", "PrtSc"));

    // Arrow keys
    map.insert(KeyCode::UP, KeyInfo::new("Up", "↑"));
    map.insert(KeyCode::DOWN, KeyInfo::new("Down", "↓"));
    map.insert(KeyCode::LEFT, KeyInfo::new("Left", "←"));
    map.insert(KeyCode::RIGHT, KeyInfo::new("Right", "→"));

    // Navigation cluster
    map.insert(KeyCode::INSERT, KeyInfo::new("Insert", "Ins"));
    map.insert(KeyCode::DELETE, KeyInfo::new("Delete", "Del"));
    map.insert(KeyCode::HOME, KeyInfo::new("Home", "Home"));
    map.insert(KeyCode::END, KeyInfo::new("End", "End"));
    map.insert(KeyCode::PAGE_UP, KeyInfo::new("PageUp", "PgUp"));
    map.insert(KeyCode::PAGE_DOWN, KeyInfo::new("PageDown", "PgDn"));

    // Keypad
    map.insert(KeyCode::KEYPAD_0, KeyInfo::new("Keypad0", "KP0"));
    map.insert(KeyCode::KEYPAD_1, KeyInfo::new("Keypad1", "KP1"));
    map.insert(KeyCode::KEYPAD_2, KeyInfo::new("Keypad2", "KP2"));
    map.insert(KeyCode::KEYPAD_3, KeyInfo::new("Keypad3", "KP3"));
    map.insert(KeyCode::KEYPAD_4, KeyInfo::new("Keypad4", "KP4"));
    map.insert(KeyCode::KEYPAD_5, KeyInfo::new("Keypad5", "KP5"));
    map.insert(KeyCode::KEYPAD_6, KeyInfo::new("Keypad6", "KP6"));
    map.insert(KeyCode::KEYPAD_7, KeyInfo::new("Keypad7", "KP7"));
    map.insert(KeyCode::KEYPAD_8, KeyInfo::new("Keypad8", "KP8"));
    map.insert(KeyCode::KEYPAD_9, KeyInfo::new("Keypad9", "KP9"));
    map.insert(KeyCode::KEYPAD_PERIOD, KeyInfo::new("KeypadPeriod", "KP."));
    map.insert(KeyCode::KEYPAD_PLUS, KeyInfo::new("KeypadPlus", "KP+"));
    map.insert(KeyCode::KEYPAD_MINUS, KeyInfo::new("KeypadMinus", "KP-"));
    map.insert(KeyCode::KEYPAD_STAR, KeyInfo::new("KeypadMultiply", "KP*"));
    map.insert(KeyCode::KEYPAD_SLASH, KeyInfo::new("KeypadDivide", "KP/"));
    map.insert(KeyCode::KEYPAD_ENTER, KeyInfo::new("KeypadEnter", "KPEnt"));

    map
});

/// Get key info by code, returns a default if not found
pub fn get_key_info(code: KeyCode) -> KeyInfo {
    KEYMAP
        .get(&code)
        .cloned()
        .unwrap_or_else(|| KeyInfo::new("Unknown", "?"))
}

/// Human-readable name of a key code
///
/// Printable keys are named by their character (`'a'`, `'1'`, `Space`).
pub fn describe(code: KeyCode) -> String {
    match code {
        KeyCode::SPACE => "Space".to_string(),
        c if c.is_printable() => format!("'{}'", c.0 as char),
        c => get_key_info(c).name.to_string(),
    }
}
