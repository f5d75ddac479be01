//! PS/2 keyboard decoding, modifier state and the input pump

mod event;
mod state;
pub mod driver;
pub mod keymap;
pub mod port;
pub mod pump;
pub mod translator;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use driver::{get_next_key_event, DriverError, KeyboardDriver};
pub use event::KeyEvent;
pub use keymap::{get_key_info, KeyCode, KeyInfo, KEYMAP};
pub use port::{ChannelPort, PortError, PortFeeder, Ps2Port};
pub use pump::{InputPump, PumpStats, ScancodeDecoder};
pub use state::ModifierState;
pub use translator::{decode, shift_char, ScancodeTranslator};
