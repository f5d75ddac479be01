//! PS/2 keyboard input core
//!
//! Decodes a raw scancode set 2 byte stream into key events, tracks the
//! shift/ctrl/alt latches, publishes events to subscribers over a topic
//! bus, and provides a blocking line editor on top of the event stream.

pub mod bus;
pub mod capture;
pub mod config;
pub mod console;
pub mod keyboard;
pub mod line_editor;
pub mod report;

pub use config::Config;
pub use line_editor::{read_line, Line, LineError};
