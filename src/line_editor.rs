//! Blocking line input on top of the key event stream

use crate::bus::{BusError, Subscriber};
use crate::console::Console;
use crate::keyboard::{get_next_key_event, KeyCode, KeyEvent};
use std::borrow::Cow;
use thiserror::Error;

/// Length reported when the output buffer could not be allocated
pub const ALLOC_FAILED_LEN: usize = usize::MAX;

/// Error type for line reads
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("could not allocate {requested} bytes for the line")]
    AllocationFailed { requested: usize },
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl LineError {
    /// Length to report to callers that expect a sentinel instead of an
    /// error value
    pub fn reported_len(&self) -> usize {
        match self {
            LineError::AllocationFailed { .. } => ALLOC_FAILED_LEN,
            LineError::Bus(_) => 0,
        }
    }
}

/// A completed line, sized exactly to its contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
}

impl Line {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// What a single key event did to the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Ignored,
    Appended(u8),
    Erased,
    Finished,
}

/// Accumulates characters from key events.
///
/// Only presses matter. Enter finishes the line, backspace removes the last
/// character if there is one, and any other printable key appends its
/// character.
#[derive(Debug, Clone)]
pub struct LineEditor<C> {
    buffer: Vec<u8>,
    console: C,
    echo: bool,
}

impl<C: Console> LineEditor<C> {
    pub fn new(console: C) -> Self {
        Self {
            buffer: Vec::new(),
            console,
            echo: true,
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Apply one key event
    pub fn handle(&mut self, event: &KeyEvent) -> EditAction {
        if !event.is_press() {
            return EditAction::Ignored;
        }

        if event.keycode == KeyCode::ENTER {
            if self.echo {
                self.console.put_char(b'\n');
            }
            EditAction::Finished
        } else if event.keycode == KeyCode::BACKSPACE {
            if self.buffer.pop().is_none() {
                return EditAction::Ignored;
            }
            if self.echo {
                self.console.backspace();
            }
            EditAction::Erased
        } else if event.is_ascii {
            self.buffer.push(event.character);
            if self.echo {
                self.console.put_char(event.character);
            }
            EditAction::Appended(event.character)
        } else {
            EditAction::Ignored
        }
    }

    /// Characters collected so far
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Copy the collected characters into an exactly-sized line
    pub fn finish(self) -> Result<Line, LineError> {
        let bytes = copy_with_capacity(&self.buffer, self.buffer.len())?;
        Ok(Line { bytes })
    }

    /// Read key events from `subscriber` until Enter
    pub fn read(mut self, subscriber: &Subscriber) -> Result<Line, LineError> {
        loop {
            let event = get_next_key_event(subscriber)?;
            if self.handle(&event) == EditAction::Finished {
                break;
            }
        }
        self.finish()
    }
}

/// Copy `bytes` into a fresh buffer of exactly `capacity` bytes.
///
/// `capacity` must be at least `bytes.len()`.
fn copy_with_capacity(bytes: &[u8], capacity: usize) -> Result<Vec<u8>, LineError> {
    let mut out = Vec::new();
    out.try_reserve_exact(capacity)
        .map_err(|_| LineError::AllocationFailed {
            requested: capacity,
        })?;
    out.extend_from_slice(bytes);
    Ok(out)
}

/// Read one line from `subscriber`, echoing to `console`
pub fn read_line<C: Console>(subscriber: &Subscriber, console: C) -> Result<Line, LineError> {
    LineEditor::new(console).read(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{ChannelMode, Message, MessageBus, KEYPRESS_TOPIC};
    use crate::console::BufferConsole;
    use crate::keyboard::test_helpers::{make_event, press, release, tap};

    fn feed(events: &[KeyEvent]) -> (Result<Line, LineError>, BufferConsole) {
        let bus = MessageBus::new();
        bus.register_channel(KEYPRESS_TOPIC, ChannelMode::Multicast, "test")
            .unwrap();
        let sub = bus.subscribe("line");
        sub.set_listen_status(KEYPRESS_TOPIC, true);
        for event in events {
            bus.send(Message::key_event(*event)).unwrap();
        }
        drop(bus);

        let mut console = BufferConsole::new();
        let line = read_line(&sub, &mut console);
        (line, console)
    }

    #[test]
    fn reads_hi() {
        let (line, console) = feed(&[
            press(KeyCode(b'h')),
            press(KeyCode(b'i')),
            press(KeyCode::ENTER),
        ]);
        let line = line.expect("line");
        assert_eq!(line.as_bytes(), b"hi");
        assert_eq!(line.len(), 2);
        assert_eq!(console.text(), "hi\n");
    }

    #[test]
    fn backspace_removes_last_character() {
        let (line, console) = feed(&[
            press(KeyCode(b'h')),
            press(KeyCode::BACKSPACE),
            press(KeyCode::ENTER),
        ]);
        let line = line.expect("line");
        assert!(line.is_empty());
        assert_eq!(line.len(), 0);
        assert_eq!(console.text(), "\n");
        assert_eq!(console.backspaces(), 1);
    }

    #[test]
    fn backspace_on_empty_line_is_a_no_op() {
        let (line, console) = feed(&[
            press(KeyCode::BACKSPACE),
            press(KeyCode::BACKSPACE),
            press(KeyCode(b'a')),
            press(KeyCode::ENTER),
        ]);
        assert_eq!(line.expect("line").as_bytes(), b"a");
        assert_eq!(console.backspaces(), 0);
    }

    #[test]
    fn releases_are_ignored() {
        let mut events = Vec::new();
        events.extend(tap(KeyCode(b'o')));
        events.extend(tap(KeyCode(b'k')));
        events.push(release(KeyCode::ENTER));
        events.push(press(KeyCode::ENTER));
        let (line, _) = feed(&events);
        assert_eq!(line.expect("line").as_bytes(), b"ok");
    }

    #[test]
    fn uses_shifted_character() {
        let (line, _) = feed(&[
            make_event(KeyCode(b'h'), b'H', true, false),
            press(KeyCode(b'i')),
            make_event(KeyCode(b'1'), b'!', true, false),
            press(KeyCode::ENTER),
        ]);
        assert_eq!(line.expect("line").to_string_lossy(), "Hi!");
    }

    #[test]
    fn non_printable_presses_are_ignored() {
        let (line, console) = feed(&[
            press(KeyCode::LEFT_SHIFT),
            press(KeyCode::UP),
            press(KeyCode::UNKNOWN),
            press(KeyCode::KEYPAD_ENTER),
            press(KeyCode(b'x')),
            press(KeyCode::ENTER),
        ]);
        assert_eq!(line.expect("line").as_bytes(), b"x");
        assert_eq!(console.text(), "x\n");
    }

    #[test]
    fn echo_can_be_disabled() {
        let mut console = BufferConsole::new();
        let mut editor = LineEditor::new(&mut console).with_echo(false);
        assert_eq!(editor.handle(&press(KeyCode(b'a'))), EditAction::Appended(b'a'));
        assert_eq!(editor.handle(&press(KeyCode::BACKSPACE)), EditAction::Erased);
        assert_eq!(editor.handle(&press(KeyCode::ENTER)), EditAction::Finished);
        drop(editor);
        assert_eq!(console.text(), "");
    }

    #[test]
    fn finished_line_is_exactly_sized() {
        let mut editor = LineEditor::new(BufferConsole::new());
        for c in b"abc" {
            editor.handle(&press(KeyCode(*c)));
        }
        assert_eq!(editor.pending(), b"abc");
        let bytes = editor.finish().expect("line").into_bytes();
        assert_eq!(bytes.len(), 3);
        assert_eq!(bytes.capacity(), 3);
    }

    #[test]
    fn disconnect_before_enter_is_an_error() {
        let (line, _) = feed(&[press(KeyCode(b'a'))]);
        assert_eq!(line, Err(LineError::Bus(BusError::Disconnected)));
    }

    #[test]
    fn allocation_failure_reports_sentinel_length() {
        // Larger than isize::MAX, so the reservation is refused up front
        let err = copy_with_capacity(b"abc", usize::MAX).unwrap_err();
        assert_eq!(
            err,
            LineError::AllocationFailed {
                requested: usize::MAX
            }
        );
        assert_eq!(err.reported_len(), ALLOC_FAILED_LEN);
        assert_eq!(LineError::Bus(BusError::Disconnected).reported_len(), 0);
    }
}
