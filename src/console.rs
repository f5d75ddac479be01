//! Display boundary used for echo
//!
//! Output only; a console never reports back to its caller. Write errors
//! are logged and swallowed.

use crossterm::{cursor, queue, style::Print};
use std::io::{self, Write};

pub trait Console {
    fn put_char(&mut self, c: u8);

    /// Erase the character before the cursor
    fn backspace(&mut self);

    fn write_string(&mut self, s: &str);
}

impl<C: Console + ?Sized> Console for &mut C {
    fn put_char(&mut self, c: u8) {
        (**self).put_char(c)
    }

    fn backspace(&mut self) {
        (**self).backspace()
    }

    fn write_string(&mut self, s: &str) {
        (**self).write_string(s)
    }
}

/// Console on a real terminal, driven through crossterm
pub struct TerminalConsole<W: Write> {
    out: W,
}

impl TerminalConsole<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, result: io::Result<()>) {
        if let Err(e) = result.and_then(|_| self.out.flush()) {
            log::warn!("console write failed: {e}");
        }
    }
}

impl<W: Write> Console for TerminalConsole<W> {
    fn put_char(&mut self, c: u8) {
        let result = queue!(self.out, Print(c as char));
        self.emit(result);
    }

    fn backspace(&mut self) {
        let result = queue!(
            self.out,
            cursor::MoveLeft(1),
            Print(' '),
            cursor::MoveLeft(1)
        );
        self.emit(result);
    }

    fn write_string(&mut self, s: &str) {
        let result = queue!(self.out, Print(s));
        self.emit(result);
    }
}

/// In-memory console that keeps what a terminal would show
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    text: String,
    backspaces: usize,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of backspace requests, including ones with nothing to erase
    pub fn backspaces(&self) -> usize {
        self.backspaces
    }
}

impl Console for BufferConsole {
    fn put_char(&mut self, c: u8) {
        self.text.push(c as char);
    }

    fn backspace(&mut self) {
        self.backspaces += 1;
        self.text.pop();
    }

    fn write_string(&mut self, s: &str) {
        self.text.push_str(s);
    }
}
