//! Text captures of raw keyboard bytes
//!
//! A capture is a list of hex bytes separated by whitespace or commas, with
//! an optional `0x` prefix on each byte. `#` starts a comment that runs to
//! the end of the line.
//!
//! ```
//! use ps2_keyboard::capture::parse_capture;
//!
//! let bytes = parse_capture("33 f0 33  # h\n0x5A").unwrap();
//! assert_eq!(bytes, vec![0x33, 0xF0, 0x33, 0x5A]);
//! ```

use thiserror::Error;

/// Error type for capture parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("line {line}: {token:?} is not a hex byte")]
    InvalidByte { line: usize, token: String },
}

/// Parse a capture into raw bytes
pub fn parse_capture(text: &str) -> Result<Vec<u8>, CaptureError> {
    let mut bytes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("");
        for token in content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            let byte = u8::from_str_radix(digits, 16).map_err(|_| CaptureError::InvalidByte {
                line: idx + 1,
                token: token.to_string(),
            })?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}
