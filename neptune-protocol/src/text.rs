//! Text commands for the host → display direction
//!
//! The display is driven with ASCII command lines:
//! - `key=value` sets a numeric variable
//! - `key="value"` sets a text variable
//! - `page name` switches the visible page
//! - anything else is passed through verbatim (e.g. `com_star`)
//!
//! Each line is terminated by a configurable end-of-line sequence and sent in
//! [`CHUNK_SIZE`] byte segments. The end-of-line is configured as text and may
//! contain `\xHH` escapes, which are expanded to raw bytes.

use core::fmt::{Display, Write};

use heapless::{String, Vec};

/// Transport segment size in bytes
pub const CHUNK_SIZE: usize = 40;

/// Maximum length of a single command line, without end-of-line
pub const MAX_LINE_LEN: usize = 192;

/// Maximum length of the expanded end-of-line sequence
pub const MAX_EOL_LEN: usize = 8;

/// Maximum encoded line size (line + end-of-line)
pub const MAX_WIRE_LEN: usize = MAX_LINE_LEN + MAX_EOL_LEN;

/// Marker after which raw command text is ignored
const COMMENT_MARKER: &str = "//";

/// Errors that can occur while building outbound text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextError {
    /// Malformed `\` escape in the end-of-line configuration
    InvalidEscape,
    /// Expanded end-of-line exceeds [`MAX_EOL_LEN`]
    EolTooLong,
    /// Formatted line exceeds [`MAX_LINE_LEN`]
    LineTooLong,
}

/// Expanded end-of-line sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eol {
    bytes: Vec<u8, MAX_EOL_LEN>,
}

impl Default for Eol {
    fn default() -> Self {
        Self::newline()
    }
}

impl Eol {
    /// A single `\n`
    pub fn newline() -> Self {
        let mut bytes = Vec::new();
        let _ = bytes.push(b'\n');
        Self { bytes }
    }

    /// Expand a configured end-of-line string
    ///
    /// Supports `\xHH`, `\n`, `\r` and `\\`; every other character is taken
    /// as its UTF-8 bytes.
    pub fn parse(config: &str) -> Result<Self, TextError> {
        let mut bytes = Vec::new();
        let mut rest = config.as_bytes();

        while let Some((&first, tail)) = rest.split_first() {
            let (byte, tail) = if first == b'\\' {
                match tail {
                    [b'x', hi, lo, tail @ ..] => (hex_pair(*hi, *lo)?, tail),
                    [b'n', tail @ ..] => (b'\n', tail),
                    [b'r', tail @ ..] => (b'\r', tail),
                    [b'\\', tail @ ..] => (b'\\', tail),
                    _ => return Err(TextError::InvalidEscape),
                }
            } else {
                (first, tail)
            };

            bytes.push(byte).map_err(|_| TextError::EolTooLong)?;
            rest = tail;
        }

        Ok(Self { bytes })
    }

    /// Raw bytes appended after each line
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn hex_pair(hi: u8, lo: u8) -> Result<u8, TextError> {
    let digit = |c: u8| (c as char).to_digit(16).ok_or(TextError::InvalidEscape);
    Ok((digit(hi)? << 4 | digit(lo)?) as u8)
}

/// A single outbound command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String<MAX_LINE_LEN>,
}

impl Line {
    /// `key=value`
    pub fn numeric(key: &str, value: impl Display) -> Result<Self, TextError> {
        Self::format(format_args!("{}={}", key, value))
    }

    /// `key="value"`
    pub fn text(key: &str, value: impl Display) -> Result<Self, TextError> {
        Self::format(format_args!("{}=\"{}\"", key, value))
    }

    /// `page name`
    pub fn page(name: &str) -> Result<Self, TextError> {
        Self::format(format_args!("page {}", name))
    }

    /// A verbatim command
    ///
    /// Text from a `//` marker onward is dropped; returns `None` if nothing
    /// is left to send.
    pub fn raw(command: &str) -> Result<Option<Self>, TextError> {
        let command = match command.find(COMMENT_MARKER) {
            Some(pos) => &command[..pos],
            None => command,
        };
        if command.is_empty() {
            return Ok(None);
        }
        Self::format(format_args!("{}", command)).map(Some)
    }

    fn format(args: core::fmt::Arguments<'_>) -> Result<Self, TextError> {
        let mut text = String::new();
        text.write_fmt(args).map_err(|_| TextError::LineTooLong)?;
        Ok(Self { text })
    }

    /// The command text without end-of-line
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Bytes to transmit: the line followed by the end-of-line sequence
    ///
    /// Split the result with `.chunks(CHUNK_SIZE)` for transmission; chunk
    /// order is byte order.
    pub fn to_wire(&self, eol: &Eol) -> Vec<u8, MAX_WIRE_LEN> {
        let mut wire = Vec::new();
        // MAX_WIRE_LEN covers the longest line plus the longest eol
        let _ = wire.extend_from_slice(self.text.as_bytes());
        let _ = wire.extend_from_slice(eol.as_bytes());
        wire
    }
}
