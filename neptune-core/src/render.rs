//! Outbound renderer
//!
//! Formats screen updates as text lines and writes them to the transport in
//! fixed-size chunks. Holds no state of its own beyond the line settings.

use core::fmt::Display;

use neptune_protocol::{Eol, Line, TextError};

use crate::traits::{Transport, TransportError};

/// Errors that can occur while rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Line could not be formatted
    Text(TextError),
    /// Transport refused a chunk
    Transport(TransportError),
}

impl From<TextError> for RenderError {
    fn from(err: TextError) -> Self {
        RenderError::Text(err)
    }
}

impl From<TransportError> for RenderError {
    fn from(err: TransportError) -> Self {
        RenderError::Transport(err)
    }
}

/// Writes screen updates to a transport
pub struct Renderer<'a> {
    transport: &'a mut dyn Transport,
    eol: &'a Eol,
    chunk_size: usize,
    alert: &'a str,
}

impl<'a> Renderer<'a> {
    /// Create a renderer
    ///
    /// A `chunk_size` of zero is treated as one.
    pub fn new(transport: &'a mut dyn Transport, eol: &'a Eol, chunk_size: usize, alert: &'a str) -> Self {
        Self {
            transport,
            eol,
            chunk_size: chunk_size.max(1),
            alert,
        }
    }

    /// `key=value`
    pub fn set_numeric(&mut self, key: &str, value: impl Display) -> Result<(), RenderError> {
        self.send_line(&Line::numeric(key, value)?)
    }

    /// `key="value"`
    pub fn set_text(&mut self, key: &str, value: impl Display) -> Result<(), RenderError> {
        self.send_line(&Line::text(key, value)?)
    }

    /// `page name`
    pub fn change_page(&mut self, name: &str) -> Result<(), RenderError> {
        self.send_line(&Line::page(name)?)
    }

    /// A verbatim command; text after `//` is dropped and empty commands are
    /// not sent
    pub fn send_raw(&mut self, command: &str) -> Result<(), RenderError> {
        match Line::raw(command)? {
            Some(line) => self.send_line(&line),
            None => Ok(()),
        }
    }

    /// The configured audible alert
    pub fn alert(&mut self) -> Result<(), RenderError> {
        let alert = self.alert;
        self.send_raw(alert)
    }

    /// Transmit one line in chunks, in order
    pub fn send_line(&mut self, line: &Line) -> Result<(), RenderError> {
        trace!("tx {=str}", line.as_str());

        let wire = line.to_wire(self.eol);
        for chunk in wire.chunks(self.chunk_size) {
            self.transport.send(chunk)?;
        }
        self.transport.flush()?;
        Ok(())
    }
}
