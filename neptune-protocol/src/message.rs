//! Message model for display-originated frames
//!
//! A frame payload carries one variable access:
//! - `payload[0]`: command (0x82 write-var, 0x83 read-var acknowledgement)
//! - `payload[1..3]`: variable address, big-endian
//! - `payload[3]`: declared data length in words (informational)
//! - `payload[4..]`: data words, big-endian, two bytes each
//!
//! The declared length is not used to bound parsing; the frame length is
//! trusted instead. [`Message::declared_length_matches`] reports whether the
//! two agree.

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

/// Bytes before the data region (command + address + data length)
pub const MESSAGE_HEADER_SIZE: usize = 4;

/// Maximum number of data words a single frame can carry
pub const MAX_DATA_WORDS: usize = (MAX_PAYLOAD_SIZE - MESSAGE_HEADER_SIZE) / 2;

// Command byte values
const CMD_WRITE_VAR: u8 = 0x82;
const CMD_READ_VAR_ACK: u8 = 0x83;

/// Errors that can occur while decoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Payload shorter than command + address + length byte
    TooShort { len: usize },
    /// Data region has a dangling odd byte
    OddDataLength { len: usize },
}

/// Command byte of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Display wrote a variable
    WriteVar,
    /// Display acknowledged a variable read; this is what touch events use
    ReadVarAck,
    /// Anything else the display may send
    Unknown(u8),
}

impl Command {
    /// Parse a command from its wire format byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            CMD_WRITE_VAR => Command::WriteVar,
            CMD_READ_VAR_ACK => Command::ReadVarAck,
            other => Command::Unknown(other),
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::WriteVar => CMD_WRITE_VAR,
            Command::ReadVarAck => CMD_READ_VAR_ACK,
            Command::Unknown(byte) => byte,
        }
    }
}

/// A decoded variable access from the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Command byte
    pub command: Command,
    /// Variable address, the primary dispatch key
    pub address: u16,
    /// Data length as declared by the display, in words
    pub declared_words: u8,
    /// Data words
    pub data: Vec<u16, MAX_DATA_WORDS>,
}

impl Message {
    /// Create a message from its parts
    pub fn new(command: Command, address: u16, data: &[u16]) -> Result<Self, FrameError> {
        let mut words = Vec::new();
        words
            .extend_from_slice(data)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            command,
            address,
            declared_words: words.len() as u8,
            data: words,
        })
    }

    /// Decode a message from a frame payload
    pub fn decode(payload: &[u8]) -> Result<Self, MessageError> {
        if payload.len() < MESSAGE_HEADER_SIZE {
            return Err(MessageError::TooShort { len: payload.len() });
        }

        let region = &payload[MESSAGE_HEADER_SIZE..];
        if region.len() % 2 != 0 {
            return Err(MessageError::OddDataLength { len: region.len() });
        }

        let mut data = Vec::new();
        for pair in region.chunks_exact(2) {
            // At most 125 pairs fit in a 255 byte payload
            let _ = data.push(u16::from_be_bytes([pair[0], pair[1]]));
        }

        Ok(Self {
            command: Command::from_byte(payload[0]),
            address: u16::from_be_bytes([payload[1], payload[2]]),
            declared_words: payload[3],
            data,
        })
    }

    /// Decode a message from a complete frame
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        Self::decode(&frame.payload)
    }

    /// The secondary dispatch key (first data word), if any
    pub fn subcommand(&self) -> Option<u16> {
        self.data.first().copied()
    }

    /// Whether the declared word count agrees with the words actually parsed
    pub fn declared_length_matches(&self) -> bool {
        self.declared_words as usize == self.data.len()
    }

    /// Encode this message into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        payload
            .push(self.command.to_byte())
            .map_err(|_| FrameError::PayloadTooLarge)?;
        payload
            .extend_from_slice(&self.address.to_be_bytes())
            .map_err(|_| FrameError::PayloadTooLarge)?;
        payload
            .push(self.declared_words)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        for word in &self.data {
            payload
                .extend_from_slice(&word.to_be_bytes())
                .map_err(|_| FrameError::PayloadTooLarge)?;
        }

        Frame::new(&payload)
    }
}
