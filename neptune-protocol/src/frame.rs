//! Frame encoding and decoding for the display → host direction.
//!
//! Frame format:
//! - HEADER (2 bytes): 0x5A 0xA5 synchronization pair
//! - LENGTH (1 byte): payload length (0-255)
//! - PAYLOAD (LENGTH bytes): command, address and data words (see [`crate::message`])
//!
//! There is no checksum. Reliability is the transport's job; the parser only
//! has to resynchronize on the next header pair after garbage.

use heapless::Vec;

/// First synchronization byte
pub const HEADER_BYTE_1: u8 = 0x5A;

/// Second synchronization byte
pub const HEADER_BYTE_2: u8 = 0xA5;

/// Maximum payload size in bytes (the length field is a single byte)
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Maximum complete frame size (HEADER + LENGTH + MAX_PAYLOAD)
pub const MAX_FRAME_SIZE: usize = 2 + 1 + MAX_PAYLOAD_SIZE;

/// Errors that can occur while building or encoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A length-delimited unit recovered from the byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Payload data; its length is the frame's LENGTH byte
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given payload
    pub fn new(payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty() -> Self {
        Self {
            payload: Vec::new(),
        }
    }

    /// The LENGTH byte of this frame
    pub fn length(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written. Only the display produces these
    /// frames; the host uses this for simulation and tests.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = 3 + self.payload.len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = HEADER_BYTE_1;
        buffer[1] = HEADER_BYTE_2;
        buffer[2] = self.length();
        buffer[3..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// State machine for parsing incoming frames
///
/// Partial frames survive across calls, so bytes may be fed in chunks of any
/// size (down to one byte at a time) without changing the frames produced.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for 0x5A
    AwaitingHeader1,
    /// Got 0x5A, waiting for 0xA5
    ///
    /// Any byte other than 0xA5 or 0x5A drops back to `AwaitingHeader1`. A
    /// further 0x5A stays here, so a stray 0x5A directly in front of a real
    /// header pair cannot swallow the frame that follows.
    AwaitingHeader2,
    /// Got the header pair, waiting for LENGTH
    AwaitingLength,
    /// Reading payload bytes
    AwaitingPayload { remaining: u8 },
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub const fn new() -> Self {
        Self {
            state: ParseState::AwaitingHeader1,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state, discarding any partial frame
    pub fn reset(&mut self) {
        self.state = ParseState::AwaitingHeader1;
        self.buffer.clear();
    }

    /// Whether the parser is in the middle of a frame
    pub fn is_mid_frame(&self) -> bool {
        self.state != ParseState::AwaitingHeader1
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Some(frame)` when this byte completes a frame. Bytes that do
    /// not fit the expected sequence are dropped and the parser falls back to
    /// hunting for a header; this never fails.
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            ParseState::AwaitingHeader1 => {
                if byte == HEADER_BYTE_1 {
                    self.state = ParseState::AwaitingHeader2;
                }
                None
            }
            ParseState::AwaitingHeader2 => {
                self.state = match byte {
                    HEADER_BYTE_2 => ParseState::AwaitingLength,
                    // A repeated 0x5A may itself be the start of the real header
                    HEADER_BYTE_1 => ParseState::AwaitingHeader2,
                    _ => ParseState::AwaitingHeader1,
                };
                None
            }
            ParseState::AwaitingLength => {
                self.buffer.clear();
                if byte == 0 {
                    self.state = ParseState::AwaitingHeader1;
                    return Some(Frame::empty());
                }
                self.state = ParseState::AwaitingPayload { remaining: byte };
                None
            }
            ParseState::AwaitingPayload { remaining } => {
                // Capacity is 255 and LENGTH is a u8, so this cannot overflow
                let _ = self.buffer.push(byte);
                if remaining > 1 {
                    self.state = ParseState::AwaitingPayload {
                        remaining: remaining - 1,
                    };
                    return None;
                }

                self.state = ParseState::AwaitingHeader1;
                Some(Frame {
                    payload: core::mem::replace(&mut self.buffer, Vec::new()),
                })
            }
        }
    }

    /// Feed a chunk of bytes to the parser
    ///
    /// Returns an iterator over every frame completed by this chunk, in the
    /// order their final byte arrives. The chunk is only fully consumed once
    /// the iterator is exhausted.
    pub fn feed_bytes<'p, 'b>(&'p mut self, bytes: &'b [u8]) -> Frames<'p, 'b> {
        Frames {
            parser: self,
            bytes: bytes.iter(),
        }
    }
}

/// Iterator over the frames completed by one chunk of input
pub struct Frames<'p, 'b> {
    parser: &'p mut FrameParser,
    bytes: core::slice::Iter<'b, u8>,
}

impl Iterator for Frames<'_, '_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            if let Some(frame) = self.parser.feed(byte) {
                return Some(frame);
            }
        }
        None
    }
}
