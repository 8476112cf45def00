//! Neptune Screen Serial Protocol
//!
//! This crate defines the wire formats spoken between the printer host and the
//! Neptune touchscreen controller. The two directions use different encodings:
//!
//! # Display → Host
//!
//! Touch events arrive as binary DGUS-style frames:
//! ```text
//! ┌──────┬──────┬────────┬─────────┬─────────┬──────────┬──────────────┐
//! │ 0x5A │ 0xA5 │ LENGTH │ COMMAND │ ADDRESS │ DATA LEN │ DATA WORDS   │
//! │ 1B   │ 1B   │ 1B     │ 1B      │ 2B (BE) │ 1B       │ 2B each (BE) │
//! └──────┴──────┴────────┴─────────┴─────────┴──────────┴──────────────┘
//!                         └──────────────── payload ─────────────────┘
//! ```
//!
//! # Host → Display
//!
//! Screen updates are ASCII text lines (`key=value`, `key="text"`,
//! `page name`) terminated by a configurable end-of-line sequence and sent in
//! fixed-size chunks.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod address;
pub mod frame;
pub mod message;
pub mod text;

pub use frame::{Frame, FrameError, FrameParser, HEADER_BYTE_1, HEADER_BYTE_2, MAX_PAYLOAD_SIZE};
pub use message::{Command, Message, MessageError, MAX_DATA_WORDS};
pub use text::{Eol, Line, TextError, CHUNK_SIZE};
