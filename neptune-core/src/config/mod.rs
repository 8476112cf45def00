//! Screen configuration
//!
//! Types plus a small loader for the `[neptune_screen]` and `[serial_bridge]`
//! sections of the printer configuration.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
