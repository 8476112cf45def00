//! Address handlers
//!
//! One function per screen address. Each reads the subcommand (first data
//! word) and ignores subcommands it does not know, so several entries may
//! share an address.

pub mod adjust;
pub mod motion;
pub mod print;
pub mod temperature;

/// Machine axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// G-code letter
    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }

    /// Index into position arrays
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Key for the `i`-th slot of an indexed widget, e.g. `file1.t3.txt`
pub(crate) fn slot_key(prefix: &str, index: usize, suffix: &str) -> heapless::String<32> {
    use core::fmt::Write;

    let mut key = heapless::String::new();
    let _ = write!(key, "{}{}{}", prefix, index, suffix);
    key
}
