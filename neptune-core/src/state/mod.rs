//! Screen-side state
//!
//! Everything the handlers remember between touch events: step sizes, the
//! active adjustment targets, the cached file listing and the last print
//! state seen by the status push.

pub mod files;
pub mod interaction;
pub mod print;

pub use files::{FileEntry, FileListing, FileName, ListingError, MAX_FILENAME_LEN, MAX_FILES};
pub use interaction::{
    Direction, InteractionState, JogStep, SpeedAdjustment, SpeedTarget, StepPreset, ZOffsetStep,
};
pub use print::PrintState;
