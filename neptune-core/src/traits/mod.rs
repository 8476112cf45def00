//! Collaborator traits
//!
//! These traits define the interface between the screen logic and the
//! printer host it is embedded in. Motion, heaters, fans, LEDs, the probe,
//! print jobs and the serial link all live behind them.

pub mod executor;
pub mod printer;
pub mod transport;

pub use executor::{CommandError, CommandExecutor};
pub use printer::{Heater, HeaterStatus, LedStatus, MotionStatus, PrintStats, Printer};
pub use transport::{Transport, TransportError};
