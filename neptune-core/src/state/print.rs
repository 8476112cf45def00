//! Print job state and the page changes it drives

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// State of the print job as reported by the printer host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrintState {
    #[default]
    Standby,
    Printing,
    Paused,
    Complete,
    Cancelled,
    Error,
}

impl PrintState {
    /// Parse the host's state name; unknown names map to `Standby`
    pub fn from_name(name: &str) -> Self {
        match name {
            "printing" => PrintState::Printing,
            "paused" => PrintState::Paused,
            "complete" => PrintState::Complete,
            "cancelled" => PrintState::Cancelled,
            "error" => PrintState::Error,
            _ => PrintState::Standby,
        }
    }

    /// Whether a job is in progress (printing or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, PrintState::Printing | PrintState::Paused)
    }

    /// Page to show when the job moves from `self` to `next`
    ///
    /// Returns `None` when the state did not change or the change has no page
    /// of its own.
    pub fn transition_page(self, next: PrintState) -> Option<&'static str> {
        use PrintState::*;

        match (self, next) {
            (a, b) if a == b => None,
            (_, Printing) => Some("printpause"),
            (Printing | Paused, Complete) => Some("printfinish"),
            (_, Cancelled | Error) => Some("main"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(PrintState::from_name("printing"), PrintState::Printing);
        assert_eq!(PrintState::from_name("cancelled"), PrintState::Cancelled);
        assert_eq!(PrintState::from_name("bogus"), PrintState::Standby);
    }

    #[test]
    fn test_transition_pages() {
        use PrintState::*;

        assert_eq!(Standby.transition_page(Printing), Some("printpause"));
        assert_eq!(Printing.transition_page(Complete), Some("printfinish"));
        assert_eq!(Paused.transition_page(Complete), Some("printfinish"));
        assert_eq!(Printing.transition_page(Cancelled), Some("main"));
        assert_eq!(Paused.transition_page(Error), Some("main"));

        assert_eq!(Printing.transition_page(Printing), None);
        assert_eq!(Printing.transition_page(Paused), None);
        assert_eq!(Standby.transition_page(Complete), None);
        assert_eq!(Complete.transition_page(Standby), None);
    }

    #[test]
    fn test_is_active() {
        assert!(PrintState::Printing.is_active());
        assert!(PrintState::Paused.is_active());
        assert!(!PrintState::Complete.is_active());
    }
}
