//! Command execution trait

/// Errors reported when the host refuses or fails a command script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The script was parsed and rejected (unknown command, bad parameter)
    Rejected,
    /// The host is not ready (e.g. not homed, shut down)
    NotReady,
    /// The host could not accept the script right now
    Busy,
}

/// Executes G-code style command scripts on the printer host
///
/// Scripts may contain several commands separated by `\n`.
pub trait CommandExecutor {
    /// Run a script to completion
    fn run_script(&mut self, script: &str) -> Result<(), CommandError>;
}
