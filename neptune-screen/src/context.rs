//! Handler context
//!
//! Everything a handler may touch, passed explicitly on every dispatch.

use neptune_core::config::ScreenConfig;
use neptune_core::queue::{action, CommandSink, Continuation, QueueError};
use neptune_core::render::{RenderError, Renderer};
use neptune_core::state::InteractionState;
use neptune_core::traits::Printer;

/// Errors a handler can report to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandlerError {
    /// A screen update could not be sent
    Render(RenderError),
    /// A printer command could not be queued
    Queue(QueueError),
}

impl From<RenderError> for HandlerError {
    fn from(err: RenderError) -> Self {
        HandlerError::Render(err)
    }
}

impl From<QueueError> for HandlerError {
    fn from(err: QueueError) -> Self {
        HandlerError::Queue(err)
    }
}

/// State and collaborators available to handlers
pub struct Context<'a> {
    pub state: &'a mut InteractionState,
    pub printer: &'a dyn Printer,
    pub commands: &'a dyn CommandSink,
    pub renderer: Renderer<'a>,
    pub config: &'a ScreenConfig,
}

impl Context<'_> {
    /// Queue a formatted printer command
    pub fn run(&self, args: core::fmt::Arguments<'_>) -> Result<(), HandlerError> {
        self.run_then(args, None)
    }

    /// Queue a formatted printer command with a continuation
    pub fn run_then(
        &self,
        args: core::fmt::Arguments<'_>,
        completion: Option<Continuation>,
    ) -> Result<(), HandlerError> {
        let text = action(args)?;
        self.commands.enqueue(&text, completion)?;
        Ok(())
    }

    /// Whether a print job is printing or paused
    pub fn print_active(&self) -> bool {
        self.printer.print_stats().state.is_active()
    }
}
