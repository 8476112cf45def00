//! Deferred command queue
//!
//! Handlers never run printer commands inline. They queue the command text
//! with an optional continuation, and the screen service drains the queue on
//! its next tick, outside the decoding call stack.
//!
//! ```text
//!  handler ──enqueue──► pending ──take (locked)──► batch ──► executor
//!                          ▲                                   │ ok
//!                          └──── Followup::Enqueue ◄── continuation ──► renderer
//! ```
//!
//! Commands drain in submission order. A command that fails raises the alert
//! and the batch carries on. Commands queued while a batch is running land in
//! the next batch.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use heapless::{Deque, String, Vec};

use crate::render::Renderer;
use crate::traits::CommandExecutor;

/// Pending commands held at once
pub const QUEUE_CAPACITY: usize = 16;

/// Maximum command text length
pub const MAX_ACTION_LEN: usize = 96;

/// Maximum follow-up steps per continuation
pub const MAX_FOLLOWUPS: usize = 4;

/// Command text for the executor
pub type ActionText = String<MAX_ACTION_LEN>;

/// Errors that can occur while queueing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// Queue already holds its capacity
    Full,
    /// Command text exceeds [`MAX_ACTION_LEN`]
    ActionTooLong,
    /// Continuation already holds [`MAX_FOLLOWUPS`] steps
    TooManyFollowups,
}

/// Build an [`ActionText`] from a format string
///
/// Fails with [`QueueError::ActionTooLong`] if the text does not fit.
pub fn action(args: core::fmt::Arguments<'_>) -> Result<ActionText, QueueError> {
    use core::fmt::Write;

    let mut text = ActionText::new();
    text.write_fmt(args).map_err(|_| QueueError::ActionTooLong)?;
    Ok(text)
}

/// One step run after a command succeeds
#[derive(Debug, Clone, PartialEq)]
pub enum Followup {
    /// `page name`
    Page(&'static str),
    /// `key=value`
    Numeric(&'static str, i32),
    /// `key="value"`
    Text(&'static str, ActionText),
    /// Queue another command for the next drain
    Enqueue(ActionText),
}

/// Ordered follow-up steps attached to a deferred command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Continuation {
    steps: Vec<Followup, MAX_FOLLOWUPS>,
}

impl Continuation {
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Continuation that switches to a page
    pub fn page(name: &'static str) -> Self {
        let mut steps = Vec::new();
        let _ = steps.push(Followup::Page(name));
        Self { steps }
    }

    /// Append a step
    pub fn then(mut self, step: Followup) -> Result<Self, QueueError> {
        self.steps
            .push(step)
            .map_err(|_| QueueError::TooManyFollowups)?;
        Ok(self)
    }

    pub fn steps(&self) -> &[Followup] {
        &self.steps
    }
}

/// A queued command
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredCommand {
    pub action: ActionText,
    pub completion: Option<Continuation>,
}

/// Something that accepts deferred commands
pub trait CommandSink {
    /// Queue `action` for the next drain
    fn enqueue(&self, action: &str, completion: Option<Continuation>) -> Result<(), QueueError>;
}

/// Outcome of one drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainReport {
    /// Commands that ran successfully
    pub executed: usize,
    /// Commands the executor rejected
    pub failed: usize,
}

/// Ordered queue of deferred commands with a one-shot wake signal
pub struct DeferredQueue<M: RawMutex, const N: usize = QUEUE_CAPACITY> {
    pending: Mutex<M, RefCell<Deque<DeferredCommand, N>>>,
    wake: Signal<M, ()>,
}

impl<M: RawMutex, const N: usize> Default for DeferredQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> DeferredQueue<M, N> {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(RefCell::new(Deque::new())),
            wake: Signal::new(),
        }
    }

    /// Number of commands waiting for the next drain
    pub fn len(&self) -> usize {
        self.pending.lock(|pending| pending.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a drain has been requested since the last one
    pub fn wake_pending(&self) -> bool {
        self.wake.signaled()
    }

    /// Atomically take every pending command
    pub fn take(&self) -> Deque<DeferredCommand, N> {
        self.pending
            .lock(|pending| core::mem::replace(&mut *pending.borrow_mut(), Deque::new()))
    }

    /// Run every pending command, then its continuation
    ///
    /// Failures raise the alert and do not stop the batch. Commands queued by
    /// continuations wait for the next drain.
    pub fn drain(&self, executor: &mut dyn CommandExecutor, renderer: &mut Renderer<'_>) -> DrainReport {
        self.wake.reset();
        let mut batch = self.take();
        let mut report = DrainReport::default();

        while let Some(command) = batch.pop_front() {
            match executor.run_script(&command.action) {
                Ok(()) => {
                    debug!("deferred: ran {=str}", command.action.as_str());
                    report.executed += 1;
                    if let Some(completion) = &command.completion {
                        self.run_continuation(completion, renderer);
                    }
                }
                Err(e) => {
                    warn!("deferred: {=str} failed: {}", command.action.as_str(), e);
                    report.failed += 1;
                    if let Err(e) = renderer.alert() {
                        warn!("deferred: alert failed: {}", e);
                    }
                }
            }
        }

        report
    }

    fn run_continuation(&self, completion: &Continuation, renderer: &mut Renderer<'_>) {
        for step in completion.steps() {
            let result = match step {
                Followup::Page(name) => renderer.change_page(name),
                Followup::Numeric(key, value) => renderer.set_numeric(key, value),
                Followup::Text(key, value) => renderer.set_text(key, value.as_str()),
                Followup::Enqueue(next) => {
                    if let Err(e) = self.enqueue(next, None) {
                        warn!("deferred: follow-up not queued: {}", e);
                    }
                    Ok(())
                }
            };

            if let Err(e) = result {
                warn!("deferred: follow-up render failed: {}", e);
            }
        }
    }
}

impl<M: RawMutex, const N: usize> CommandSink for DeferredQueue<M, N> {
    fn enqueue(&self, action: &str, completion: Option<Continuation>) -> Result<(), QueueError> {
        let mut text = ActionText::new();
        text.push_str(action).map_err(|_| QueueError::ActionTooLong)?;

        self.pending.lock(|pending| {
            pending
                .borrow_mut()
                .push_back(DeferredCommand {
                    action: text,
                    completion,
                })
                .map_err(|_| QueueError::Full)
        })?;

        if !self.wake.signaled() {
            self.wake.signal(());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::RecordingTransport;
    use crate::traits::CommandError;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use neptune_protocol::Eol;
    use std::string::String as StdString;
    use std::vec::Vec as StdVec;

    type Queue = DeferredQueue<NoopRawMutex, 4>;

    /// Executor that records scripts and rejects the ones listed in `reject`
    #[derive(Default)]
    struct ScriptedExecutor {
        ran: StdVec<StdString>,
        reject: StdVec<&'static str>,
    }

    impl CommandExecutor for ScriptedExecutor {
        fn run_script(&mut self, script: &str) -> Result<(), CommandError> {
            self.ran.push(script.into());
            if self.reject.iter().any(|r| *r == script) {
                Err(CommandError::Rejected)
            } else {
                Ok(())
            }
        }
    }

    fn drain(queue: &Queue, executor: &mut ScriptedExecutor, transport: &mut RecordingTransport) -> DrainReport {
        let eol = Eol::default();
        let mut renderer = Renderer::new(transport, &eol, 40, "beep 100");
        queue.drain(executor, &mut renderer)
    }

    #[test]
    fn test_enqueue_signals_once() {
        let queue = Queue::new();
        assert!(!queue.wake_pending());

        queue.enqueue("G28", None).unwrap();
        queue.enqueue("M104 S200", None).unwrap();
        assert!(queue.wake_pending());
        assert_eq!(queue.len(), 2);

        let batch = queue.take();
        assert_eq!(batch.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_capacity_and_length_limits() {
        let queue = Queue::new();
        for _ in 0..4 {
            queue.enqueue("G28", None).unwrap();
        }
        assert_eq!(queue.enqueue("G28", None), Err(QueueError::Full));

        let long = [b'G'; MAX_ACTION_LEN + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(Queue::new().enqueue(long, None), Err(QueueError::ActionTooLong));
    }

    #[test]
    fn test_failure_alerts_once_and_batch_continues() {
        let queue = Queue::new();
        let mut executor = ScriptedExecutor {
            reject: vec!["PAUSE"],
            ..Default::default()
        };
        let mut transport = RecordingTransport::default();

        queue.enqueue("G28", None).unwrap();
        queue.enqueue("PAUSE", Some(Continuation::page("printpause"))).unwrap();
        queue
            .enqueue("M104 S200", Some(Continuation::page("main")))
            .unwrap();

        let report = drain(&queue, &mut executor, &mut transport);

        assert_eq!(executor.ran, ["G28", "PAUSE", "M104 S200"]);
        assert_eq!(report, DrainReport { executed: 2, failed: 1 });
        assert_eq!(transport.lines(), ["beep 100", "page main"]);
        assert!(!queue.wake_pending());
    }

    #[test]
    fn test_continuation_runs_once_after_its_command() {
        let queue = Queue::new();
        let mut executor = ScriptedExecutor::default();
        let mut transport = RecordingTransport::default();

        let completion = Continuation::page("leveldata_36")
            .then(Followup::Numeric("leveling_36.tm0.en", 0))
            .unwrap();
        queue.enqueue("G28", Some(completion)).unwrap();

        drain(&queue, &mut executor, &mut transport);
        drain(&queue, &mut executor, &mut transport);

        assert_eq!(executor.ran, ["G28"]);
        assert_eq!(transport.lines(), ["page leveldata_36", "leveling_36.tm0.en=0"]);
    }

    #[test]
    fn test_followup_enqueue_lands_in_next_batch() {
        let queue = Queue::new();
        let mut executor = ScriptedExecutor::default();
        let mut transport = RecordingTransport::default();

        let completion = Continuation::new()
            .then(Followup::Enqueue(action(format_args!("G0 Z{}", 10)).unwrap()))
            .unwrap();
        queue.enqueue("G28", Some(completion)).unwrap();

        let first = drain(&queue, &mut executor, &mut transport);
        assert_eq!(first.executed, 1);
        assert_eq!(executor.ran, ["G28"]);
        assert!(queue.wake_pending());

        let second = drain(&queue, &mut executor, &mut transport);
        assert_eq!(second.executed, 1);
        assert_eq!(executor.ran, ["G28", "G0 Z10"]);
    }

    #[test]
    fn test_continuation_step_limit() {
        let mut completion = Continuation::new();
        for _ in 0..MAX_FOLLOWUPS {
            completion = completion.then(Followup::Page("main")).unwrap();
        }
        assert_eq!(
            completion.then(Followup::Page("main")),
            Err(QueueError::TooManyFollowups)
        );
    }
}
