//! Screen service
//!
//! Owns the frame decoder, the interaction state and the deferred queue, and
//! drives the three cooperative timers:
//!
//! - one-shot screen init, `init_delay` after [`Screen::ready`]
//! - status push every `update_interval`, rescheduled each time it runs
//! - deferred queue drain, whenever a handler has queued something
//!
//! Everything runs on the caller's thread: [`Screen::receive`] from the serial
//! receive path, [`Screen::poll`] from the host's timer tick.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;

use neptune_core::config::ScreenConfig;
use neptune_core::queue::{DeferredQueue, DrainReport};
use neptune_core::render::Renderer;
use neptune_core::state::InteractionState;
use neptune_core::traits::{CommandExecutor, Printer, Transport};
use neptune_protocol::{Eol, FrameParser, Message, TextError};

use crate::context::Context;
use crate::registry::Registry;
use crate::status;

/// Whether `now` has reached `deadline` on a wrapping millisecond clock
fn due(now_ms: u32, deadline_ms: u32) -> bool {
    now_ms.wrapping_sub(deadline_ms) < u32::MAX / 2
}

fn line_renderer<'a>(
    transport: &'a mut dyn Transport,
    eol: &'a Eol,
    config: &'a ScreenConfig,
) -> Renderer<'a> {
    Renderer::new(transport, eol, config.chunk_size as usize, &config.alert)
}

/// The Neptune screen service
pub struct Screen<'r, P, E, T> {
    config: ScreenConfig,
    eol: Eol,
    registry: Registry<'r>,
    parser: FrameParser,
    state: InteractionState,
    queue: DeferredQueue<NoopRawMutex>,
    printer: P,
    executor: E,
    transport: T,
    init_at_ms: Option<u32>,
    next_status_ms: Option<u32>,
}

impl<'r, P, E, T> Screen<'r, P, E, T>
where
    P: Printer,
    E: CommandExecutor,
    T: Transport,
{
    /// Create the service
    ///
    /// Fails if the configured end-of-line cannot be expanded.
    pub fn new(
        config: ScreenConfig,
        registry: Registry<'r>,
        printer: P,
        executor: E,
        transport: T,
    ) -> Result<Self, TextError> {
        let eol = Eol::parse(&config.eol)?;

        Ok(Self {
            config,
            eol,
            registry,
            parser: FrameParser::new(),
            state: InteractionState::new(),
            queue: DeferredQueue::new(),
            printer,
            executor,
            transport,
            init_at_ms: None,
            next_status_ms: None,
        })
    }

    /// The printer host is ready; schedule the screen init
    pub fn ready(&mut self, now_ms: u32) {
        info!("host ready, screen init in {=u32} ms", self.config.init_delay_ms);
        self.init_at_ms = Some(now_ms.wrapping_add(self.config.init_delay_ms));
    }

    /// Feed bytes from the serial port
    ///
    /// Frames may span calls. Returns the number of messages dispatched.
    pub fn receive(&mut self, bytes: &[u8]) -> usize {
        let mut dispatched = 0;

        for frame in self.parser.feed_bytes(bytes) {
            let msg = match Message::from_frame(&frame) {
                Ok(msg) => msg,
                Err(e) => {
                    warn!("rx: dropping frame: {}", e);
                    continue;
                }
            };

            if !msg.declared_length_matches() {
                trace!(
                    "rx: {=u16:#x} declares {=u8} words, carries {=usize}",
                    msg.address,
                    msg.declared_words,
                    msg.data.len()
                );
            }

            let mut ctx = Context {
                state: &mut self.state,
                printer: &self.printer,
                commands: &self.queue,
                renderer: line_renderer(&mut self.transport, &self.eol, &self.config),
                config: &self.config,
            };
            self.registry.dispatch(&msg, &mut ctx);
            dispatched += 1;
        }

        dispatched
    }

    /// Run whatever timers are due
    ///
    /// Returns the drain outcome if the deferred queue ran.
    pub fn poll(&mut self, now_ms: u32) -> Option<DrainReport> {
        if let Some(at) = self.init_at_ms {
            if due(now_ms, at) {
                self.init_at_ms = None;
                let mut renderer = line_renderer(&mut self.transport, &self.eol, &self.config);
                if let Err(e) = status::init_screen(&self.config, &mut renderer) {
                    warn!("screen init failed: {}", e);
                }
                self.next_status_ms = Some(now_ms.wrapping_add(self.config.update_interval_ms));
            }
        }

        if let Some(at) = self.next_status_ms {
            if due(now_ms, at) {
                let mut renderer = line_renderer(&mut self.transport, &self.eol, &self.config);
                if let Err(e) = status::push_status(&self.printer, &mut self.state, &mut renderer) {
                    warn!("status push failed: {}", e);
                }
                self.next_status_ms = Some(now_ms.wrapping_add(self.config.update_interval_ms));
            }
        }

        if !self.queue.wake_pending() {
            return None;
        }

        let mut renderer = line_renderer(&mut self.transport, &self.eol, &self.config);
        let report = self.queue.drain(&mut self.executor, &mut renderer);
        debug!("drained: {}", report);
        Some(report)
    }

    /// Forward command output to the screen, one raw command per line
    ///
    /// A line that cannot be sent is logged and skipped; the rest still go
    /// out. Returns the number of lines dropped.
    pub fn forward_response(&mut self, text: &str) -> usize {
        let mut renderer = self.renderer();
        let mut dropped = 0;

        for line in text.lines() {
            if let Err(e) = renderer.send_raw(line) {
                warn!("forward: line dropped: {}", e);
                dropped += 1;
            }
        }

        dropped
    }

    /// A renderer over the screen transport
    pub fn renderer(&mut self) -> Renderer<'_> {
        line_renderer(&mut self.transport, &self.eol, &self.config)
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn queue(&self) -> &DeferredQueue<NoopRawMutex> {
        &self.queue
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    pub fn printer_mut(&mut self) -> &mut P {
        &mut self.printer
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePrinter, RecordingExecutor, RecordingTransport};
    use neptune_core::state::JogStep;
    use neptune_protocol::address::{AXIS_PAGE_SELECT, HEATER0_TEMP_ENTER, ZAXIS_MOVE_KEY};
    use neptune_protocol::Command;

    type TestScreen = Screen<'static, FakePrinter, RecordingExecutor, RecordingTransport>;

    fn screen() -> TestScreen {
        Screen::new(
            ScreenConfig::default(),
            Registry::default(),
            FakePrinter::default(),
            RecordingExecutor::default(),
            RecordingTransport::default(),
        )
        .unwrap()
    }

    fn frame(address: u16, words: &[u16]) -> std::vec::Vec<u8> {
        let msg = Message::new(Command::ReadVarAck, address, words).unwrap();
        msg.to_frame().unwrap().encode_to_vec().unwrap().to_vec()
    }

    #[test]
    fn test_due_wraps() {
        assert!(due(10, 10));
        assert!(due(11, 10));
        assert!(!due(9, 10));
        assert!(due(5, u32::MAX - 5));
    }

    #[test]
    fn test_bad_eol_is_rejected() {
        let mut config = ScreenConfig::default();
        config.eol.clear();
        config.eol.push_str("\\xZZ").unwrap();

        let result = Screen::new(
            config,
            Registry::default(),
            FakePrinter::default(),
            RecordingExecutor::default(),
            RecordingTransport::default(),
        );
        assert!(matches!(result, Err(TextError::InvalidEscape)));
    }

    #[test]
    fn test_frames_split_across_reads_are_dispatched() {
        let mut screen = screen();
        let mut bytes = frame(AXIS_PAGE_SELECT, &[3]);
        bytes.extend(frame(ZAXIS_MOVE_KEY, &[1]));
        let (head, tail) = bytes.split_at(5);

        assert_eq!(screen.receive(head), 0);
        assert_eq!(screen.receive(tail), 2);
        assert_eq!(screen.state().jog_step, JogStep::Ten);
        assert_eq!(screen.queue().len(), 1);
    }

    #[test]
    fn test_garbage_and_malformed_frames_are_skipped() {
        let mut screen = screen();
        let mut bytes = std::vec![0x00, 0x5A, 0x13, 0x5A, 0xA5, 0x03, 0x83, 0x10, 0x46];
        bytes.extend(frame(AXIS_PAGE_SELECT, &[1]));

        assert_eq!(screen.receive(&bytes), 1);
        assert_eq!(screen.state().jog_step, JogStep::Tenth);
    }

    #[test]
    fn test_write_var_is_not_dispatched() {
        let mut screen = screen();
        let msg = Message::new(Command::WriteVar, AXIS_PAGE_SELECT, &[4]).unwrap();
        let bytes = msg.to_frame().unwrap().encode_to_vec().unwrap();

        screen.receive(&bytes);
        assert!(screen.queue().is_empty());
    }

    #[test]
    fn test_deferred_commands_run_on_poll() {
        let mut screen = screen();
        screen.receive(&frame(HEATER0_TEMP_ENTER, &[0x00C8]));
        assert!(screen.executor().ran.is_empty());

        let report = screen.poll(0).unwrap();
        assert_eq!(report.executed, 1);
        assert_eq!(screen.executor().ran, ["M104 S51200"]);
        assert_eq!(screen.poll(1), None);
    }

    #[test]
    fn test_init_then_periodic_status() {
        let mut screen = screen();
        screen.ready(1000);

        screen.poll(2999);
        assert!(screen.transport().chunks.is_empty());

        screen.poll(3000);
        let lines = screen.transport().lines();
        assert_eq!(lines.first().map(String::as_str), Some("page boot"));
        assert_eq!(lines.len(), 5);

        screen.poll(4999);
        assert_eq!(screen.transport().lines().len(), 5);

        screen.poll(5000);
        let after_first = screen.transport().lines().len();
        assert!(after_first > 5);

        screen.poll(7000);
        assert!(screen.transport().lines().len() > after_first);
    }

    #[test]
    fn test_forward_response() {
        let mut screen = screen();
        let dropped = screen.forward_response("page main\n// comment only\nbeep 50 // short");
        assert_eq!(dropped, 0);
        assert_eq!(screen.transport().lines(), ["page main", "beep 50 "]);
    }

    #[test]
    fn test_forward_response_skips_oversized_line() {
        let mut screen = screen();
        let long = "x".repeat(neptune_protocol::text::MAX_LINE_LEN + 8);
        let text = std::format!("page main\n{}\nbeep 50", long);

        assert_eq!(screen.forward_response(&text), 1);
        assert_eq!(screen.transport().lines(), ["page main", "beep 50"]);
    }
}
