//! In-test fakes and a dispatch harness

use std::string::String;
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use neptune_core::config::ScreenConfig;
use neptune_core::queue::{CommandSink, DeferredQueue, DrainReport};
use neptune_core::render::Renderer;
use neptune_core::state::{FileListing, InteractionState};
use neptune_core::traits::{
    CommandError, CommandExecutor, Heater, HeaterStatus, LedStatus, MotionStatus, PrintStats,
    Printer, Transport, TransportError,
};
use neptune_protocol::{Command, Eol, Message};

use crate::context::Context;
use crate::registry::Registry;

/// Printer whose status is set field by field
pub struct FakePrinter {
    pub extruder: HeaterStatus,
    pub bed: HeaterStatus,
    pub motion: MotionStatus,
    pub fan: f32,
    pub probe_z: f32,
    pub accel: f32,
    pub leds: Vec<(&'static str, f32)>,
    pub stats: PrintStats,
    pub progress: f32,
    pub files: Vec<(&'static str, u32)>,
}

impl Default for FakePrinter {
    fn default() -> Self {
        Self {
            extruder: HeaterStatus::default(),
            bed: HeaterStatus::default(),
            motion: MotionStatus::default(),
            fan: 0.0,
            probe_z: 0.0,
            accel: 3000.0,
            leds: Vec::new(),
            stats: PrintStats::default(),
            progress: 0.0,
            files: Vec::new(),
        }
    }
}

impl Printer for FakePrinter {
    fn heater(&self, heater: Heater) -> Option<HeaterStatus> {
        Some(match heater {
            Heater::Extruder => self.extruder,
            Heater::Bed => self.bed,
        })
    }

    fn motion(&self) -> MotionStatus {
        self.motion
    }

    fn fan_speed(&self) -> f32 {
        self.fan
    }

    fn probe_z_offset(&self) -> f32 {
        self.probe_z
    }

    fn max_accel(&self) -> f32 {
        self.accel
    }

    fn led_count(&self) -> usize {
        self.leds.len()
    }

    fn led(&self, index: usize) -> Option<LedStatus<'_>> {
        self.leds
            .get(index)
            .map(|&(name, white)| LedStatus { name, white })
    }

    fn print_stats(&self) -> PrintStats {
        self.stats.clone()
    }

    fn sd_progress(&self) -> f32 {
        self.progress
    }

    fn list_files(&self, listing: &mut FileListing) {
        for &(name, size) in &self.files {
            let _ = listing.push(name, size);
        }
    }
}

/// Executor that records scripts and rejects the listed ones
#[derive(Default)]
pub struct RecordingExecutor {
    pub ran: Vec<String>,
    pub reject: Vec<&'static str>,
}

impl CommandExecutor for RecordingExecutor {
    fn run_script(&mut self, script: &str) -> Result<(), CommandError> {
        self.ran.push(script.into());
        if self.reject.iter().any(|r| *r == script) {
            Err(CommandError::Rejected)
        } else {
            Ok(())
        }
    }
}

/// Transport that records every chunk
#[derive(Default)]
pub struct RecordingTransport {
    pub chunks: Vec<Vec<u8>>,
}

impl RecordingTransport {
    /// Reassembled output split into lines
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8(self.chunks.concat())
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        self.chunks.push(chunk.to_vec());
        Ok(())
    }
}

/// Dispatches through the default registry against fakes
pub struct Harness {
    pub printer: FakePrinter,
    pub state: InteractionState,
    pub config: ScreenConfig,
    pub queue: DeferredQueue<NoopRawMutex>,
    pub transport: RecordingTransport,
    pub executor: RecordingExecutor,
    eol: Eol,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            printer: FakePrinter::default(),
            state: InteractionState::new(),
            config: ScreenConfig::default(),
            queue: DeferredQueue::new(),
            transport: RecordingTransport::default(),
            executor: RecordingExecutor::default(),
            eol: Eol::default(),
        }
    }

    /// Dispatch a button press (read-var ack with one data word)
    pub fn press(&mut self, address: u16, subcommand: u16) -> usize {
        let msg = Message::new(Command::ReadVarAck, address, &[subcommand]).unwrap();
        self.send(&msg)
    }

    /// Dispatch any message
    pub fn send(&mut self, msg: &Message) -> usize {
        let mut ctx = Context {
            state: &mut self.state,
            printer: &self.printer,
            commands: &self.queue,
            renderer: Renderer::new(
                &mut self.transport,
                &self.eol,
                self.config.chunk_size as usize,
                &self.config.alert,
            ),
            config: &self.config,
        };
        Registry::default().dispatch(msg, &mut ctx)
    }

    /// Pending command texts, left in the queue
    pub fn queued(&self) -> Vec<String> {
        let batch = self.queue.take();
        for command in batch.iter() {
            let _ = self.queue.enqueue(&command.action, command.completion.clone());
        }
        batch.iter().map(|c| String::from(c.action.as_str())).collect()
    }

    /// Run the queue against the recording executor
    pub fn drain(&mut self) -> DrainReport {
        let mut renderer = Renderer::new(
            &mut self.transport,
            &self.eol,
            self.config.chunk_size as usize,
            &self.config.alert,
        );
        self.queue.drain(&mut self.executor, &mut renderer)
    }

    pub fn executed(&self) -> Vec<String> {
        self.executor.ran.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.transport.lines()
    }

    pub fn clear_output(&mut self) {
        self.transport.chunks.clear();
    }
}
