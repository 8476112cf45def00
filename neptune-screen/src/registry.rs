//! Command registry and dispatcher
//!
//! An ordered table of `(address, optional subcommand) → handler`. Every
//! entry that matches a message fires, in table order. The table is a static
//! slice and never changes at runtime.

use neptune_core::traits::Heater;
use neptune_protocol::address::*;
use neptune_protocol::{Command, Message};

use crate::context::{Context, HandlerError};
use crate::handlers::{self, Axis};

/// Signature of a free-standing handler
pub type HandlerFn = fn(&Message, &mut Context<'_>) -> Result<(), HandlerError>;

/// Handler variants
#[derive(Debug, Clone, Copy)]
pub enum Handler {
    MainPage,
    Adjustment,
    StopPrint,
    PausePrint,
    ResumePrint,
    TempScreen,
    CoolScreen,
    /// Numeric temperature entry for a heater
    HeaterEntry(Heater),
    SettingScreen,
    SettingBack,
    BedLevel,
    AxisPageSelect,
    /// Jog key for an axis
    AxisMove(Axis),
    PowerContinue,
    PrintFile,
    SelectFile,
    /// Any other handler
    Custom(HandlerFn),
}

impl Handler {
    /// Run the handler
    pub fn handle(&self, msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
        match self {
            Handler::MainPage => handlers::print::main_page(msg, ctx),
            Handler::Adjustment => handlers::adjust::adjustment(msg, ctx),
            Handler::StopPrint => handlers::print::stop_print(msg, ctx),
            Handler::PausePrint => handlers::print::pause_print(msg, ctx),
            Handler::ResumePrint => handlers::print::resume_print(msg, ctx),
            Handler::TempScreen => handlers::temperature::temp_screen(msg, ctx),
            Handler::CoolScreen => handlers::temperature::cool_screen(msg, ctx),
            Handler::HeaterEntry(heater) => handlers::temperature::heater_entry(*heater, msg, ctx),
            Handler::SettingScreen => handlers::motion::setting_screen(msg, ctx),
            Handler::SettingBack => handlers::print::setting_back(msg, ctx),
            Handler::BedLevel => handlers::motion::bed_level(msg, ctx),
            Handler::AxisPageSelect => handlers::motion::axis_page_select(msg, ctx),
            Handler::AxisMove(axis) => handlers::motion::axis_move(*axis, msg, ctx),
            Handler::PowerContinue => handlers::print::power_continue(msg, ctx),
            Handler::PrintFile => handlers::print::print_file(msg, ctx),
            Handler::SelectFile => handlers::print::select_file(msg, ctx),
            Handler::Custom(f) => f(msg, ctx),
        }
    }
}

/// One row of the registry
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub address: u16,
    /// Required first data word, or `None` to match any
    pub subcommand: Option<u16>,
    pub handler: Handler,
}

impl Entry {
    /// Entry matching every message to `address`
    pub const fn new(address: u16, handler: Handler) -> Self {
        Self {
            address,
            subcommand: None,
            handler,
        }
    }

    /// Entry matching only messages whose first data word is `subcommand`
    pub const fn with_subcommand(address: u16, subcommand: u16, handler: Handler) -> Self {
        Self {
            address,
            subcommand: Some(subcommand),
            handler,
        }
    }

    /// Whether this entry should fire for `msg`
    ///
    /// An entry with a subcommand never matches a message without data.
    pub fn matches(&self, msg: &Message) -> bool {
        msg.address == self.address
            && match self.subcommand {
                None => true,
                Some(sub) => msg.subcommand() == Some(sub),
            }
    }
}

/// Default handler table for the Neptune 3 screens
pub static DEFAULT_ENTRIES: &[Entry] = &[
    Entry::new(MAIN_PAGE, Handler::MainPage),
    Entry::new(BED_LEVEL, Handler::BedLevel),
    Entry::new(TEMP_SCREEN, Handler::TempScreen),
    Entry::new(COOL_SCREEN, Handler::CoolScreen),
    Entry::new(AXIS_PAGE_SELECT, Handler::AxisPageSelect),
    Entry::new(ZAXIS_MOVE_KEY, Handler::AxisMove(Axis::Z)),
    Entry::new(YAXIS_MOVE_KEY, Handler::AxisMove(Axis::Y)),
    Entry::new(XAXIS_MOVE_KEY, Handler::AxisMove(Axis::X)),
    Entry::new(HEATER0_TEMP_ENTER, Handler::HeaterEntry(Heater::Extruder)),
    Entry::new(HOTBED_TEMP_ENTER, Handler::HeaterEntry(Heater::Bed)),
    Entry::new(ADJUSTMENT, Handler::Adjustment),
    Entry::new(SETTING_SCREEN, Handler::SettingScreen),
    Entry::new(STOP_PRINT, Handler::StopPrint),
    Entry::with_subcommand(PAUSE_PRINT, 1, Handler::PausePrint),
    Entry::with_subcommand(RESUME_PRINT, 1, Handler::ResumePrint),
    Entry::with_subcommand(SETTING_BACK, 1, Handler::SettingBack),
    Entry::new(POWER_CONTINUE, Handler::PowerContinue),
    Entry::new(PRINT_FILE, Handler::PrintFile),
    Entry::new(SELECT_FILE, Handler::SelectFile),
];

/// Read-only dispatch table
#[derive(Debug, Clone, Copy)]
pub struct Registry<'r> {
    entries: &'r [Entry],
}

impl Default for Registry<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRIES)
    }
}

impl<'r> Registry<'r> {
    pub const fn new(entries: &'r [Entry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'r [Entry] {
        self.entries
    }

    /// Route a message to every matching entry, in order
    ///
    /// Only read-variable acknowledgements are routed. Handler failures are
    /// logged; a command that could not be queued raises the alert. Returns
    /// the number of entries that fired.
    pub fn dispatch(&self, msg: &Message, ctx: &mut Context<'_>) -> usize {
        if msg.command != Command::ReadVarAck {
            trace!("dispatch: ignoring command {=u8}", msg.command.to_byte());
            return 0;
        }

        let mut fired = 0;
        for entry in self.entries.iter().filter(|e| e.matches(msg)) {
            fired += 1;
            match entry.handler.handle(msg, ctx) {
                Ok(()) => {}
                Err(HandlerError::Queue(e)) => {
                    warn!("dispatch: {=u16:#x} not queued: {}", msg.address, e);
                    if let Err(e) = ctx.renderer.alert() {
                        warn!("dispatch: alert failed: {}", e);
                    }
                }
                Err(e) => warn!("dispatch: {=u16:#x} failed: {}", msg.address, e),
            }
        }

        if fired == 0 {
            trace!("dispatch: no handler for {=u16:#x}", msg.address);
        }
        fired
    }
}
