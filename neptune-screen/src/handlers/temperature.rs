//! Temperature page, cool-down page and numeric temperature entry

use neptune_core::state::{Direction, SpeedTarget, StepPreset};
use neptune_core::traits::Heater;
use neptune_protocol::Message;

use crate::context::{Context, HandlerError};

use super::adjust;

const TARGET_TEMP_KEY: &str = "adjusttemp.targettemp.val";

/// `0x1030`: heater and rate targets, step presets, +/- keys
pub fn temp_screen(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let Some(sub) = msg.subcommand() else {
        return Ok(());
    };

    match sub {
        0x01 => show_target(ctx, Heater::Extruder),
        0x03 => show_target(ctx, Heater::Bed),
        0x05 => select_step(ctx, StepPreset::Fine),
        0x06 => select_step(ctx, StepPreset::Medium),
        0x07 => select_step(ctx, StepPreset::Coarse),
        0x08 => step_temperature(ctx, Direction::Up),
        0x09 => step_temperature(ctx, Direction::Down),
        0x0A => adjust::show_speed(ctx, SpeedTarget::Feedrate),
        0x0B => adjust::show_speed(ctx, SpeedTarget::Flowrate),
        0x0C => adjust::show_speed(ctx, SpeedTarget::FanSpeed),
        0x0D => adjust::step_speed(ctx, Direction::Up),
        0x0E => adjust::step_speed(ctx, Direction::Down),
        0x11 => adjust::show_accel(ctx),
        0x12 => adjust::step_accel(ctx, Direction::Up),
        0x13 => adjust::step_accel(ctx, Direction::Down),
        _ => Ok(()),
    }
}

fn select_step(ctx: &mut Context<'_>, preset: StepPreset) -> Result<(), HandlerError> {
    ctx.state.select_step(preset);
    Ok(())
}

/// Make `heater` the +/- target and show its current target temperature
pub(crate) fn show_target(ctx: &mut Context<'_>, heater: Heater) -> Result<(), HandlerError> {
    ctx.state.temp_target = heater;
    let target = ctx.printer.heater(heater).map(|h| h.target).unwrap_or(0.0);
    ctx.renderer
        .set_numeric(TARGET_TEMP_KEY, format_args!("{:.0}", target))?;
    Ok(())
}

fn step_temperature(ctx: &mut Context<'_>, dir: Direction) -> Result<(), HandlerError> {
    let heater = ctx.state.temp_target;
    let Some(status) = ctx.printer.heater(heater) else {
        return Ok(());
    };

    match ctx
        .state
        .adjust_temperature(status.target, dir, &ctx.config.temp_limits)
    {
        Some(new_target) => {
            ctx.run(format_args!("{} S{:.0}", heater.set_temp_gcode(), new_target))?;
            ctx.renderer
                .set_numeric(TARGET_TEMP_KEY, format_args!("{:.0}", new_target))?;
        }
        None => debug!("temp: target would leave limits"),
    }
    Ok(())
}

/// `0x1032`: switch a heater off
pub fn cool_screen(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    match msg.subcommand() {
        Some(1) => ctx.run(format_args!("M104 S0")),
        Some(2) => ctx.run(format_args!("M140 S0")),
        _ => Ok(()),
    }
}

/// Temperature carried by a numeric entry word
///
/// The screen sends the value little-endian inside the big-endian word.
pub fn entered_temperature(word: u16) -> u16 {
    ((word & 0xFF00) >> 8) | ((word & 0x00FF) << 8)
}

/// `0x1034` / `0x103A`: numeric temperature entry
pub fn heater_entry(heater: Heater, msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let Some(word) = msg.subcommand() else {
        return Ok(());
    };
    let temp = entered_temperature(word);

    ctx.run(format_args!("{} S{}", heater.set_temp_gcode(), temp))?;

    let key = match heater {
        Heater::Extruder => "pretemp.nozzletemp.txt",
        Heater::Bed => "pretemp.bedtemp.txt",
    };
    let current = ctx.printer.heater(heater).map(|h| h.current).unwrap_or(0.0);
    ctx.renderer
        .set_text(key, format_args!("{:.0} / {}", current, temp))?;
    Ok(())
}
