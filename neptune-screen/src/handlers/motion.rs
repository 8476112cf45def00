//! Axis page, jog keys, bed levelling page and settings page

use neptune_core::queue::{Continuation, Followup};
use neptune_core::state::{Direction, JogStep, ZOffsetStep};
use neptune_protocol::Message;

use crate::context::{Context, HandlerError};

use super::{adjust, print, Axis};

/// `0x1046`: jog step and homing buttons
pub fn axis_page_select(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    match msg.subcommand() {
        Some(1) => ctx.state.jog_step = JogStep::Tenth,
        Some(2) => ctx.state.jog_step = JogStep::One,
        Some(3) => ctx.state.jog_step = JogStep::Ten,
        Some(4) => ctx.run(format_args!("G28"))?,
        Some(5) => ctx.run(format_args!("G28 X"))?,
        Some(6) => ctx.run(format_args!("G28 Y"))?,
        Some(7) => ctx.run(format_args!("G28 Z"))?,
        _ => {}
    }
    Ok(())
}

/// `0x1048` / `0x104A` / `0x104C`: jog one axis by the current step
///
/// Subcommand 1 moves in the positive direction, anything else negative.
pub fn axis_move(axis: Axis, msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let Some(sub) = msg.subcommand() else {
        return Ok(());
    };
    let dir = if sub == 1 { Direction::Up } else { Direction::Down };
    let step = ctx.state.jog_step.mm();
    let motion = ctx.printer.motion();
    let letter = axis.letter();

    if motion.absolute_coordinates {
        let target = motion.gcode_position[axis.index()] + step * dir.sign();
        ctx.run(format_args!("G0 {}{:.3}", letter, target))
    } else {
        let sign = match dir {
            Direction::Up => '+',
            Direction::Down => '-',
        };
        ctx.run(format_args!("G0 {}{}{}", letter, sign, step))
    }
}

/// `0x103E`: settings page, home and start bed levelling
pub fn setting_screen(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    if msg.subcommand() != Some(1) {
        return Ok(());
    }

    let completion = Continuation::page("leveldata_36").then(Followup::Numeric("leveling_36.tm0.en", 0))?;
    ctx.run_then(format_args!("G28\nG1 F200 Z0.05"), Some(completion))
}

/// `0x1044`: Z offset, light toggle and print page data
pub fn bed_level(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let Some(sub) = msg.subcommand() else {
        return Ok(());
    };

    match sub {
        0x02 => step_zoffset(ctx, Direction::Up),
        0x03 => step_zoffset(ctx, Direction::Down),
        0x04 => {
            ctx.state.zoffset_step = ZOffsetStep::Hundredth;
            Ok(())
        }
        0x05 => {
            ctx.state.zoffset_step = ZOffsetStep::Tenth;
            Ok(())
        }
        0x06 => {
            ctx.state.zoffset_step = ZOffsetStep::One;
            Ok(())
        }
        0x08 => toggle_lights(ctx),
        0x0A => print::print_status(ctx),
        0x16 => print::print_initial(ctx),
        _ => Ok(()),
    }
}

fn step_zoffset(ctx: &mut Context<'_>, dir: Direction) -> Result<(), HandlerError> {
    let current = ctx.printer.motion().homing_origin_z;
    let offset = ctx.state.adjust_zoffset(current, dir);
    let shown = (offset + ctx.printer.probe_z_offset()) * 100.0;

    ctx.run(format_args!("SET_GCODE_OFFSET Z={:.3} MOVE=1", offset))?;
    ctx.renderer
        .set_numeric("leveldata.z_offset.val", format_args!("{:.0}", shown))?;
    ctx.renderer
        .set_numeric(adjust::ZOFFSET_KEY, format_args!("{:.0}", shown))?;
    Ok(())
}

fn toggle_lights(ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    debug!("light toggle requested");

    for index in 0..ctx.printer.led_count() {
        let Some(led) = ctx.printer.led(index) else {
            continue;
        };
        let white = if led.is_on() { 0 } else { 1 };
        ctx.run(format_args!("SET_LED LED={} WHITE={}", led.name, white))?;
    }
    Ok(())
}
