//! Adjustment menu: feed/flow/fan rates, acceleration, Z offset page

use neptune_core::state::{Direction, SpeedTarget, ZOffsetStep};
use neptune_core::traits::Heater;
use neptune_protocol::Message;

use crate::context::{Context, HandlerError};

use super::temperature;

const TARGET_SPEED_KEY: &str = "adjustspeed.targetspeed.val";
pub(crate) const ZOFFSET_KEY: &str = "adjustzoffset.z_offset.val";

/// `0x1004`: adjustment menu buttons
pub fn adjustment(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let Some(sub) = msg.subcommand() else {
        return Ok(());
    };

    match sub {
        0x01 => {
            ctx.state.temp_step = 10;
            temperature::show_target(ctx, Heater::Extruder)
        }
        0x02 => Ok(ctx.renderer.change_page("printpause")?),
        0x06 => {
            ctx.state.temp_step = 10;
            show_speed(ctx, SpeedTarget::Feedrate)?;
            Ok(ctx.renderer.change_page("adjustspeed")?)
        }
        0x07 => {
            ctx.state.zoffset_step = ZOffsetStep::Tenth;
            let motion = ctx.printer.motion();
            let shown = (motion.homing_origin_z + ctx.printer.probe_z_offset()) * 100.0;
            ctx.renderer.set_numeric(ZOFFSET_KEY, format_args!("{:.0}", shown))?;
            Ok(ctx.renderer.change_page("adjustzoffset")?)
        }
        0x08 => reset_rate(ctx, "M220 S100"),
        0x09 => reset_rate(ctx, "M221 S100"),
        0x0A => reset_rate(ctx, "M106 S255"),
        _ => Ok(()),
    }
}

fn reset_rate(ctx: &mut Context<'_>, script: &str) -> Result<(), HandlerError> {
    ctx.run(format_args!("{}", script))?;
    ctx.renderer.set_numeric(TARGET_SPEED_KEY, 100)?;
    Ok(())
}

/// Make `target` the +/- rate and show its value in percent
pub(crate) fn show_speed(ctx: &mut Context<'_>, target: SpeedTarget) -> Result<(), HandlerError> {
    ctx.state.speed_target = target;

    let percent = match target {
        SpeedTarget::Feedrate => ctx.printer.motion().speed_factor * 100.0,
        SpeedTarget::Flowrate => ctx.printer.motion().extrude_factor * 100.0,
        SpeedTarget::FanSpeed => ctx.printer.fan_speed() * 100.0,
    };
    ctx.renderer
        .set_numeric(TARGET_SPEED_KEY, format_args!("{:.0}", percent))?;
    Ok(())
}

pub(crate) fn step_speed(ctx: &mut Context<'_>, dir: Direction) -> Result<(), HandlerError> {
    let motion = ctx.printer.motion();
    let change = ctx
        .state
        .adjust_speed(&motion, ctx.printer.fan_speed(), dir, ctx.config.max_flowrate);

    match change.target {
        SpeedTarget::Feedrate => ctx.run(format_args!("M220 S{:.0}", change.percent))?,
        SpeedTarget::Flowrate => ctx.run(format_args!("M221 S{:.0}", change.percent))?,
        SpeedTarget::FanSpeed => ctx.run(format_args!("M106 S{:.0}", change.percent * 2.55))?,
    }
    ctx.renderer
        .set_numeric(TARGET_SPEED_KEY, format_args!("{:.0}", change.percent))?;
    Ok(())
}

pub(crate) fn show_accel(ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let accel = ctx.printer.max_accel();
    ctx.renderer
        .set_numeric(TARGET_SPEED_KEY, format_args!("{:.0}", accel))?;
    Ok(())
}

pub(crate) fn step_accel(ctx: &mut Context<'_>, dir: Direction) -> Result<(), HandlerError> {
    let accel = ctx.state.adjust_accel(
        ctx.printer.max_accel(),
        dir,
        ctx.config.min_accel,
        ctx.config.max_accel,
    );

    ctx.run(format_args!("SET_VELOCITY_LIMIT ACCEL={:.0}", accel))?;
    ctx.renderer
        .set_numeric(TARGET_SPEED_KEY, format_args!("{:.0}", accel))?;
    Ok(())
}
