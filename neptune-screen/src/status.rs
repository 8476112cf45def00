//! Screen init sequence and periodic status push

use neptune_core::config::ScreenConfig;
use neptune_core::render::{RenderError, Renderer};
use neptune_core::state::InteractionState;
use neptune_core::traits::{Heater, Printer};

/// Wake the screen and show the main page
pub fn init_screen(config: &ScreenConfig, renderer: &mut Renderer<'_>) -> Result<(), RenderError> {
    info!("screen init, variant {}", config.variant);

    renderer.change_page("boot")?;
    renderer.send_raw("com_star")?;
    renderer.set_numeric("main.va0.val", config.variant.code())?;
    renderer.change_page("main")?;
    renderer.set_text("information.sversion.txt", config.version_text.as_str())?;
    Ok(())
}

/// Push temperatures, light, position and fan speed, then follow print state
/// changes with a page switch
pub fn push_status(
    printer: &dyn Printer,
    state: &mut InteractionState,
    renderer: &mut Renderer<'_>,
) -> Result<(), RenderError> {
    trace!("status push");

    for (heater, key) in [
        (Heater::Extruder, "main.nozzletemp.txt"),
        (Heater::Bed, "main.bedtemp.txt"),
    ] {
        if let Some(temp) = printer.heater(heater) {
            renderer.set_text(key, format_args!("{:.0} / {:.0}", temp.current, temp.target))?;
        }
    }

    renderer.set_numeric("status_led2", u8::from(printer.light_on()))?;

    let [x, y, z] = printer.motion().position;
    renderer.set_numeric("main.xvalue.val", format_args!("{:.0}", x * 100.0))?;
    renderer.set_numeric("main.yvalue.val", format_args!("{:.0}", y * 100.0))?;
    renderer.set_numeric("main.zvalue.val", format_args!("{:.0}", z * 1000.0))?;
    renderer.set_numeric("printpause.zvalue.val", format_args!("{:.0}", z * 10.0))?;

    renderer.set_text(
        "printpause.fanspeed.txt",
        format_args!("{:.0}%", printer.fan_speed() * 100.0),
    )?;

    let print_state = printer.print_stats().state;
    if let Some(page) = state.observe_print_state(print_state) {
        debug!("print state now {}, page {=str}", print_state, page);
        renderer.change_page(page)?;
    }
    Ok(())
}
