//! Print job control, file selection and print page data

use neptune_core::queue::Continuation;
use neptune_core::state::PrintState;
use neptune_protocol::Message;

use crate::context::{Context, HandlerError};

use super::slot_key;

/// Button value the screen sends for "back" on confirmation pages
const BACK: u16 = 0xF0;

/// `0x1002`: print button on the main page
///
/// Shows the print page while a job is running, otherwise refreshes and shows
/// the file list.
pub fn main_page(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    if msg.subcommand() != Some(1) {
        return Ok(());
    }

    if ctx.print_active() {
        ctx.renderer.change_page("printpause")?;
        return Ok(());
    }

    ctx.state.files.clear();
    ctx.printer.list_files(&mut ctx.state.files);
    debug!("files: {=usize} listed", ctx.state.files.len());

    for (index, file) in ctx.state.files.iter().enumerate() {
        let key = slot_key("file1.t", index, ".txt");
        ctx.renderer.set_text(&key, file.name.as_str())?;
    }
    ctx.renderer.change_page("file1")?;
    Ok(())
}

/// `0x1008`: stop print confirmation
pub fn stop_print(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    match msg.subcommand() {
        Some(1) => ctx.run_then(format_args!("CANCEL_PRINT"), Some(Continuation::page("main"))),
        Some(BACK) => Ok(ctx.renderer.change_page("printpause")?),
        _ => Ok(()),
    }
}

/// `0x100A`: pause
pub fn pause_print(_msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    ctx.run_then(format_args!("PAUSE"), Some(Continuation::page("printpause")))
}

/// `0x100C`: resume
pub fn resume_print(_msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    ctx.run_then(format_args!("RESUME"), Some(Continuation::page("printpause")))
}

/// `0x1040`: back from the settings page
pub fn setting_back(_msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let page = if ctx.print_active() { "printpause" } else { "main" };
    ctx.renderer.change_page(page)?;
    Ok(())
}

/// `0x105F`: continue or drop a print interrupted by power loss
pub fn power_continue(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    match msg.subcommand() {
        Some(1) => ctx.run_then(format_args!("RESUME"), Some(Continuation::page("printpause"))),
        Some(2) => ctx.run_then(format_args!("CANCEL_PRINT"), Some(Continuation::page("main"))),
        _ => Ok(()),
    }
}

/// `0x2199`: pick a file by its position on the file page
///
/// An index past the cached listing raises the alert and keeps the previous
/// selection.
pub fn select_file(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let Some(index) = msg.subcommand() else {
        return Ok(());
    };

    let Some(name) = ctx.state.select_file(index as usize) else {
        warn!("files: index {=u16} out of range", index);
        ctx.renderer.alert()?;
        return Ok(());
    };

    ctx.renderer.set_text("askprint.t0.txt", name.as_str())?;
    ctx.renderer.change_page("askprint")?;
    Ok(())
}

/// `0x2198`: confirm or abandon printing the selected file
pub fn print_file(msg: &Message, ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    match msg.subcommand() {
        Some(1) => match &ctx.state.selected_file {
            Some(name) => ctx.run_then(
                format_args!("SDCARD_PRINT_FILE FILENAME=\"{}\"", name),
                Some(Continuation::page("printpause")),
            ),
            None => Ok(ctx.renderer.alert()?),
        },
        Some(BACK) => {
            ctx.state.selected_file = None;
            Ok(ctx.renderer.change_page("file1")?)
        }
        _ => Ok(()),
    }
}

/// Print page refresh: file, progress, times, fan
pub(crate) fn print_status(ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let stats = ctx.printer.print_stats();

    ctx.renderer.set_text("printpause.t0.txt", stats.filename.as_str())?;
    render_progress(ctx)?;
    render_print_time(ctx, stats.print_duration_s)?;
    ctx.renderer.set_text(
        "printpause.fanspeed.txt",
        format_args!("{:.0}%", ctx.printer.fan_speed() * 100.0),
    )?;
    Ok(())
}

/// First fill of the print page: speed, times, progress, resume flag
pub(crate) fn print_initial(ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let stats = ctx.printer.print_stats();
    let speed = ctx.printer.motion().speed_factor * 100.0;

    ctx.renderer
        .set_text("printpause.printspeed.txt", format_args!("{:.0}", speed))?;
    render_print_time(ctx, stats.print_duration_s)?;
    render_progress(ctx)?;

    let rest_flag = if stats.state == PrintState::Printing { 0 } else { 1 };
    ctx.renderer.set_numeric("restFlag1", rest_flag)?;
    Ok(())
}

fn render_progress(ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let percent = ctx.printer.sd_progress() * 100.0;
    ctx.renderer
        .set_numeric("printpause.printprocess.val", format_args!("{:.0}", percent))?;
    ctx.renderer
        .set_text("printpause.printvalue.txt", format_args!("{:.0}", percent))?;
    Ok(())
}

fn render_print_time(ctx: &mut Context<'_>, duration_s: f32) -> Result<(), HandlerError> {
    let estimated_s = ctx.printer.estimated_print_time_s();
    ctx.renderer.set_text(
        "printpause.printtime.txt",
        format_args!("{:.0} / {:.0} min", duration_s / 60.0, estimated_s / 60.0),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::testing::Harness;
    use neptune_core::state::PrintState;
    use neptune_protocol::address::{
        BED_LEVEL, MAIN_PAGE, PAUSE_PRINT, POWER_CONTINUE, PRINT_FILE, SELECT_FILE, SETTING_BACK,
        STOP_PRINT,
    };

    fn with_files() -> Harness {
        let mut h = Harness::new();
        h.printer.files = vec![("benchy.gcode", 2048), ("cube.gcode", 512)];
        h.press(MAIN_PAGE, 1);
        h.clear_output();
        h
    }

    #[test]
    fn test_main_page_lists_files() {
        let mut h = Harness::new();
        h.printer.files = vec![("benchy.gcode", 2048), ("cube.gcode", 512)];

        h.press(MAIN_PAGE, 1);

        assert_eq!(h.state.files.len(), 2);
        assert_eq!(
            h.lines(),
            [
                "file1.t0.txt=\"benchy.gcode\"",
                "file1.t1.txt=\"cube.gcode\"",
                "page file1",
            ]
        );
    }

    #[test]
    fn test_main_page_while_printing() {
        let mut h = Harness::new();
        h.printer.stats.state = PrintState::Paused;

        h.press(MAIN_PAGE, 1);
        assert_eq!(h.lines(), ["page printpause"]);
    }

    #[test]
    fn test_select_out_of_range_alerts_without_state_change() {
        let mut h = with_files();
        h.press(SELECT_FILE, 0);
        h.clear_output();

        h.press(SELECT_FILE, 2);

        assert_eq!(h.state.selected_file.as_deref(), Some("benchy.gcode"));
        assert_eq!(h.lines(), ["beep 100"]);
    }

    #[test]
    fn test_select_then_confirm_prints_same_file() {
        let mut h = with_files();

        h.press(SELECT_FILE, 1);
        assert_eq!(h.lines(), ["askprint.t0.txt=\"cube.gcode\"", "page askprint"]);

        h.press(PRINT_FILE, 1);
        assert_eq!(h.queued(), ["SDCARD_PRINT_FILE FILENAME=\"cube.gcode\""]);

        h.clear_output();
        h.drain();
        assert_eq!(h.lines(), ["page printpause"]);
    }

    #[test]
    fn test_confirm_without_selection_alerts() {
        let mut h = with_files();
        h.press(PRINT_FILE, 1);
        assert!(h.queued().is_empty());
        assert_eq!(h.lines(), ["beep 100"]);
    }

    #[test]
    fn test_back_clears_selection() {
        let mut h = with_files();
        h.press(SELECT_FILE, 0);
        h.clear_output();

        h.press(PRINT_FILE, 0xF0);
        assert!(h.state.selected_file.is_none());
        assert_eq!(h.lines(), ["page file1"]);
    }

    #[test]
    fn test_stop_and_pause_queue_with_pages() {
        let mut h = Harness::new();
        h.press(STOP_PRINT, 1);
        h.press(PAUSE_PRINT, 1);
        h.press(PAUSE_PRINT, 2);
        assert_eq!(h.queued(), ["CANCEL_PRINT", "PAUSE"]);

        h.drain();
        assert_eq!(h.lines(), ["page main", "page printpause"]);
    }

    #[test]
    fn test_power_continue() {
        let mut h = Harness::new();
        h.press(POWER_CONTINUE, 1);
        h.press(POWER_CONTINUE, 2);
        assert_eq!(h.queued(), ["RESUME", "CANCEL_PRINT"]);
    }

    #[test]
    fn test_setting_back() {
        let mut h = Harness::new();
        h.press(SETTING_BACK, 1);
        h.printer.stats.state = PrintState::Printing;
        h.press(SETTING_BACK, 1);
        assert_eq!(h.lines(), ["page main", "page printpause"]);
    }

    #[test]
    fn test_print_status_page_data() {
        let mut h = Harness::new();
        h.printer.stats.filename.push_str("cube.gcode").unwrap();
        h.printer.stats.print_duration_s = 600.0;
        h.printer.progress = 0.25;
        h.printer.fan = 1.0;

        h.press(BED_LEVEL, 0x0A);

        assert_eq!(
            h.lines(),
            [
                "printpause.t0.txt=\"cube.gcode\"",
                "printpause.printprocess.val=25",
                "printpause.printvalue.txt=\"25\"",
                "printpause.printtime.txt=\"10 / 40 min\"",
                "printpause.fanspeed.txt=\"100%\"",
            ]
        );
    }

    #[test]
    fn test_print_initial_page_data() {
        let mut h = Harness::new();
        h.printer.stats.state = PrintState::Printing;

        h.press(BED_LEVEL, 0x16);

        assert_eq!(
            h.lines(),
            [
                "printpause.printspeed.txt=\"100\"",
                "printpause.printtime.txt=\"0 / 0 min\"",
                "printpause.printprocess.val=0",
                "printpause.printvalue.txt=\"0\"",
                "restFlag1=0",
            ]
        );
    }
}
