//! Variable addresses used by the Neptune screen firmware
//!
//! Each address identifies a screen view or control element. Touch events
//! report the address of the control plus a subcommand word telling which
//! button inside that control was pressed.

/// Main page buttons
pub const MAIN_PAGE: u16 = 0x1002;
/// Adjustment menu (while printing)
pub const ADJUSTMENT: u16 = 0x1004;
/// Stop print dialog
pub const STOP_PRINT: u16 = 0x1008;
/// Pause print dialog
pub const PAUSE_PRINT: u16 = 0x100A;
/// Resume print dialog
pub const RESUME_PRINT: u16 = 0x100C;
/// Temperature / speed adjustment screen
pub const TEMP_SCREEN: u16 = 0x1030;
/// Cool-down screen
pub const COOL_SCREEN: u16 = 0x1032;
/// Extruder temperature keypad entry
pub const HEATER0_TEMP_ENTER: u16 = 0x1034;
/// Bed temperature keypad entry
pub const HOTBED_TEMP_ENTER: u16 = 0x103A;
/// Settings screen
pub const SETTING_SCREEN: u16 = 0x103E;
/// Back button on the settings screen
pub const SETTING_BACK: u16 = 0x1040;
/// Bed level, light and print-menu requests
pub const BED_LEVEL: u16 = 0x1044;
/// Axis page (jog step and homing)
pub const AXIS_PAGE_SELECT: u16 = 0x1046;
/// X axis jog keys
pub const XAXIS_MOVE_KEY: u16 = 0x1048;
/// Y axis jog keys
pub const YAXIS_MOVE_KEY: u16 = 0x104A;
/// Z axis jog keys
pub const ZAXIS_MOVE_KEY: u16 = 0x104C;
/// Power-loss recovery prompt
pub const POWER_CONTINUE: u16 = 0x105F;
/// Confirm printing the selected file
pub const PRINT_FILE: u16 = 0x2198;
/// Select a file by its index in the listing
pub const SELECT_FILE: u16 = 0x2199;
