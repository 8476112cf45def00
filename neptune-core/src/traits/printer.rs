//! Printer status trait
//!
//! Read-only view of the printer host: heaters, motion, fan, probe, LEDs,
//! print job and the SD card listing. Changes go through
//! [`super::CommandExecutor`] instead.

use crate::state::{FileListing, FileName, PrintState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Heaters the screen can control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Heater {
    #[default]
    Extruder,
    Bed,
}

impl Heater {
    /// G-code that sets this heater's target temperature
    pub fn set_temp_gcode(self) -> &'static str {
        match self {
            Heater::Extruder => "M104",
            Heater::Bed => "M140",
        }
    }
}

/// Temperature reading of one heater (°C)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeaterStatus {
    pub current: f32,
    pub target: f32,
}

/// Motion state of the toolhead
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionStatus {
    /// Toolhead position in mm (X, Y, Z)
    pub position: [f32; 3],
    /// Position in G-code coordinates, used as the base for jog moves
    pub gcode_position: [f32; 3],
    /// Z component of the G-code offset
    pub homing_origin_z: f32,
    /// Feed rate multiplier (1.0 = 100 %)
    pub speed_factor: f32,
    /// Extrusion multiplier (1.0 = 100 %)
    pub extrude_factor: f32,
    /// G90 (true) or G91 (false)
    pub absolute_coordinates: bool,
}

impl Default for MotionStatus {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            gcode_position: [0.0; 3],
            homing_origin_z: 0.0,
            speed_factor: 1.0,
            extrude_factor: 1.0,
            absolute_coordinates: true,
        }
    }
}

/// State of one LED strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedStatus<'a> {
    /// Name used in `SET_LED LED=<name>`
    pub name: &'a str,
    /// White channel, 0.0..=1.0
    pub white: f32,
}

impl LedStatus<'_> {
    /// Whether the white channel is lit
    pub fn is_on(&self) -> bool {
        self.white > 0.0
    }
}

/// Print job statistics
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintStats {
    pub state: PrintState,
    /// Elapsed printing time in seconds
    pub print_duration_s: f32,
    /// File being printed
    pub filename: FileName,
}

/// Read-only printer status queries
pub trait Printer {
    /// Current and target temperature of a heater, if it exists
    fn heater(&self, heater: Heater) -> Option<HeaterStatus>;

    /// Toolhead motion state
    fn motion(&self) -> MotionStatus;

    /// Part cooling fan speed, 0.0..=1.0
    fn fan_speed(&self) -> f32;

    /// Z offset of the probe in mm
    fn probe_z_offset(&self) -> f32;

    /// Current maximum acceleration in mm/s²
    fn max_accel(&self) -> f32;

    /// Number of LED strips
    fn led_count(&self) -> usize;

    /// LED strip by index
    fn led(&self, index: usize) -> Option<LedStatus<'_>>;

    /// Print job statistics
    fn print_stats(&self) -> PrintStats;

    /// SD card print progress, 0.0..=1.0
    fn sd_progress(&self) -> f32;

    /// Fill `listing` with the printable files, replacing its contents
    fn list_files(&self, listing: &mut FileListing);

    /// Whether any LED strip is lit
    fn light_on(&self) -> bool {
        (0..self.led_count())
            .filter_map(|i| self.led(i))
            .any(|led| led.is_on())
    }

    /// Estimated total print time in seconds, extrapolated from progress
    fn estimated_print_time_s(&self) -> f32 {
        let progress = self.sd_progress();
        if progress > 0.0 {
            self.print_stats().print_duration_s / progress
        } else {
            0.0
        }
    }
}
