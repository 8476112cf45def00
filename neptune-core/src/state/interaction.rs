//! Interaction modes
//!
//! The screen has no numeric entry for most values; the user picks a step size
//! and a target, then presses +/-. The state here records those choices and
//! turns a press into the new value.
//!
//! Step sizes are coupled: picking a jog step on the temperature page also
//! picks the temperature/rate step and the acceleration step.

use crate::config::TempLimits;
use crate::traits::{Heater, MotionStatus};

use super::files::{FileListing, FileName};
use super::print::PrintState;

/// Direction of a +/- press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

/// Axis jog distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogStep {
    Tenth,
    #[default]
    One,
    Ten,
}

impl JogStep {
    /// Distance in mm
    pub fn mm(self) -> f32 {
        match self {
            JogStep::Tenth => 0.1,
            JogStep::One => 1.0,
            JogStep::Ten => 10.0,
        }
    }
}

/// Z-offset adjustment distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZOffsetStep {
    Hundredth,
    #[default]
    Tenth,
    One,
}

impl ZOffsetStep {
    /// Distance in mm
    pub fn mm(self) -> f32 {
        match self {
            ZOffsetStep::Hundredth => 0.01,
            ZOffsetStep::Tenth => 0.1,
            ZOffsetStep::One => 1.0,
        }
    }
}

/// Coupled step presets of the temperature page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepPreset {
    /// 0.1 mm, 1 °C / %, 10 mm/s²
    Fine,
    /// 1 mm, 5 °C / %, 50 mm/s²
    Medium,
    /// 10 mm, 10 °C / %, 100 mm/s²
    Coarse,
}

impl StepPreset {
    /// (jog step, temperature/rate step, acceleration step)
    pub fn steps(self) -> (JogStep, u16, u16) {
        match self {
            StepPreset::Fine => (JogStep::Tenth, 1, 10),
            StepPreset::Medium => (JogStep::One, 5, 50),
            StepPreset::Coarse => (JogStep::Ten, 10, 100),
        }
    }
}

/// Rate currently adjusted by the speed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedTarget {
    #[default]
    Feedrate,
    Flowrate,
    FanSpeed,
}

/// Result of a +/- press on the speed page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedAdjustment {
    pub target: SpeedTarget,
    /// New value in percent, already clamped
    pub percent: f32,
}

/// Mode variables shared by all handlers
#[derive(Debug, Clone)]
pub struct InteractionState {
    pub jog_step: JogStep,
    /// Temperature (°C) and rate (%) step
    pub temp_step: u16,
    /// Acceleration step (mm/s²)
    pub accel_step: u16,
    pub speed_target: SpeedTarget,
    pub temp_target: Heater,
    pub zoffset_step: ZOffsetStep,
    /// Print state seen by the last status push
    pub last_print_state: Option<PrintState>,
    /// File picked on the file page, awaiting confirmation
    pub selected_file: Option<FileName>,
    /// Listing shown on the file page
    pub files: FileListing,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    pub const fn new() -> Self {
        Self {
            jog_step: JogStep::One,
            temp_step: 1,
            accel_step: 10,
            speed_target: SpeedTarget::Feedrate,
            temp_target: Heater::Extruder,
            zoffset_step: ZOffsetStep::Tenth,
            last_print_state: None,
            selected_file: None,
            files: FileListing::new(),
        }
    }

    /// Apply a coupled step preset
    pub fn select_step(&mut self, preset: StepPreset) {
        let (jog, temp, accel) = preset.steps();
        self.jog_step = jog;
        self.temp_step = temp;
        self.accel_step = accel;
    }

    /// New target for the active heater, or `None` if it would leave the
    /// heater's limits
    pub fn adjust_temperature(&self, target: f32, dir: Direction, limits: &TempLimits) -> Option<f32> {
        let new_target = target + self.temp_step as f32 * dir.sign();
        let max = limits.max_for(self.temp_target) as f32;

        if new_target >= limits.min as f32 && new_target <= max {
            Some(new_target)
        } else {
            None
        }
    }

    /// New value of the active rate
    ///
    /// Feed rate is floored at 0 %, flow rate clamped to `0..=max_flowrate`,
    /// fan speed to `0..=100`.
    pub fn adjust_speed(
        &self,
        motion: &MotionStatus,
        fan_speed: f32,
        dir: Direction,
        max_flowrate: u16,
    ) -> SpeedAdjustment {
        let delta = self.temp_step as f32 * dir.sign();

        let percent = match self.speed_target {
            SpeedTarget::Feedrate => {
                let new = motion.speed_factor * 100.0 + delta;
                if new < 0.0 {
                    0.0
                } else {
                    new
                }
            }
            SpeedTarget::Flowrate => {
                (motion.extrude_factor * 100.0 + delta).clamp(0.0, max_flowrate as f32)
            }
            SpeedTarget::FanSpeed => (fan_speed + delta / 100.0).clamp(0.0, 1.0) * 100.0,
        };

        SpeedAdjustment {
            target: self.speed_target,
            percent,
        }
    }

    /// New maximum acceleration, clamped to `min..=max`
    pub fn adjust_accel(&self, current: f32, dir: Direction, min: u32, max: u32) -> f32 {
        (current + self.accel_step as f32 * dir.sign()).clamp(min as f32, max as f32)
    }

    /// New G-code Z offset after one step
    pub fn adjust_zoffset(&self, current: f32, dir: Direction) -> f32 {
        current + self.zoffset_step.mm() * dir.sign()
    }

    /// Pick a file from the cached listing
    ///
    /// Returns `None` and leaves the selection untouched when `index` is past
    /// the end of the listing.
    pub fn select_file(&mut self, index: usize) -> Option<&FileName> {
        let name = self.files.get(index)?.name.clone();
        self.selected_file = Some(name);
        self.selected_file.as_ref()
    }

    /// Record the latest print state and return the page its change calls for
    ///
    /// The first observation only seeds the state.
    pub fn observe_print_state(&mut self, state: PrintState) -> Option<&'static str> {
        let previous = self.last_print_state.replace(state)?;
        previous.transition_page(state)
    }
}
