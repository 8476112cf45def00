//! Configuration type definitions

use heapless::String;

use crate::traits::Heater;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of short configured strings (alert, version, eol)
pub const MAX_SETTING_LEN: usize = 32;

/// Printer/screen variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Variant {
    /// Neptune 3 and anything not recognised
    #[default]
    Standard,
    Pro,
    Plus,
    Max,
}

impl Variant {
    /// Parse a configured variant name; unknown names map to `Standard`
    pub fn from_name(name: &str) -> Self {
        match name {
            "3Pro" => Variant::Pro,
            "3Plus" => Variant::Plus,
            "3Max" => Variant::Max,
            _ => Variant::Standard,
        }
    }

    /// Code pushed to the screen as `main.va0.val`
    pub fn code(self) -> u8 {
        match self {
            Variant::Standard | Variant::Pro => 1,
            Variant::Plus => 2,
            Variant::Max => 3,
        }
    }
}

/// Bounds for temperature targets set from the screen (°C)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TempLimits {
    /// Lowest target reachable with +/-
    pub min: u16,
    pub extruder_max: u16,
    pub bed_max: u16,
}

impl Default for TempLimits {
    fn default() -> Self {
        Self {
            min: 25,
            extruder_max: 230,
            bed_max: 125,
        }
    }
}

impl TempLimits {
    /// Upper bound for a heater
    pub fn max_for(&self, heater: Heater) -> u16 {
        match heater {
            Heater::Extruder => self.extruder_max,
            Heater::Bed => self.bed_max,
        }
    }
}

/// Complete screen configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScreenConfig {
    pub variant: Variant,
    /// Status push period in milliseconds
    pub update_interval_ms: u32,
    /// Delay between host ready and screen init in milliseconds
    pub init_delay_ms: u32,
    /// Outbound end-of-line, `\xHH` escapes not yet expanded
    pub eol: String<MAX_SETTING_LEN>,
    /// Outbound chunk size in bytes
    pub chunk_size: u8,
    /// Raw command used as the audible alert
    pub alert: String<MAX_SETTING_LEN>,
    /// Text shown as the firmware version
    pub version_text: String<MAX_SETTING_LEN>,
    pub temp_limits: TempLimits,
    /// Flow rate ceiling in percent
    pub max_flowrate: u16,
    /// Acceleration bounds in mm/s²
    pub min_accel: u32,
    pub max_accel: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Standard,
            update_interval_ms: 2000,
            init_delay_ms: 2000,
            eol: setting("\\n"),
            chunk_size: 40,
            alert: setting("beep 100"),
            version_text: setting("Klipper"),
            temp_limits: TempLimits::default(),
            max_flowrate: 150,
            min_accel: 100,
            max_accel: 10000,
        }
    }
}

fn setting(s: &str) -> String<MAX_SETTING_LEN> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}
