//! Minimal TOML-style loader for the screen configuration
//!
//! Handles only the subset the screen needs:
//! - `[neptune_screen]` and `[serial_bridge]` / `[serial_bridge <name>]` headers
//! - `key = value` pairs with bare or quoted strings and integers
//! - `#` comments, whole-line or trailing
//!
//! Quoted strings are taken verbatim, so `eol = "\xff\xff\xff"` keeps its
//! backslashes for [`neptune_protocol::Eol::parse`] to expand.

use heapless::String;

use super::types::{ScreenConfig, Variant, MAX_SETTING_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section header not recognised
    InvalidSection { line: usize },
    /// Key not valid in its section
    UnknownKey { line: usize },
    /// Value has the wrong type or is out of range
    InvalidValue { line: usize },
    /// Line is neither a header nor `key = value`
    Malformed { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Screen,
    Bridge,
}

/// Parse configuration text into a [`ScreenConfig`]
///
/// Keys that are not given keep their defaults.
pub fn parse_config(input: &str) -> Result<ScreenConfig, ParseError> {
    let mut config = ScreenConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ParseError::InvalidSection { line: line_no })?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::Malformed { line: line_no })?;
        apply_value(section, key, value, &mut config, line_no)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    let mut words = header.split_whitespace();
    let section = match words.next()? {
        "neptune_screen" => Section::Screen,
        "serial_bridge" => Section::Bridge,
        _ => return None,
    };

    // Only the bridge section may carry an instance name
    match (section, words.next(), words.next()) {
        (_, None, _) => Some(section),
        (Section::Bridge, Some(_), None) => Some(section),
        _ => None,
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ScreenConfig,
    line: usize,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue { line };

    match (section, key) {
        (Section::Screen, "variant") => config.variant = Variant::from_name(parse_string(value)),
        (Section::Screen, "update_interval") => {
            config.update_interval_ms = parse_int(value).ok_or(invalid)?
        }
        (Section::Screen, "init_delay") => config.init_delay_ms = parse_int(value).ok_or(invalid)?,
        (Section::Screen, "alert") => config.alert = parse_setting(value).ok_or(invalid)?,
        (Section::Screen, "version_text") => {
            config.version_text = parse_setting(value).ok_or(invalid)?
        }
        (Section::Screen, "min_temp") => config.temp_limits.min = parse_int(value).ok_or(invalid)?,
        (Section::Screen, "extruder_max_temp") => {
            config.temp_limits.extruder_max = parse_int(value).ok_or(invalid)?
        }
        (Section::Screen, "bed_max_temp") => {
            config.temp_limits.bed_max = parse_int(value).ok_or(invalid)?
        }
        (Section::Screen, "max_flowrate") => config.max_flowrate = parse_int(value).ok_or(invalid)?,
        (Section::Screen, "min_accel") => config.min_accel = parse_int(value).ok_or(invalid)?,
        (Section::Screen, "max_accel") => config.max_accel = parse_int(value).ok_or(invalid)?,
        (Section::Bridge, "eol") => config.eol = parse_setting(value).ok_or(invalid)?,
        (Section::Bridge, "chunk_size") => {
            let size: u8 = parse_int(value).ok_or(invalid)?;
            if size == 0 {
                return Err(invalid);
            }
            config.chunk_size = size;
        }
        _ => return Err(ParseError::UnknownKey { line }),
    }

    Ok(())
}

/// Parse `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => value[..hash_pos].trim(),
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip matching double or single quotes; bare strings pass through
fn parse_string(value: &str) -> &str {
    let quoted = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);
    if quoted('"') || quoted('\'') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_setting(value: &str) -> Option<String<MAX_SETTING_LEN>> {
    let mut out = String::new();
    out.push_str(parse_string(value)).ok()?;
    Some(out)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}
