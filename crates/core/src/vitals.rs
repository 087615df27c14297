//! Lenient parsing of vital signs captured at intake.
//!
//! Intake forms deliver vitals as loosely formatted text ("120/80", "37,8", "88%"). Parsing is
//! total: each field is read independently and anything that does not look like a number is
//! dropped rather than reported.

use serde::{Deserialize, Serialize};

/// Vital signs as received at the boundary, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVitalSigns {
    /// Free text such as "120/80" or "PA 120 su 80".
    pub blood_pressure: Option<String>,
    /// Body temperature in Celsius; a comma decimal separator is accepted.
    pub body_temperature: Option<String>,
    /// Heart rate in beats per minute.
    pub heart_rate: Option<String>,
    /// Peripheral oxygen saturation in percent.
    pub oxygen_saturation: Option<String>,
}

/// Typed vital signs. Every field is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub temperature_c: Option<f64>,
    pub heart_rate_bpm: Option<i32>,
    pub oxygen_saturation_pct: Option<i32>,
}

impl VitalSigns {
    /// Parses every raw field, leaving unreadable ones absent.
    pub fn parse(raw: &RawVitalSigns) -> Self {
        let pressure = raw.blood_pressure.as_deref().and_then(parse_blood_pressure);
        let (systolic, diastolic) = match pressure {
            Some((sys, dia)) => (Some(sys), Some(dia)),
            None => (None, None),
        };

        Self {
            systolic,
            diastolic,
            temperature_c: raw.body_temperature.as_deref().and_then(parse_lenient_float),
            heart_rate_bpm: raw.heart_rate.as_deref().and_then(parse_lenient_int),
            oxygen_saturation_pct: raw.oxygen_saturation.as_deref().and_then(parse_lenient_int),
        }
    }
}

/// Extracts systolic and diastolic pressure from text like "120/80".
///
/// Looks for the first pair of 2–3 digit ASCII numbers separated by at least one non-digit.
pub fn parse_blood_pressure(text: &str) -> Option<(i32, i32)> {
    let caps = regex!(r"([0-9]{2,3})[^0-9]+([0-9]{2,3})").captures(text)?;
    let systolic = caps.get(1)?.as_str().parse().ok()?;
    let diastolic = caps.get(2)?.as_str().parse().ok()?;
    Some((systolic, diastolic))
}

/// Reads the leading integer of `text`, ignoring leading whitespace and any trailing garbage.
pub fn parse_lenient_int(text: &str) -> Option<i32> {
    let caps = regex!(r"^\s*([+-]?[0-9]+)").captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Reads the leading decimal number of `text`, accepting `,` as the decimal separator.
pub fn parse_lenient_float(text: &str) -> Option<f64> {
    let normalised = text.replace(',', ".");
    let caps = regex!(r"^\s*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+))").captures(&normalised)?;
    caps.get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
