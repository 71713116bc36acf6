//! Two-line element set encoder
//!
//! Assembles line 1 (catalog metadata, epoch, drag terms) and line 2 (orbit
//! shape and orientation) field by field, then appends the checksum digit.

use crate::checksum::{checksum_char, verify};
use crate::elements::OrbitalElements;
use crate::format::{fixed_decimal, FieldFormatter, Justify, OverflowPolicy};
use crate::{
    EncodeError, Result, LINE_LENGTH, MAX_ALPHA5_SATNUM, MAX_NUMERIC_SATNUM, MAX_SATNUM,
};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;
use tracing::warn;

/// Alpha-5 leading letters for 10..=33 (I and O are skipped)
const ALPHA5_LETTERS: &[u8; 24] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const ALPHA5_SCALING: u32 = 10_000;

/// Epoch fraction digits per day (1e8)
const DAY_FRACTION_UNITS: u64 = 100_000_000;

/// rad/s² -> ṅ/2 in rev/day²
const FIRST_DERIVATIVE_SCALE: f64 = 1.86624e9 / PI;
/// rad/s³ -> n̈/6 in rev/day³
const SECOND_DERIVATIVE_SCALE: f64 = 5.3747712e13 / PI;

/// A pair of checksummed 69-character lines. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EncodedElementSet {
    line1: String,
    line2: String,
}

impl EncodedElementSet {
    /// Accept two already-encoded lines after checking length, line numbers,
    /// checksums and matching satellite numbers.
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self> {
        check_line(line1, '1')?;
        check_line(line2, '2')?;
        if line1[2..7] != line2[2..7] {
            return Err(EncodeError::MalformedText(format!(
                "satellite number mismatch: {:?} vs {:?}",
                &line1[2..7],
                &line2[2..7]
            )));
        }
        Ok(Self {
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    /// Columns 3-7 of line 1: five digits or an Alpha-5 designation
    pub fn satellite_field(&self) -> &str {
        &self.line1[2..7]
    }

    /// Numeric satellite number, decoding Alpha-5 where present
    pub fn satellite_number(&self) -> Option<u32> {
        decode_satellite_number(self.satellite_field())
    }

    /// `name\r\nline1\r\nline2`
    pub fn to_three_line(&self, name: &str) -> String {
        format!("{}\r\n{}\r\n{}", name, self.line1, self.line2)
    }
}

impl fmt::Display for EncodedElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.line1, self.line2)
    }
}

/// Encoder bound to an explicit overflow policy.
#[derive(Debug, Clone, Copy)]
pub struct TleEncoder {
    policy: OverflowPolicy,
}

impl TleEncoder {
    pub fn new(policy: OverflowPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn encode(&self, elements: &OrbitalElements) -> Result<EncodedElementSet> {
        Ok(EncodedElementSet {
            line1: self.encode_line1(elements)?,
            line2: self.encode_line2(elements)?,
        })
    }

    pub fn encode_line1(&self, el: &OrbitalElements) -> Result<String> {
        let f = FieldFormatter::new(self.policy).for_satellite(el.satellite_number);

        let classification = el.classification.to_string();
        let classification = printable("classification", &classification)?;
        let piece = printable("launch_piece", &el.launch.piece)?;
        let n1 = finite("mean_motion_dot", el.mean_motion_dot)? * FIRST_DERIVATIVE_SCALE;
        let n2 = finite("mean_motion_ddot", el.mean_motion_ddot)? * SECOND_DERIVATIVE_SCALE;

        let mut line = String::with_capacity(LINE_LENGTH);
        line.push_str("1 ");
        line.push_str(&satellite_number_field(&f, el.satellite_number)?);
        line.push_str(&f.pad("classification", classification, ' ', 1, Justify::Left)?);
        line.push(' ');
        line.push_str(&f.pad(
            "launch_year",
            &(el.launch.year % 100).to_string(),
            '0',
            2,
            Justify::Right,
        )?);
        line.push_str(&f.pad(
            "launch_number",
            &el.launch.number.to_string(),
            '0',
            3,
            Justify::Right,
        )?);
        line.push_str(&f.pad("launch_piece", piece, ' ', 3, Justify::Left)?);
        line.push(' ');
        line.push_str(&epoch_field(&f, el.epoch)?);
        line.push(' ');
        line.push_str(&f.pad(
            "mean_motion_dot",
            &first_derivative_text(n1)?,
            ' ',
            10,
            Justify::Right,
        )?);
        line.push(' ');
        line.push_str(&f.signed_mantissa_exponent("mean_motion_ddot", n2, 5, ' ', 8)?);
        line.push(' ');
        line.push_str(&f.signed_mantissa_exponent("bstar", el.bstar, 5, ' ', 8)?);
        line.push(' ');
        line.push_str(&f.pad(
            "ephemeris_type",
            &el.ephemeris_type.to_string(),
            '0',
            1,
            Justify::Right,
        )?);
        line.push(' ');
        line.push_str(&f.pad(
            "element_set_number",
            &el.element_set_number.to_string(),
            ' ',
            4,
            Justify::Right,
        )?);

        Ok(with_checksum(line))
    }

    pub fn encode_line2(&self, el: &OrbitalElements) -> Result<String> {
        let f = FieldFormatter::new(self.policy).for_satellite(el.satellite_number);

        // clamping uses f64::max/min, which would swallow a NaN
        finite("semi_major_axis", el.semi_major_axis_km)?;
        finite("eccentricity", el.eccentricity)?;
        finite("inclination", el.inclination_deg)?;
        let orbit = el.clamped();

        let eccentricity = (orbit.eccentricity * 1.0e7).round() as u64;

        let mut line = String::with_capacity(LINE_LENGTH);
        line.push_str("2 ");
        line.push_str(&satellite_number_field(&f, el.satellite_number)?);
        line.push(' ');
        line.push_str(&f.decimal("inclination", orbit.inclination_deg, 4, 8)?);
        line.push(' ');
        line.push_str(&f.decimal("raan", angle_field(el.raan_deg), 4, 8)?);
        line.push(' ');
        line.push_str(&f.pad(
            "eccentricity",
            &eccentricity.to_string(),
            '0',
            7,
            Justify::Right,
        )?);
        line.push(' ');
        line.push_str(&f.decimal("arg_perigee", angle_field(el.arg_perigee_deg), 4, 8)?);
        line.push(' ');
        line.push_str(&f.decimal("mean_anomaly", angle_field(el.mean_anomaly_deg), 4, 8)?);
        line.push(' ');
        line.push_str(&f.decimal("mean_motion", orbit.mean_motion_rev_per_day(), 8, 11)?);
        line.push_str(&f.pad(
            "revolution_number",
            &el.revolution_number.to_string(),
            ' ',
            5,
            Justify::Right,
        )?);

        Ok(with_checksum(line))
    }
}

fn with_checksum(mut line: String) -> String {
    let digit = checksum_char(&line);
    line.push(digit);
    line
}

/// Five zero-padded digits up to 99999, Alpha-5 up to 339999
fn satellite_number_field(f: &FieldFormatter, number: u32) -> Result<String> {
    if number == 0 || number > MAX_SATNUM {
        return Err(EncodeError::SatelliteNumberOutOfRange(number));
    }
    if number <= MAX_NUMERIC_SATNUM {
        return f.pad("satellite_number", &number.to_string(), '0', 5, Justify::Right);
    }

    let high = number / ALPHA5_SCALING;
    let low = f.pad(
        "satellite_number",
        &(number % ALPHA5_SCALING).to_string(),
        '0',
        4,
        Justify::Right,
    )?;

    match ALPHA5_LETTERS.get((high - 10) as usize) {
        Some(&letter) => Ok(format!("{}{}", letter as char, low)),
        None => match f.policy() {
            OverflowPolicy::Strict => Err(EncodeError::SatelliteNumberOutOfRange(number)),
            OverflowPolicy::Legacy => {
                warn!(
                    satellite = number,
                    max = MAX_ALPHA5_SATNUM,
                    "satellite number beyond Alpha-5 range, emitting placeholder"
                );
                Ok(format!("U{}", low))
            }
        },
    }
}

/// Inverse of the satellite-number field; `None` for anything malformed
pub fn decode_satellite_number(field: &str) -> Option<u32> {
    let field = field.trim();
    let mut chars = field.chars();
    let first = chars.next()?;
    if first.is_ascii_digit() {
        if !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        return field.parse().ok();
    }
    let index = ALPHA5_LETTERS
        .iter()
        .position(|&l| l as char == first.to_ascii_uppercase())?;
    let rest = chars.as_str();
    if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let low: u32 = rest.parse().ok()?;
    Some((index as u32 + 10) * ALPHA5_SCALING + low)
}

/// `YYDDD.DDDDDDDD`: year of century, day of year, fraction of the UTC day.
///
/// A fraction that rounds up to a whole day is carried into the next date.
fn epoch_field(f: &FieldFormatter, epoch: DateTime<Utc>) -> Result<String> {
    let seconds_in_day =
        epoch.num_seconds_from_midnight() as f64 + epoch.nanosecond() as f64 / 1.0e9;
    // seconds / 86400 * 1e8
    let mut fraction = (31250.0 * seconds_in_day / 27.0).round() as u64;
    let mut date = epoch.date_naive();
    if fraction >= DAY_FRACTION_UNITS {
        fraction = 0;
        date = date.succ_opt().ok_or_else(|| EncodeError::FieldOverflow {
            field: "epoch_day",
            value: date.to_string(),
            width: 3,
        })?;
    }

    let year = f.pad(
        "epoch_year",
        &date.year().rem_euclid(100).to_string(),
        '0',
        2,
        Justify::Right,
    )?;
    let day = f.pad(
        "epoch_day",
        &date.ordinal().to_string(),
        '0',
        3,
        Justify::Right,
    )?;
    let fraction = f.pad(
        "epoch_fraction",
        &fraction.to_string(),
        '0',
        8,
        Justify::Right,
    )?;
    Ok(format!("{}{}.{}", year, day, fraction))
}

/// Reduce to [0, 360) as the field will print it, so nothing renders as 360.0000
fn angle_field(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if (wrapped * 1.0e4).round() >= 360.0 * 1.0e4 {
        0.0
    } else {
        wrapped
    }
}

/// Sign column then the 8-decimal value without its leading zero
fn first_derivative_text(value: f64) -> Result<String> {
    let magnitude = fixed_decimal("mean_motion_dot", value.abs(), 8)?;
    let digits = match magnitude.strip_prefix('0') {
        Some(rest) if rest.starts_with('.') => rest.to_string(),
        _ => magnitude.clone(),
    };
    let nonzero = digits.chars().any(|c| matches!(c, '1'..='9'));
    let sign = if value < 0.0 && nonzero { '-' } else { ' ' };
    Ok(format!("{}{}", sign, digits))
}

fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EncodeError::NonFinite { field })
    }
}

fn printable<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    if value.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
        Ok(value)
    } else {
        Err(EncodeError::InvalidCharacter {
            field,
            value: value.to_string(),
        })
    }
}

fn check_line(line: &str, number: char) -> Result<()> {
    if !line.is_ascii() || line.len() != LINE_LENGTH {
        return Err(EncodeError::MalformedText(format!(
            "line {} must be {} ASCII characters, got {:?}",
            number, LINE_LENGTH, line
        )));
    }
    if !line.starts_with(number) || line.as_bytes()[1] != b' ' {
        return Err(EncodeError::MalformedText(format!(
            "expected line {}, got {:?}",
            number, line
        )));
    }
    if !verify(line) {
        return Err(EncodeError::MalformedText(format!(
            "checksum mismatch on line {}",
            number
        )));
    }
    Ok(())
}
