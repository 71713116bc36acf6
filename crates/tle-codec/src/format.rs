//! Fixed-width numeric field formatting
//!
//! Every numeric TLE field goes through [`FieldFormatter::pad`], which is where
//! the [`OverflowPolicy`] is enforced.

use crate::{EncodeError, Result};
use serde::{Deserialize, Serialize};
use std::iter;
use tracing::warn;

/// Widest mantissa whose digit capacity fits a `u64`
pub const MAX_MANTISSA_DIGITS: u32 = 18;

/// What to do when a value's text is wider than its field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Reject the encode with [`EncodeError::FieldOverflow`]
    Strict,
    /// Keep the rightmost (right-justified) or leftmost (left-justified)
    /// characters and log a warning. The line stays structurally valid but
    /// the value is wrong.
    Legacy,
}

impl std::str::FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown overflow policy '{}' (expected strict or legacy)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Right,
    Left,
}

/// Field formatter bound to one overflow policy and, for diagnostics, one
/// satellite number.
#[derive(Debug, Clone, Copy)]
pub struct FieldFormatter {
    policy: OverflowPolicy,
    satellite_number: u32,
}

impl FieldFormatter {
    pub fn new(policy: OverflowPolicy) -> Self {
        Self {
            policy,
            satellite_number: 0,
        }
    }

    /// Attach the satellite number reported in overflow diagnostics
    pub fn for_satellite(mut self, satellite_number: u32) -> Self {
        self.satellite_number = satellite_number;
        self
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Pad `value` with `fill` to exactly `width` characters.
    ///
    /// A value that is already wider than `width` is a caller error: `Strict`
    /// returns [`EncodeError::FieldOverflow`], `Legacy` logs and truncates
    /// via [`pad_truncating`].
    pub fn pad(
        &self,
        field: &'static str,
        value: &str,
        fill: char,
        width: usize,
        justify: Justify,
    ) -> Result<String> {
        if value.chars().count() > width {
            match self.policy {
                OverflowPolicy::Strict => {
                    return Err(EncodeError::FieldOverflow {
                        field,
                        value: value.to_string(),
                        width,
                    });
                }
                OverflowPolicy::Legacy => {
                    warn!(
                        satellite = self.satellite_number,
                        field,
                        value,
                        width,
                        "TLE field overflow, truncating"
                    );
                }
            }
        }
        Ok(pad_truncating(value, fill, width, justify))
    }

    /// Fixed-point decimal right-justified in a space-filled field
    pub fn decimal(
        &self,
        field: &'static str,
        value: f64,
        decimals: usize,
        width: usize,
    ) -> Result<String> {
        let text = fixed_decimal(field, value, decimals)?;
        self.pad(field, &text, ' ', width, Justify::Right)
    }

    /// Encode `value` as `[sign][mantissa][+|-][exponent]` with an implied
    /// leading decimal point and no exponent character, e.g. `0.000087861`
    /// becomes ` 87861-4`.
    pub fn signed_mantissa_exponent(
        &self,
        field: &'static str,
        value: f64,
        mantissa_digits: u32,
        fill: char,
        width: usize,
    ) -> Result<String> {
        if !value.is_finite() {
            return Err(EncodeError::NonFinite { field });
        }
        if !(1..=MAX_MANTISSA_DIGITS).contains(&mantissa_digits) {
            return Err(EncodeError::UnsupportedPrecision {
                field,
                digits: mantissa_digits,
            });
        }

        let magnitude = value.abs();
        let mut exponent: i32 = if magnitude < 1.0e-9 {
            -9
        } else {
            magnitude.log10().ceil() as i32
        };
        let capacity = 10u64.pow(mantissa_digits) - 1;

        let mut mantissa = scaled_mantissa(magnitude, mantissa_digits, exponent);
        if mantissa == 0 {
            exponent = 0;
        } else if mantissa > capacity {
            // rounding carried into an extra digit
            exponent += 1;
            mantissa = scaled_mantissa(magnitude, mantissa_digits, exponent);
        }

        let digits = self.pad(
            field,
            &mantissa.to_string(),
            '0',
            mantissa_digits as usize,
            Justify::Right,
        )?;
        let sign = if value < 0.0 { '-' } else { ' ' };
        let exponent_sign = if exponent <= 0 { '-' } else { '+' };
        let formatted = format!(
            "{}{}{}{}",
            sign,
            digits,
            exponent_sign,
            exponent.unsigned_abs()
        );

        self.pad(field, &formatted, fill, width, Justify::Right)
    }
}

/// Pad without any overflow check.
///
/// Right-justified output is the last `width` characters of
/// `fill * width + value`; left-justified output is the first `width`
/// characters of `value + fill * width`. The result is always exactly
/// `width` characters.
pub fn pad_truncating(value: &str, fill: char, width: usize, justify: Justify) -> String {
    match justify {
        Justify::Right => {
            let padded: Vec<char> = iter::repeat(fill).take(width).chain(value.chars()).collect();
            padded[padded.len() - width..].iter().collect()
        }
        Justify::Left => value.chars().chain(iter::repeat(fill)).take(width).collect(),
    }
}

/// `{:.N}` formatting that never yields a negative zero
pub fn fixed_decimal(field: &'static str, value: f64, decimals: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(EncodeError::NonFinite { field });
    }
    let text = format!("{:.*}", decimals, value);
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => Ok(rest.to_string()),
        _ => Ok(text),
    }
}

fn scaled_mantissa(magnitude: f64, mantissa_digits: u32, exponent: i32) -> u64 {
    (magnitude * 10f64.powi(mantissa_digits as i32 - exponent)).round() as u64
}
