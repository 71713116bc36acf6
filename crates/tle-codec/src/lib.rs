//! Two-Line Element Set Codec
//!
//! Serializes classical orbital elements into the legacy fixed-width
//! two-line format consumed by SGP4 propagators.
//!
//! # Line layout
//!
//! ```text
//! 1 NNNNNC YYLLLPPP YYDDD.DDDDDDDD  .NNNNNNNN  NNNNN-N  NNNNN-N E NNNNK
//! 2 NNNNN III.IIII RRR.RRRR EEEEEEE PPP.PPPP MMM.MMMM NN.NNNNNNNNRRRRRK
//! ```
//!
//! Both lines are exactly 69 ASCII characters; the 69th is a mod-10 checksum
//! over the first 68.
//!
//! Field overflow is governed by an explicit [`OverflowPolicy`]: `Strict`
//! rejects a value wider than its field, `Legacy` keeps the historical
//! truncate-and-log behavior.

use thiserror::Error;

pub mod checksum;
pub mod elements;
pub mod encoder;
pub mod format;
pub mod text;

pub use checksum::checksum;
pub use elements::{ClampedOrbit, LaunchDesignator, OrbitalElements};
pub use encoder::{EncodedElementSet, TleEncoder};
pub use format::{FieldFormatter, Justify, OverflowPolicy};
pub use text::TleText;

/// Earth gravitational parameter μ (km³/s²)
pub const MU_EARTH_KM3_S2: f64 = 398600.4418;

/// Length of an encoded line including the checksum digit
pub const LINE_LENGTH: usize = 69;

/// Number of leading characters covered by the checksum
pub const CHECKSUM_SPAN: usize = 68;

/// Highest satellite number representable with five plain digits
pub const MAX_NUMERIC_SATNUM: u32 = 99_999;

/// Highest satellite number representable in Alpha-5 (Z9999)
pub const MAX_ALPHA5_SATNUM: u32 = 339_999;

/// Largest satellite number accepted as input at all
pub const MAX_SATNUM: u32 = 99_999_999;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("Field {field} overflows its {width}-character width: {value:?}")]
    FieldOverflow {
        field: &'static str,
        value: String,
        width: usize,
    },
    #[error("Field {field} is not a finite number")]
    NonFinite { field: &'static str },
    #[error("Field {field} contains a non-printable or non-ASCII character: {value:?}")]
    InvalidCharacter { field: &'static str, value: String },
    #[error("Field {field} cannot carry a {digits}-digit mantissa")]
    UnsupportedPrecision { field: &'static str, digits: u32 },
    #[error("Satellite number {0} cannot be encoded")]
    SatelliteNumberOutOfRange(u32),
    #[error("Malformed element set text: {0}")]
    MalformedText(String),
}

pub type Result<T> = std::result::Result<T, EncodeError>;
