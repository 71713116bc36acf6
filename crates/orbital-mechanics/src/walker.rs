//! Walker Delta constellation expansion
//!
//! # Walker Delta Notation: T/P/F
//! - T = Total satellites
//! - P = Number of orbital planes
//! - F = Phasing factor
//!
//! Planes are spread evenly over 360° of RAAN. Within a plane satellites are
//! spaced 360°/(T/P) apart in mean anomaly, and each successive plane is
//! shifted by Δθ = F·360°/T.
//!
//! Example 6/3/1: planes at 0°, 120°, 240° RAAN, two satellites per plane
//! 180° apart, 60° phase step between planes.

use crate::period::orbital_period_minutes;
use crate::Result;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tle_codec::{EncodedElementSet, OrbitalElements, OverflowPolicy, TleEncoder, TleText};
use tracing::debug;

pub const MAX_PLANES: u32 = 100;
pub const MAX_SATELLITES: u32 = 10_000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("plane count {0} outside 1..=100")]
    PlaneCountOutOfRange(u32),
    #[error("satellite count {0} outside 1..=10000")]
    SatelliteCountOutOfRange(u32),
    #[error("{total} satellites cannot be split evenly across {planes} planes")]
    UnevenPlanes { total: u32, planes: u32 },
    #[error("inclination {0}° outside 0..=180")]
    InclinationOutOfRange(f64),
    #[error("{0} is not a finite angle")]
    NonFiniteAngle(&'static str),
    #[error("semi-major axis {0} km must be finite and positive")]
    InvalidSemiMajorAxis(f64),
    #[error("satellite numbers starting at {first} for {count} satellites exceed the catalog range")]
    SatelliteNumberOutOfRange { first: u32, count: u32 },
}

/// One Walker Delta request: a template orbit plus the T/P/F shape and the
/// single epoch shared by every member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkerDelta {
    pub base: OrbitalElements,
    pub total_satellites: u32,
    pub planes: u32,
    pub phasing: i32,
    pub epoch: DateTime<Utc>,
}

impl WalkerDelta {
    pub fn new(
        base: OrbitalElements,
        total_satellites: u32,
        planes: u32,
        phasing: i32,
        epoch: DateTime<Utc>,
    ) -> Self {
        Self {
            base,
            total_satellites,
            planes,
            phasing,
            epoch,
        }
    }

    pub fn satellites_per_plane(&self) -> u32 {
        self.total_satellites / self.planes
    }

    pub fn plane_spacing_deg(&self) -> f64 {
        360.0 / self.planes as f64
    }

    pub fn in_plane_spacing_deg(&self) -> f64 {
        360.0 / self.satellites_per_plane() as f64
    }

    /// Δθ = F·360°/T
    pub fn phase_offset_deg(&self) -> f64 {
        self.phasing as f64 * 360.0 / self.total_satellites as f64
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let (t, p) = (self.total_satellites, self.planes);
        if !(1..=MAX_PLANES).contains(&p) {
            return Err(ValidationError::PlaneCountOutOfRange(p));
        }
        if !(1..=MAX_SATELLITES).contains(&t) {
            return Err(ValidationError::SatelliteCountOutOfRange(t));
        }
        if t % p != 0 {
            return Err(ValidationError::UnevenPlanes { total: t, planes: p });
        }

        let base = &self.base;
        for (name, angle) in [
            ("inclination", base.inclination_deg),
            ("raan", base.raan_deg),
            ("arg_perigee", base.arg_perigee_deg),
            ("mean_anomaly", base.mean_anomaly_deg),
        ] {
            if !angle.is_finite() {
                return Err(ValidationError::NonFiniteAngle(name));
            }
        }
        if !(0.0..=180.0).contains(&base.inclination_deg) {
            return Err(ValidationError::InclinationOutOfRange(base.inclination_deg));
        }
        if !(base.semi_major_axis_km.is_finite() && base.semi_major_axis_km > 0.0) {
            return Err(ValidationError::InvalidSemiMajorAxis(base.semi_major_axis_km));
        }

        let last = base.satellite_number.checked_add(t - 1);
        if base.satellite_number == 0 || last.map_or(true, |n| n > tle_codec::MAX_SATNUM) {
            return Err(ValidationError::SatelliteNumberOutOfRange {
                first: base.satellite_number,
                count: t,
            });
        }
        Ok(())
    }

    /// Derive the member at flat index `plane * satellites_per_plane + slot`.
    ///
    /// Assumes [`validate`](Self::validate) has passed.
    pub fn member(&self, index: u32) -> ConstellationMember {
        let per_plane = self.satellites_per_plane();
        let plane = index / per_plane;
        let slot = index % per_plane;

        let raan = wrap_degrees(plane as f64 * self.plane_spacing_deg() + self.base.raan_deg);
        let plane_phase = wrap_degrees(plane as f64 * self.phase_offset_deg());
        let mean_anomaly = wrap_degrees(
            self.base.mean_anomaly_deg + slot as f64 * self.in_plane_spacing_deg() + plane_phase,
        );

        let mut elements = self.base.clone();
        elements.satellite_number = self.base.satellite_number + index;
        elements.epoch = self.epoch;
        elements.raan_deg = raan;
        elements.mean_anomaly_deg = mean_anomaly;

        ConstellationMember {
            plane,
            slot,
            elements,
        }
    }

    /// All members in plane-major, slot-minor order. Each call starts over.
    pub fn members(
        &self,
    ) -> std::result::Result<impl ExactSizeIterator<Item = ConstellationMember> + '_, ValidationError>
    {
        self.validate()?;
        Ok((0..self.total_satellites).map(move |i| self.member(i)))
    }
}

/// Reduce to [0, 360)
fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Derived elements for one (plane, slot) position, before encoding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstellationMember {
    pub plane: u32,
    pub slot: u32,
    pub elements: OrbitalElements,
}

impl ConstellationMember {
    pub fn name(&self) -> String {
        format!("P{}_S{}", self.plane, self.slot)
    }
}

/// Encoded constellation member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedElementSet {
    pub name: String,
    pub plane: u32,
    pub slot: u32,
    pub element_set: EncodedElementSet,
}

impl NamedElementSet {
    pub fn to_three_line(&self) -> String {
        self.element_set.to_three_line(&self.name)
    }
}

impl From<NamedElementSet> for TleText {
    fn from(named: NamedElementSet) -> Self {
        TleText::new(named.name, named.element_set)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Constellation {
    /// Keplerian period of the template orbit
    pub period_minutes: f64,
    pub members: Vec<NamedElementSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub overflow: OverflowPolicy,
    /// Encode members on the rayon pool; output order is unaffected
    pub parallel: bool,
}

impl GeneratorConfig {
    pub fn new(overflow: OverflowPolicy) -> Self {
        Self {
            overflow,
            parallel: true,
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Expands [`WalkerDelta`] requests into encoded element sets.
#[derive(Debug, Clone, Copy)]
pub struct ConstellationGenerator {
    config: GeneratorConfig,
    encoder: TleEncoder,
}

impl ConstellationGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            encoder: TleEncoder::new(config.overflow),
        }
    }

    pub fn config(&self) -> GeneratorConfig {
        self.config
    }

    pub fn generate(&self, walker: &WalkerDelta) -> Result<Constellation> {
        let mut members = Vec::with_capacity(walker.total_satellites as usize);
        let period_minutes = self.generate_into(walker, &mut members)?;
        Ok(Constellation {
            period_minutes,
            members,
        })
    }

    /// Append every member to `out`, returning the template orbit's period.
    ///
    /// Validation runs before any encoding, and `out` is only touched once
    /// every member has encoded, so a failure leaves it unchanged.
    pub fn generate_into(
        &self,
        walker: &WalkerDelta,
        out: &mut Vec<NamedElementSet>,
    ) -> Result<f64> {
        walker.validate()?;
        let period_minutes = orbital_period_minutes(walker.base.semi_major_axis_km);

        let encode = |index: u32| -> Result<NamedElementSet> {
            let member = walker.member(index);
            let element_set = self.encoder.encode(&member.elements)?;
            Ok(NamedElementSet {
                name: member.name(),
                plane: member.plane,
                slot: member.slot,
                element_set,
            })
        };

        let total = walker.total_satellites;
        let members: Vec<NamedElementSet> = if self.config.parallel {
            (0..total).into_par_iter().map(encode).collect::<Result<_>>()?
        } else {
            (0..total).map(encode).collect::<Result<_>>()?
        };

        debug!(
            total,
            planes = walker.planes,
            phasing = walker.phasing,
            period_minutes,
            parallel = self.config.parallel,
            "generated Walker Delta constellation"
        );

        out.extend(members);
        Ok(period_minutes)
    }
}
