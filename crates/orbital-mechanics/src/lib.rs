//! Orbital Mechanics Library
//!
//! Keplerian period, Walker Delta constellation expansion into encoded
//! two-line element sets, and an adapter over the external SGP4 propagator.

use thiserror::Error;

pub mod propagation;
pub mod walker;

pub use propagation::{sample_window, Propagator, Sgp4Propagator, StateVector};
pub use period::orbital_period_minutes;
pub use tle_codec::{EncodeError, EncodedElementSet, OrbitalElements, OverflowPolicy};
pub use walker::{
    Constellation, ConstellationGenerator, ConstellationMember, GeneratorConfig,
    NamedElementSet, ValidationError, WalkerDelta,
};

#[derive(Error, Debug)]
pub enum OrbitalError {
    #[error("Invalid constellation: {0}")]
    Validation(#[from] ValidationError),
    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("Invalid TLE format: {0}")]
    InvalidTle(String),
    #[error("Propagation failed: {0}")]
    PropagationFailed(String),
    #[error("Invalid propagation window: {0}")]
    InvalidWindow(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

pub mod period {
    use std::f64::consts::PI;
    use tle_codec::MU_EARTH_KM3_S2;

    /// Keplerian period T = 2π·sqrt(a³/μ), in minutes.
    ///
    /// Only meaningful for a > 0; callers reject anything else first.
    pub fn orbital_period_minutes(semi_major_axis_km: f64) -> f64 {
        let period_s = 2.0 * PI * (semi_major_axis_km.powi(3) / MU_EARTH_KM3_S2).sqrt();
        period_s / 60.0
    }

    /// Period implied by a mean motion in rev/day
    pub fn period_from_mean_motion(rev_per_day: f64) -> f64 {
        1440.0 / rev_per_day
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_station_period() {
            let t = orbital_period_minutes(6793.0);
            assert!((t - 92.7).abs() / 92.7 < 0.01, "period {} min", t);
        }

        #[test]
        fn test_meo_period() {
            // 10,500 km altitude, ~6 hour orbit
            let t = orbital_period_minutes(6378.137 + 10500.0);
            assert!(t > 350.0 && t < 380.0, "period {} min", t);
        }

        #[test]
        fn test_geo_period() {
            let t = orbital_period_minutes(42164.0);
            assert!((t - 1436.0).abs() < 1.0, "period {} min", t);
        }

        #[test]
        fn test_mean_motion_consistency() {
            let a = 7000.0;
            let n = tle_codec::elements::mean_motion_rev_per_day(a);
            let t = period_from_mean_motion(n);
            assert!((t - orbital_period_minutes(a)).abs() < 1e-9);
        }
    }
}
