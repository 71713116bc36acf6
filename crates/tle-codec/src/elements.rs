//! Classical orbital elements and the physical clamping applied before encoding

use crate::MU_EARTH_KM3_S2;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Perigee radius floor (km), ~193 km altitude
pub const MIN_PERIGEE_RADIUS_KM: f64 = 6571.0;

/// Semi-major axis floor (km) applied after the perigee clamp
pub const MIN_SEMI_MAJOR_AXIS_KM: f64 = 6900.0;

pub const MAX_ECCENTRICITY: f64 = 0.999;

/// International designator (launch year, launch number of the year, piece)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchDesignator {
    pub year: u16,
    pub number: u16,
    pub piece: String,
}

impl LaunchDesignator {
    pub fn new(year: u16, number: u16, piece: impl Into<String>) -> Self {
        Self {
            year,
            number,
            piece: piece.into(),
        }
    }
}

/// One satellite's element set plus the catalog metadata carried on line 1.
///
/// Angles are degrees. The derivative terms are in rad/s² and rad/s³; the
/// encoder converts them to the rev/day² and rev/day³ forms the format stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub satellite_number: u32,
    pub classification: char,
    pub epoch: DateTime<Utc>,
    pub launch: LaunchDesignator,
    pub mean_motion_dot: f64,
    pub mean_motion_ddot: f64,
    /// B* drag term (1/earth radii)
    pub bstar: f64,
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub revolution_number: u32,
    pub element_set_number: u32,
    pub ephemeris_type: u8,
}

impl OrbitalElements {
    /// Element set with zero drag terms and placeholder catalog metadata
    /// (unclassified, launch `<epoch year>-001A`, element set 999).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        satellite_number: u32,
        epoch: DateTime<Utc>,
        semi_major_axis_km: f64,
        eccentricity: f64,
        inclination_deg: f64,
        raan_deg: f64,
        arg_perigee_deg: f64,
        mean_anomaly_deg: f64,
    ) -> Self {
        Self {
            satellite_number,
            classification: 'U',
            epoch,
            launch: LaunchDesignator::new(epoch.year().rem_euclid(10_000) as u16, 1, "A"),
            mean_motion_dot: 0.0,
            mean_motion_ddot: 0.0,
            bstar: 0.0,
            semi_major_axis_km,
            eccentricity,
            inclination_deg,
            raan_deg,
            arg_perigee_deg,
            mean_anomaly_deg,
            revolution_number: 0,
            element_set_number: 999,
            ephemeris_type: 0,
        }
    }

    pub fn with_launch(mut self, launch: LaunchDesignator) -> Self {
        self.launch = launch;
        self
    }

    pub fn with_drag(mut self, mean_motion_dot: f64, mean_motion_ddot: f64, bstar: f64) -> Self {
        self.mean_motion_dot = mean_motion_dot;
        self.mean_motion_ddot = mean_motion_ddot;
        self.bstar = bstar;
        self
    }

    /// Shape and tilt after the safety clamps, in the order the encoder
    /// applies them:
    ///
    /// 1. floor a at the minimum perigee radius
    /// 2. cap e so that a(1-e) stays at or above that radius, then bound e to [0, 0.999]
    /// 3. floor a at the minimum semi-major axis
    /// 4. bound i to [0, 180]
    pub fn clamped(&self) -> ClampedOrbit {
        let mut a = self.semi_major_axis_km.max(MIN_PERIGEE_RADIUS_KM);
        let e = self
            .eccentricity
            .min(1.0 - MIN_PERIGEE_RADIUS_KM / a)
            .max(0.0)
            .min(MAX_ECCENTRICITY);
        a = a.max(MIN_SEMI_MAJOR_AXIS_KM);
        let i = self.inclination_deg.clamp(0.0, 180.0);

        let clamped = ClampedOrbit {
            semi_major_axis_km: a,
            eccentricity: e,
            inclination_deg: i,
        };
        if a != self.semi_major_axis_km || e != self.eccentricity || i != self.inclination_deg {
            debug!(
                satellite = self.satellite_number,
                a_in = self.semi_major_axis_km,
                a_out = a,
                e_in = self.eccentricity,
                e_out = e,
                i_in = self.inclination_deg,
                i_out = i,
                "clamped orbit to safe bounds"
            );
        }
        clamped
    }
}

/// Orbit shape after clamping; what line 2 actually encodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedOrbit {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
}

impl ClampedOrbit {
    pub fn perigee_radius_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 - self.eccentricity)
    }

    pub fn mean_motion_rev_per_day(&self) -> f64 {
        mean_motion_rev_per_day(self.semi_major_axis_km)
    }
}

/// Keplerian mean motion n = sqrt(μ/a³), converted from rad/s to rev/day
pub fn mean_motion_rev_per_day(semi_major_axis_km: f64) -> f64 {
    let n_rad_s = (MU_EARTH_KM3_S2 / semi_major_axis_km.powi(3)).sqrt();
    n_rad_s * 43200.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn elements(a: f64, e: f64, i: f64) -> OrbitalElements {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        OrbitalElements::new(1, epoch, a, e, i, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_valid_orbit_untouched() {
        let c = elements(7000.0, 0.0001, 51.6).clamped();
        assert_eq!(c.semi_major_axis_km, 7000.0);
        assert_eq!(c.eccentricity, 0.0001);
        assert_eq!(c.inclination_deg, 51.6);
    }

    #[test]
    fn test_low_axis_floored() {
        let c = elements(6000.0, 0.0, 45.0).clamped();
        assert_eq!(c.semi_major_axis_km, MIN_SEMI_MAJOR_AXIS_KM);
        assert_eq!(c.eccentricity, 0.0);

        // station-like orbits sit under the floor too
        let c = elements(6793.0, 0.0001, 51.6).clamped();
        assert_eq!(c.semi_major_axis_km, MIN_SEMI_MAJOR_AXIS_KM);
        assert_eq!(c.eccentricity, 0.0001);
    }

    #[test]
    fn test_eccentricity_keeps_perigee_safe() {
        let c = elements(8000.0, 0.5, 45.0).clamped();
        assert!((c.perigee_radius_km() - MIN_PERIGEE_RADIUS_KM).abs() < 1e-6);

        let c = elements(1.0e7, 1.5, 45.0).clamped();
        assert_eq!(c.eccentricity, MAX_ECCENTRICITY);

        let c = elements(7000.0, -0.2, 45.0).clamped();
        assert_eq!(c.eccentricity, 0.0);
    }

    #[test]
    fn test_inclination_bounded() {
        assert_eq!(elements(7000.0, 0.0, 181.0).clamped().inclination_deg, 180.0);
        assert_eq!(elements(7000.0, 0.0, -3.0).clamped().inclination_deg, 0.0);
    }

    #[test]
    fn test_mean_motion_iss_like() {
        // ~15.5 rev/day for a ~420 km orbit
        let n = mean_motion_rev_per_day(6793.0);
        assert!(n > 15.4 && n < 15.7, "mean motion {}", n);
    }

    #[test]
    fn test_elements_serde() {
        let el = elements(7000.0, 0.001, 53.0).with_drag(0.0, 0.0, 1.0e-4);
        let json = serde_json::to_string(&el).unwrap();
        let back: OrbitalElements = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
        assert_eq!(back.launch.year, 2024);
    }
}
