//! Orbital domain strategies for property-based testing

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use tle_codec::{LaunchDesignator, OrbitalElements, MAX_ALPHA5_SATNUM, MAX_NUMERIC_SATNUM};

// ============================================================================
// Orbit Shape Generators
// ============================================================================

/// Semi-major axis in km, LEO floor to beyond GEO
pub fn semi_major_axis_km() -> impl Strategy<Value = f64> {
    6_900.0f64..50_000.0
}

/// Semi-major axis in km including values under the encoder's floors
pub fn semi_major_axis_any() -> impl Strategy<Value = f64> {
    1.0f64..1.0e6
}

/// Eccentricity in [0, 0.999)
pub fn eccentricity() -> impl Strategy<Value = f64> {
    0.0f64..0.999
}

/// Near-circular eccentricity (0-0.01)
pub fn eccentricity_circular() -> impl Strategy<Value = f64> {
    0.0f64..0.01
}

/// Inclination in degrees (0-180)
pub fn inclination_deg() -> impl Strategy<Value = f64> {
    0.0f64..=180.0
}

/// RAAN, argument of perigee or mean anomaly (0-360 deg)
pub fn angle_deg() -> impl Strategy<Value = f64> {
    0.0f64..360.0
}

/// Unreduced angle, several turns either way
pub fn angle_any() -> impl Strategy<Value = f64> {
    -3_600.0f64..3_600.0
}

// ============================================================================
// Drag Term Generators
// ============================================================================

/// First derivative of mean motion (rad/s²)
pub fn mean_motion_dot() -> impl Strategy<Value = f64> {
    -1.0e-13f64..1.0e-13
}

/// Second derivative of mean motion (rad/s³)
pub fn mean_motion_ddot() -> impl Strategy<Value = f64> {
    -1.0e-20f64..1.0e-20
}

/// B* drag term (1/earth radii)
pub fn bstar() -> impl Strategy<Value = f64> {
    -1.0e-3f64..1.0e-3
}

// ============================================================================
// Catalog Generators
// ============================================================================

/// NORAD catalog number in the five-digit range
pub fn norad_id() -> impl Strategy<Value = u32> {
    1u32..=MAX_NUMERIC_SATNUM
}

/// Catalog number that needs the Alpha-5 letter prefix
pub fn alpha5_id() -> impl Strategy<Value = u32> {
    (MAX_NUMERIC_SATNUM + 1)..=MAX_ALPHA5_SATNUM
}

/// Any catalog number a strict encoder accepts
pub fn catalog_id() -> impl Strategy<Value = u32> {
    1u32..=MAX_ALPHA5_SATNUM
}

/// Epoch between 2000 and 2049, whole seconds
pub fn epoch() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..=2_524_607_999).prop_filter_map("valid timestamp", |secs| {
        Utc.timestamp_opt(secs, 0).single()
    })
}

pub fn launch_designator() -> impl Strategy<Value = LaunchDesignator> {
    (1957u16..=2056, 1u16..=999, "[A-HJ-NP-Z]{1,3}")
        .prop_map(|(year, number, piece)| LaunchDesignator::new(year, number, piece))
}

// ============================================================================
// Composite Generators
// ============================================================================

/// Complete element set inside every encoder bound
pub fn orbital_elements() -> impl Strategy<Value = OrbitalElements> {
    (
        (norad_id(), epoch(), launch_designator()),
        (semi_major_axis_km(), eccentricity_circular(), inclination_deg()),
        (angle_deg(), angle_deg(), angle_deg()),
        (mean_motion_dot(), mean_motion_ddot(), bstar()),
        (0u32..=99_999, 0u32..=9_999),
    )
        .prop_map(|(catalog, shape, angles, drag, counters)| {
            let (satnum, epoch, launch) = catalog;
            let (a, e, i) = shape;
            let (raan, argp, ma) = angles;
            let (dot, ddot, bstar) = drag;
            let (rev, elset) = counters;
            let mut el = OrbitalElements::new(satnum, epoch, a, e, i, raan, argp, ma)
                .with_launch(launch)
                .with_drag(dot, ddot, bstar);
            el.revolution_number = rev;
            el.element_set_number = elset;
            el
        })
}

/// Element set with shape values that may need clamping
pub fn unclamped_elements() -> impl Strategy<Value = OrbitalElements> {
    (
        norad_id(),
        epoch(),
        semi_major_axis_any(),
        -0.5f64..1.5,
        -10.0f64..190.0,
        angle_deg(),
    )
        .prop_map(|(satnum, epoch, a, e, i, angle)| {
            OrbitalElements::new(satnum, epoch, a, e, i, angle, angle, angle)
        })
}

/// Walker shape (T, P, F) with T divisible by P and 0 <= F < P
pub fn walker_shape() -> impl Strategy<Value = (u32, u32, i32)> {
    (1u32..=20, 1u32..=20).prop_flat_map(|(planes, per_plane)| {
        (0..planes as i32).prop_map(move |phasing| (planes * per_plane, planes, phasing))
    })
}
