//! SGP4 propagation of encoded element sets

use crate::{OrbitalError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tle_codec::checksum::checksum_char;
use tle_codec::{EncodedElementSet, CHECKSUM_SPAN};
use tracing::{debug, warn};

/// Longest window [`sample_window`] will walk, in seconds (7 days)
pub const MAX_WINDOW_SECONDS: i64 = 604_800;

/// TEME position (km) and velocity (km/s) at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_z: f64,
    pub epoch: DateTime<Utc>,
}

impl StateVector {
    pub fn radius_km(&self) -> f64 {
        (self.position_x.powi(2) + self.position_y.powi(2) + self.position_z.powi(2)).sqrt()
    }

    pub fn speed_km_s(&self) -> f64 {
        (self.velocity_x.powi(2) + self.velocity_y.powi(2) + self.velocity_z.powi(2)).sqrt()
    }
}

/// Anything that can turn an element set into a state at a given time
pub trait Propagator {
    fn propagate(&self, set: &EncodedElementSet, at: DateTime<Utc>) -> Result<StateVector>;
}

/// Adapter over the `sgp4` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Sgp4Propagator {
    pub fn new() -> Self {
        Self
    }

    /// Epoch recorded in the element set, as the propagator reads it back
    pub fn epoch(&self, set: &EncodedElementSet) -> Result<DateTime<Utc>> {
        let elements = parse_elements(set)?;
        Ok(DateTime::<Utc>::from_naive_utc_and_offset(elements.datetime, Utc))
    }
}

impl Propagator for Sgp4Propagator {
    fn propagate(&self, set: &EncodedElementSet, at: DateTime<Utc>) -> Result<StateVector> {
        let elements = parse_elements(set)?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        let epoch_utc = DateTime::<Utc>::from_naive_utc_and_offset(elements.datetime, Utc);
        let minutes_since_epoch =
            at.signed_duration_since(epoch_utc).num_milliseconds() as f64 / 60_000.0;

        let prediction = constants
            .propagate(minutes_since_epoch)
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        Ok(StateVector {
            position_x: prediction.position[0],
            position_y: prediction.position[1],
            position_z: prediction.position[2],
            velocity_x: prediction.velocity[0],
            velocity_y: prediction.velocity[1],
            velocity_z: prediction.velocity[2],
            epoch: at,
        })
    }
}

fn parse_elements(set: &EncodedElementSet) -> Result<sgp4::Elements> {
    let (line1, line2) = numeric_lines(set)?;
    sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
        .map_err(|e| OrbitalError::InvalidTle(format!("{:?}", e)))
}

/// The two lines with an Alpha-5 satellite field replaced by its low five
/// digits and the checksums recomputed. The `sgp4` parser only reads digits
/// there, and the catalog number plays no part in propagation.
fn numeric_lines(set: &EncodedElementSet) -> Result<(String, String)> {
    let field = set.satellite_field();
    if field.bytes().all(|b| b.is_ascii_digit()) {
        return Ok((set.line1().to_string(), set.line2().to_string()));
    }

    let number = set.satellite_number().ok_or_else(|| {
        OrbitalError::InvalidTle(format!("unreadable satellite number {:?}", field))
    })?;
    let stand_in = format!("{:05}", number % 100_000);
    Ok((
        renumber(set.line1(), &stand_in),
        renumber(set.line2(), &stand_in),
    ))
}

fn renumber(line: &str, satellite_field: &str) -> String {
    let mut body = format!("{}{}{}", &line[..2], satellite_field, &line[7..CHECKSUM_SPAN]);
    body.push(checksum_char(&body));
    body
}

/// Propagate `set` from `start` to `stop` inclusive every `step_seconds`.
///
/// A zero step is treated as one second. Windows longer than
/// [`MAX_WINDOW_SECONDS`] are cut short at that length.
pub fn sample_window<P: Propagator + ?Sized>(
    propagator: &P,
    set: &EncodedElementSet,
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    step_seconds: u32,
) -> Result<Vec<StateVector>> {
    let span = stop.signed_duration_since(start).num_seconds();
    if span <= 0 {
        return Err(OrbitalError::InvalidWindow(format!(
            "stop {} is not after start {}",
            stop.to_rfc3339(),
            start.to_rfc3339()
        )));
    }

    let span = if span > MAX_WINDOW_SECONDS {
        warn!(
            requested_seconds = span,
            max_seconds = MAX_WINDOW_SECONDS,
            "propagation window truncated"
        );
        MAX_WINDOW_SECONDS
    } else {
        span
    };

    let step = i64::from(step_seconds.max(1));
    let states = (0..=span / step)
        .map(|k| propagator.propagate(set, start + Duration::seconds(k * step)))
        .collect::<Result<Vec<_>>>()?;

    debug!(samples = states.len(), step_seconds = step, "sampled propagation window");
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tle_codec::{OrbitalElements, OverflowPolicy, TleEncoder};

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 6, 0, 0).unwrap()
    }

    fn encoded() -> EncodedElementSet {
        let el = OrbitalElements::new(42, epoch(), 7000.0, 0.001, 53.0, 120.0, 90.0, 45.0);
        TleEncoder::new(OverflowPolicy::Strict).encode(&el).unwrap()
    }

    #[test]
    fn test_epoch_reads_back() {
        let read = Sgp4Propagator::new().epoch(&encoded()).unwrap();
        let drift = read.signed_duration_since(epoch()).num_milliseconds().abs();
        assert!(drift <= 1, "epoch drift {} ms", drift);
    }

    #[test]
    fn test_propagate_at_epoch() {
        let state = Sgp4Propagator::new().propagate(&encoded(), epoch()).unwrap();
        let r = state.radius_km();
        assert!(r > 6900.0 && r < 7100.0, "radius {} km", r);
        let v = state.speed_km_s();
        assert!(v > 7.0 && v < 8.0, "speed {} km/s", v);
        assert_eq!(state.epoch, epoch());
    }

    #[test]
    fn test_one_period_later_returns_near_start() {
        let set = encoded();
        let prop = Sgp4Propagator::new();
        let period_s = crate::orbital_period_minutes(7000.0) * 60.0;
        let a = prop.propagate(&set, epoch()).unwrap();
        let b = prop
            .propagate(&set, epoch() + Duration::milliseconds((period_s * 1000.0) as i64))
            .unwrap();
        let dr = ((a.position_x - b.position_x).powi(2)
            + (a.position_y - b.position_y).powi(2)
            + (a.position_z - b.position_z).powi(2))
        .sqrt();
        // J2 drift only
        assert!(dr < 100.0, "drift {} km", dr);
    }

    #[test]
    fn test_alpha5_sets_propagate() {
        let mut el = OrbitalElements::new(99_999, epoch(), 7000.0, 0.001, 53.0, 120.0, 90.0, 45.0);
        let prop = Sgp4Propagator::new();
        let encoder = TleEncoder::new(OverflowPolicy::Strict);

        let numeric = prop.propagate(&encoder.encode(&el).unwrap(), epoch()).unwrap();

        el.satellite_number = 100_000;
        let set = encoder.encode(&el).unwrap();
        assert_eq!(set.satellite_field(), "A0000");
        let alpha5 = prop.propagate(&set, epoch()).unwrap();
        assert_eq!(alpha5, numeric);

        let (line1, line2) = numeric_lines(&set).unwrap();
        assert_eq!(&line1[2..7], "00000");
        assert_eq!(&line2[2..7], "00000");
        assert!(EncodedElementSet::from_lines(&line1, &line2).is_ok());
    }

    #[test]
    fn test_sample_window_counts() {
        let set = encoded();
        let prop = Sgp4Propagator::new();

        let states = sample_window(&prop, &set, epoch(), epoch() + Duration::minutes(10), 60).unwrap();
        assert_eq!(states.len(), 11);
        assert_eq!(states[10].epoch, epoch() + Duration::minutes(10));

        let states = sample_window(&prop, &set, epoch(), epoch() + Duration::seconds(5), 0).unwrap();
        assert_eq!(states.len(), 6);
    }

    #[test]
    fn test_sample_window_truncates_long_windows() {
        let states = sample_window(
            &Sgp4Propagator::new(),
            &encoded(),
            epoch(),
            epoch() + Duration::days(30),
            86_400,
        )
        .unwrap();
        assert_eq!(states.len(), 8);
    }

    #[test]
    fn test_sample_window_rejects_empty_window() {
        let err = sample_window(&Sgp4Propagator::new(), &encoded(), epoch(), epoch(), 60).unwrap_err();
        assert!(matches!(err, OrbitalError::InvalidWindow(_)));
    }
}
