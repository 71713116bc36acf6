//! Text, JSON and CSV rendering

use crate::Result;
use orbital_mechanics::{orbital_period_minutes, NamedElementSet, StateVector};
use serde::Serialize;
use std::io::Write;

pub const STATE_CSV_HEADER: &str = "time,x_km,y_km,z_km,vx,vy,vz";

/// Output of `walker-tle period`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PeriodReport {
    pub semi_major_axis_km: f64,
    pub period_minutes: f64,
}

impl PeriodReport {
    pub fn new(semi_major_axis_km: f64) -> Self {
        Self {
            semi_major_axis_km,
            period_minutes: orbital_period_minutes(semi_major_axis_km),
        }
    }
}

/// Concatenated `name\r\nline1\r\nline2` blocks, one per member
pub fn three_line_text(members: &[NamedElementSet]) -> String {
    let mut text = members
        .iter()
        .map(NamedElementSet::to_three_line)
        .collect::<Vec<_>>()
        .join("\r\n");
    if !text.is_empty() {
        text.push_str("\r\n");
    }
    text
}

pub fn write_json<W: Write>(writer: W, members: &[NamedElementSet]) -> Result<()> {
    serde_json::to_writer_pretty(writer, members)?;
    Ok(())
}

pub fn write_states_csv<W: Write>(mut writer: W, states: &[StateVector]) -> Result<()> {
    writeln!(writer, "{}", STATE_CSV_HEADER)?;
    for s in states {
        writeln!(
            writer,
            "{},{:.6},{:.6},{:.6},{:.9},{:.9},{:.9}",
            s.epoch.to_rfc3339(),
            s.position_x,
            s.position_y,
            s.position_z,
            s.velocity_x,
            s.velocity_y,
            s.velocity_z
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use orbital_mechanics::{ConstellationGenerator, GeneratorConfig, WalkerDelta};
    use tle_codec::{OrbitalElements, OverflowPolicy, TleText};

    fn members() -> Vec<NamedElementSet> {
        let epoch = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let base = OrbitalElements::new(100, epoch, 7000.0, 0.0, 53.0, 0.0, 0.0, 0.0);
        let walker = WalkerDelta::new(base, 4, 2, 1, epoch);
        ConstellationGenerator::new(GeneratorConfig::new(OverflowPolicy::Strict))
            .generate(&walker)
            .unwrap()
            .members
    }

    #[test]
    fn test_three_line_text_parses_back() {
        let members = members();
        let text = three_line_text(&members);
        assert!(text.starts_with("P0_S0\r\n1 00100U"));
        assert!(text.ends_with("\r\n"));

        let parsed = TleText::parse_many(&text).unwrap();
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[3].name, "P1_S1");
        assert_eq!(parsed[3].element_set, members[3].element_set);

        assert_eq!(three_line_text(&[]), "");
    }

    #[test]
    fn test_json_records() {
        let mut buf = Vec::new();
        write_json(&mut buf, &members()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[2]["name"], "P1_S0");
        assert_eq!(records[2]["plane"], 1);
        assert_eq!(records[2]["element_set"]["line1"].as_str().unwrap().len(), 69);
    }

    #[test]
    fn test_period_report_keys() {
        let value = serde_json::to_value(PeriodReport::new(6793.0)).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["period_minutes", "semi_major_axis_km"]);
        assert!((value["period_minutes"].as_f64().unwrap() - 92.87).abs() < 0.01);
    }

    #[test]
    fn test_states_csv() {
        let epoch = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let state = StateVector {
            position_x: 7000.0,
            position_y: 0.0,
            position_z: -1.5,
            velocity_x: 0.0,
            velocity_y: 7.5,
            velocity_z: 0.0,
            epoch,
        };
        let mut buf = Vec::new();
        write_states_csv(&mut buf, &[state]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(STATE_CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("2024-06-01T00:00:00+00:00,7000.000000,0.000000,-1.500000,0.000000000,7.500000000,0.000000000")
        );
    }
}
