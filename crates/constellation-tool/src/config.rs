//! Tool configuration from JSON
//!
//! ```json
//! {
//!   "overflow": "legacy",
//!   "parallel": false,
//!   "metadata": { "classification": "U", "launch_number": 42, "first_satellite_number": 70000 }
//! }
//! ```
//!
//! Every key is optional. Command-line flags override whatever the file sets.

use crate::{Result, ToolError};
use chrono::Datelike;
use orbital_mechanics::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tle_codec::{LaunchDesignator, OrbitalElements, OverflowPolicy};
use tracing::info;

/// Fallback location of the configuration file
pub const CONFIG_ENV: &str = "WALKER_TLE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub overflow: OverflowPolicy,
    pub parallel: bool,
    pub metadata: SatelliteMetadata,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::Strict,
            parallel: true,
            metadata: SatelliteMetadata::default(),
        }
    }
}

impl ToolConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: ToolConfig = serde_json::from_reader(reader)?;
        config.metadata.check()?;
        Ok(config)
    }

    /// Load from `explicit`, else from `$WALKER_TLE_CONFIG`, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::new(self.overflow);
        if self.parallel {
            config
        } else {
            config.sequential()
        }
    }
}

/// Catalog fields the tool stamps on every element set it builds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteMetadata {
    pub classification: char,
    /// Defaults to the epoch's year
    pub launch_year: Option<u16>,
    pub launch_number: u16,
    pub launch_piece: String,
    pub element_set_number: u32,
    pub ephemeris_type: u8,
    pub revolution_number: u32,
    pub first_satellite_number: u32,
}

impl Default for SatelliteMetadata {
    fn default() -> Self {
        Self {
            classification: 'U',
            launch_year: None,
            launch_number: 1,
            launch_piece: "A".to_string(),
            element_set_number: 999,
            ephemeris_type: 0,
            revolution_number: 0,
            first_satellite_number: 1,
        }
    }
}

impl SatelliteMetadata {
    fn check(&self) -> Result<()> {
        if self.first_satellite_number == 0 {
            return Err(ToolError::Config(
                "first_satellite_number must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy the catalog fields onto `elements`, leaving the orbit alone
    pub fn apply(&self, mut elements: OrbitalElements) -> OrbitalElements {
        let year = self
            .launch_year
            .unwrap_or(elements.epoch.year().rem_euclid(10_000) as u16);
        elements.classification = self.classification;
        elements.launch = LaunchDesignator::new(year, self.launch_number, self.launch_piece.clone());
        elements.element_set_number = self.element_set_number;
        elements.ephemeris_type = self.ephemeris_type;
        elements.revolution_number = self.revolution_number;
        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.overflow, OverflowPolicy::Strict);
        assert!(config.parallel);
        assert_eq!(config.metadata.first_satellite_number, 1);
        assert!(config.generator_config().parallel);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"overflow": "legacy", "parallel": false, "metadata": {{"launch_number": 42, "launch_piece": "BC"}}}}"#
        )
        .unwrap();

        let config = ToolConfig::load(file.path()).unwrap();
        assert_eq!(config.overflow, OverflowPolicy::Legacy);
        assert!(!config.generator_config().parallel);
        assert_eq!(config.metadata.launch_number, 42);
        assert_eq!(config.metadata.launch_piece, "BC");
        assert_eq!(config.metadata.element_set_number, 999);
    }

    #[test]
    fn test_explicit_path_wins() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"overflow": "legacy"}}"#).unwrap();
        let config = ToolConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.overflow, OverflowPolicy::Legacy);
    }

    #[test]
    fn test_rejects_bad_files() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"overflow": "lenient"}}"#).unwrap();
        assert!(matches!(ToolConfig::load(file.path()), Err(ToolError::Json(_))));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"metadata": {{"first_satellite_number": 0}}}}"#).unwrap();
        assert!(matches!(ToolConfig::load(file.path()), Err(ToolError::Config(_))));

        assert!(matches!(
            ToolConfig::load("/nonexistent/walker-tle.json"),
            Err(ToolError::Io(_))
        ));
    }

    #[test]
    fn test_metadata_apply() {
        let epoch = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let el = OrbitalElements::new(7, epoch, 7000.0, 0.0, 53.0, 0.0, 0.0, 0.0);
        let meta = SatelliteMetadata {
            classification: 'S',
            launch_number: 12,
            revolution_number: 500,
            ..SatelliteMetadata::default()
        };

        let el = meta.apply(el);
        assert_eq!(el.classification, 'S');
        assert_eq!(el.launch, LaunchDesignator::new(2025, 12, "A"));
        assert_eq!(el.revolution_number, 500);
        assert_eq!(el.satellite_number, 7);
        assert_eq!(el.semi_major_axis_km, 7000.0);
    }
}
