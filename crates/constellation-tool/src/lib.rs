//! Walker TLE Tool
//!
//! Configuration loading and output rendering behind the `walker-tle` binary.
//! The encoding and constellation math live in `tle-codec` and
//! `orbital-mechanics`; this crate only wires them to files and flags.

use thiserror::Error;

pub mod config;
pub mod output;

pub use config::{SatelliteMetadata, ToolConfig, CONFIG_ENV};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Orbital(#[from] orbital_mechanics::OrbitalError),
    #[error(transparent)]
    Encode(#[from] tle_codec::EncodeError),
}

pub type Result<T> = std::result::Result<T, ToolError>;
