//! Walker TLE CLI
//!
//! Encodes single element sets and Walker Delta constellations as TLE text.
//!
//! Usage:
//!   walker-tle walker --epoch 2024-06-01T00:00:00Z --semi-major-axis 6921 \
//!                     --inclination 53 --total 24 --planes 4 --phasing 1 \
//!                     --output shell.tle
//!   walker-tle propagate --tle shell.tle --start 2024-06-01T00:00:00Z \
//!                        --stop 2024-06-01T01:30:00Z --step 60

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use constellation_tool::{output, ToolConfig};
use orbital_mechanics::{
    sample_window, ConstellationGenerator, NamedElementSet, Propagator, Sgp4Propagator,
    WalkerDelta,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tle_codec::{OrbitalElements, OverflowPolicy, TleEncoder, TleText};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "walker-tle",
    about = "Encode TLEs and generate Walker Delta constellations"
)]
struct Cli {
    /// JSON configuration file (falls back to $WALKER_TLE_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Field overflow handling [default: strict, or the config file's value]
    #[arg(long, global = true)]
    overflow: Option<OverflowPolicy>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode one element set
    Encode {
        #[command(flatten)]
        orbit: OrbitArgs,

        /// Name line of the three-line output
        #[arg(long, default_value = "SAT")]
        name: String,

        /// NORAD catalog number [default: config first_satellite_number]
        #[arg(long)]
        satellite_number: Option<u32>,

        /// Print JSON instead of TLE text
        #[arg(long)]
        json: bool,
    },
    /// Generate a Walker Delta T/P/F constellation
    Walker {
        #[command(flatten)]
        orbit: OrbitArgs,

        /// Total satellites (T)
        #[arg(short = 't', long)]
        total: u32,

        /// Orbital planes (P)
        #[arg(short = 'p', long)]
        planes: u32,

        /// Phasing factor (F)
        #[arg(short = 'f', long, default_value_t = 0, allow_hyphen_values = true)]
        phasing: i32,

        /// Catalog number of P0_S0 [default: config first_satellite_number]
        #[arg(long)]
        first_satellite_number: Option<u32>,

        /// Encode on a single thread
        #[arg(long)]
        sequential: bool,

        /// Print a JSON array instead of TLE text
        #[arg(long)]
        json: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Keplerian period for a semi-major axis
    Period {
        /// Semi-major axis in km
        #[arg(short = 'a', long)]
        semi_major_axis: f64,
    },
    /// Propagate a TLE with SGP4 and print state vectors as CSV
    Propagate {
        /// File holding one two- or three-line element set
        #[arg(long)]
        tle: PathBuf,

        /// Single instant (RFC 3339)
        #[arg(long, conflicts_with_all = ["start", "stop"])]
        at: Option<DateTime<Utc>>,

        /// Window start (RFC 3339)
        #[arg(long, requires = "stop")]
        start: Option<DateTime<Utc>>,

        /// Window stop (RFC 3339)
        #[arg(long, requires = "start")]
        stop: Option<DateTime<Utc>>,

        /// Sample spacing in seconds
        #[arg(long, default_value_t = 60)]
        step: u32,
    },
}

/// Template orbit shared by `encode` and `walker`
#[derive(Args, Debug)]
struct OrbitArgs {
    /// Element set epoch (RFC 3339)
    #[arg(long)]
    epoch: DateTime<Utc>,

    /// Semi-major axis in km
    #[arg(short = 'a', long)]
    semi_major_axis: f64,

    #[arg(short = 'e', long, default_value_t = 0.0)]
    eccentricity: f64,

    /// Inclination in degrees
    #[arg(short = 'i', long)]
    inclination: f64,

    /// Right ascension of the ascending node in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    raan: f64,

    /// Argument of perigee in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    arg_perigee: f64,

    /// Mean anomaly in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    mean_anomaly: f64,

    /// First derivative of mean motion (rad/s²)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    ndot: f64,

    /// Second derivative of mean motion (rad/s³)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    nddot: f64,

    /// B* drag term (1/earth radii)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    bstar: f64,
}

impl OrbitArgs {
    fn elements(&self, satellite_number: u32, config: &ToolConfig) -> OrbitalElements {
        let el = OrbitalElements::new(
            satellite_number,
            self.epoch,
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.raan,
            self.arg_perigee,
            self.mean_anomaly,
        )
        .with_drag(self.ndot, self.nddot, self.bstar);
        config.metadata.apply(el)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr so stdout stays machine-readable
    let default_filter = if cli.verbose { "debug" } else { "walker_tle=info,warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = ToolConfig::resolve(cli.config.as_deref())?;
    if let Some(policy) = cli.overflow {
        config.overflow = policy;
    }

    match cli.command {
        Command::Encode {
            orbit,
            name,
            satellite_number,
            json,
        } => {
            let number = satellite_number.unwrap_or(config.metadata.first_satellite_number);
            let elements = orbit.elements(number, &config);
            let set = TleEncoder::new(config.overflow).encode(&elements)?;
            let text = TleText::new(name, set);

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &text)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", text.render())?;
            }
        }
        Command::Walker {
            orbit,
            total,
            planes,
            phasing,
            first_satellite_number,
            sequential,
            json,
            output,
        } => {
            if sequential {
                config.parallel = false;
            }
            let number = first_satellite_number.unwrap_or(config.metadata.first_satellite_number);
            let base = orbit.elements(number, &config);
            let walker = WalkerDelta::new(base, total, planes, phasing, orbit.epoch);

            info!(
                "Walker {}/{}/{} at a = {} km, i = {}°",
                total, planes, phasing, orbit.semi_major_axis, orbit.inclination
            );
            let constellation = ConstellationGenerator::new(config.generator_config())
                .generate(&walker)?;
            info!(
                "Generated {} element sets, period {:.3} min",
                constellation.members.len(),
                constellation.period_minutes
            );

            write_constellation(&constellation.members, json, output.as_deref())?;
        }
        Command::Period { semi_major_axis } => {
            if !(semi_major_axis.is_finite() && semi_major_axis > 0.0) {
                bail!("semi-major axis must be a positive number of km, got {}", semi_major_axis);
            }
            let report = output::PeriodReport::new(semi_major_axis);
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::Propagate {
            tle,
            at,
            start,
            stop,
            step,
        } => {
            let text = std::fs::read_to_string(&tle)
                .with_context(|| format!("reading {:?}", tle))?;
            let parsed = TleText::parse(&text)?;
            info!("Propagating {}", parsed.name);

            let propagator = Sgp4Propagator::new();
            let states = match (at, start, stop) {
                (Some(at), _, _) => vec![propagator.propagate(&parsed.element_set, at)?],
                (None, Some(start), Some(stop)) => {
                    sample_window(&propagator, &parsed.element_set, start, stop, step)?
                }
                _ => bail!("give either --at or both --start and --stop"),
            };

            let stdout = io::stdout();
            output::write_states_csv(stdout.lock(), &states)?;
        }
    }

    Ok(())
}

fn write_constellation(members: &[NamedElementSet], json: bool, path: Option<&Path>) -> Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(path) => {
            info!("Writing output to {:?}", path);
            let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    if json {
        output::write_json(&mut writer, members)?;
        writeln!(writer)?;
    } else {
        writer.write_all(output::three_line_text(members).as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
