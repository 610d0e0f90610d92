//! Proximity filter for geodetic CSV data.
//!
//! Loads points from a CSV file, keeps those within a radius of the camp,
//! writes them to a new CSV and renders an HTML map.

mod pipeline;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use camp_radius::config::Config;
use camp_radius::geodesy::DistanceMethod;
use camp_radius::models::ReferenceLocation;

#[derive(Parser, Debug)]
#[command(name = "camp-radius")]
#[command(about = "Filter geodetic points by distance to a reference location and map them")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV with latitude, longitude and optional description columns
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output CSV for the filtered points
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output HTML map
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Reference latitude in degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Reference longitude in degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Maximum distance to the reference, in kilometers
    #[arg(short, long, allow_hyphen_values = true)]
    radius_km: Option<f64>,

    /// Distance formula: haversine or geodesic
    #[arg(long)]
    method: Option<DistanceMethod>,

    /// Fail instead of writing a sample file when the input is missing
    #[arg(long)]
    no_sample: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Layer command line flags over the file configuration
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Loading {}", path.display()))?,
            None => Config::default(),
        };

        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            config.reference =
                ReferenceLocation::new(lat, lon).context("Invalid reference location")?;
        }
        if let Some(radius_km) = self.radius_km {
            config.filter.radius_km = radius_km;
        }
        if let Some(method) = self.method {
            config.filter.method = method;
        }
        if let Some(input) = self.input {
            config.files.input = input;
        }
        if let Some(output) = self.output {
            config.files.output = output;
        }
        if let Some(map) = self.map {
            config.files.map = map;
        }
        if self.no_sample {
            config.files.create_sample = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.into_config()?;

    info!("Camp radius filter");
    info!(
        "Reference {} radius {} km ({})",
        config.reference, config.filter.radius_km, config.filter.method
    );

    let summary = pipeline::run(&config)?;
    info!("{}", summary);

    Ok(())
}
