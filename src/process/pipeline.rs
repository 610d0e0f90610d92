//! load → filter → write → render, with the fallbacks for missing or empty data.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, warn};

use camp_radius::config::Config;
use camp_radius::dataset::{ensure_input, load_points, write_filtered};
use camp_radius::map::save_map;
use camp_radius::models::GeoPoint;

/// What a run produced
#[derive(Debug)]
pub struct RunSummary {
    pub loaded: usize,
    pub skipped: usize,
    pub kept: usize,
    pub radius_km: f64,
    pub filtered_csv: Option<PathBuf>,
    pub map: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} points within {} km ({} rows skipped), map at {}",
            self.kept,
            self.loaded,
            self.radius_km,
            self.skipped,
            self.map.display()
        )?;
        if let Some(csv) = &self.filtered_csv {
            write!(f, ", filtered data at {}", csv.display())?;
        }
        Ok(())
    }
}

fn reference_only_map(config: &Config) -> Result<()> {
    let mut options = config.map_options();
    options.generated_at = Some(Utc::now());
    save_map(&config.files.map, &[], &config.reference, &options)
        .with_context(|| format!("Failed to save map to {}", config.files.map.display()))
}

pub fn run(config: &Config) -> Result<RunSummary> {
    let filter = config.proximity_filter()?;
    let input = &config.files.input;

    let loaded = ensure_input(input, config.files.create_sample)
        .and_then(|_| load_points(input));
    let dataset = match loaded {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Failed to load geodetic data: {}", e);
            reference_only_map(config)?;
            return Err(e).with_context(|| format!("Cannot process {}", input.display()));
        }
    };

    let mut summary = RunSummary {
        loaded: dataset.points.len(),
        skipped: dataset.skipped.len(),
        kept: 0,
        radius_km: filter.radius_km(),
        filtered_csv: None,
        map: config.files.map.clone(),
    };

    if dataset.is_empty() {
        warn!("Geodetic data file was loaded but has no valid points. No points to filter.");
        reference_only_map(config)?;
        return Ok(summary);
    }

    info!("Geodetic data loaded successfully.");

    let nearby = filter.filter_with_distances(dataset.points);
    summary.kept = nearby.len();

    if nearby.is_empty() {
        info!("No points found within {} km of the camp.", filter.radius_km());
    } else {
        info!(
            "Filtered {} points within {} km of the camp.",
            nearby.len(),
            filter.radius_km()
        );
        write_filtered(&config.files.output, &nearby).with_context(|| {
            format!(
                "Failed to save filtered data to {}",
                config.files.output.display()
            )
        })?;
        summary.filtered_csv = Some(config.files.output.clone());
    }

    let points: Vec<GeoPoint> = nearby.into_iter().map(|n| n.point).collect();
    let mut options = config.map_options();
    options.generated_at = Some(Utc::now());
    save_map(&config.files.map, &points, filter.reference(), &options)
        .with_context(|| format!("Failed to save map to {}", config.files.map.display()))?;

    Ok(summary)
}
