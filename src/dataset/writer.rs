use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::{DESCRIPTION_COLUMN, DISTANCE_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN};
use crate::error::DataError;
use crate::models::NearbyPoint;

#[derive(Serialize)]
struct FilteredRow<'a> {
    latitude: f64,
    longitude: f64,
    description: Option<&'a str>,
    distance_km: f64,
}

impl<'a> From<&'a NearbyPoint> for FilteredRow<'a> {
    fn from(nearby: &'a NearbyPoint) -> Self {
        Self {
            latitude: nearby.point.latitude(),
            longitude: nearby.point.longitude(),
            description: nearby.point.description(),
            distance_km: nearby.distance_km,
        }
    }
}

/// Write retained points as CSV: `latitude,longitude,description,distance_km`
pub fn write_nearby<W: Write>(writer: W, points: &[NearbyPoint]) -> Result<(), DataError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if points.is_empty() {
        // serialize() only emits the header alongside the first row
        csv_writer.write_record([
            LATITUDE_COLUMN,
            LONGITUDE_COLUMN,
            DESCRIPTION_COLUMN,
            DISTANCE_COLUMN,
        ])?;
    }
    for nearby in points {
        csv_writer.serialize(FilteredRow::from(nearby))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Save the filtered subset to `path`
pub fn write_filtered(path: &Path, points: &[NearbyPoint]) -> Result<(), DataError> {
    let file = File::create(path)?;
    write_nearby(file, points)?;
    info!("Filtered data saved to '{}'", path.display());
    Ok(())
}
