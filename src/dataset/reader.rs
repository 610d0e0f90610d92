use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use tracing::{info, warn};

use super::{write_sample, DESCRIPTION_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN};
use crate::error::DataError;
use crate::models::GeoPoint;

/// A data row that was not turned into a point
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the file
    pub line: u64,
    pub reason: String,
}

/// Result of loading a dataset
#[derive(Debug, Default)]
pub struct LoadedDataset {
    pub points: Vec<GeoPoint>,
    pub skipped: Vec<SkippedRow>,
}

impl LoadedDataset {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Make sure the input exists, writing the sample dataset when allowed.
///
/// Returns `true` when a sample file was created.
pub fn ensure_input(path: &Path, create_sample: bool) -> Result<bool, DataError> {
    if path.exists() {
        return Ok(false);
    }
    if !create_sample {
        return Err(DataError::NotFound(path.to_path_buf()));
    }
    warn!("File {} not found. Creating a sample file...", path.display());
    write_sample(path)?;
    Ok(true)
}

/// Load points from a CSV file (gzip-compressed when the extension is `.gz`)
pub fn load_points(path: &Path) -> Result<LoadedDataset, DataError> {
    info!("Loading geodetic data from {}", path.display());

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataError::NotFound(path.to_path_buf()),
        _ => DataError::Io(e),
    })?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let dataset = read_points(reader).map_err(|e| match e {
        DataError::EmptyFile(_) => DataError::EmptyFile(path.to_path_buf()),
        other => other,
    })?;

    info!(
        "Loaded {} points ({} rows skipped)",
        dataset.points.len(),
        dataset.skipped.len()
    );
    Ok(dataset)
}

/// Parse points from any CSV source with a header row.
///
/// `latitude` and `longitude` columns are required, `description` is optional.
/// Rows with missing, non-numeric or out-of-range coordinates are skipped.
pub fn read_points<R: Read>(reader: R) -> Result<LoadedDataset, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataError::EmptyFile("<input>".into()));
    }

    // Find column indices
    let lat_idx = headers.iter().position(|h| h == LATITUDE_COLUMN);
    let lon_idx = headers.iter().position(|h| h == LONGITUDE_COLUMN);
    let desc_idx = headers.iter().position(|h| h == DESCRIPTION_COLUMN);

    let (lat_idx, lon_idx) = match (lat_idx, lon_idx) {
        (Some(lat), Some(lon)) => (lat, lon),
        (lat, lon) => {
            let missing: Vec<&str> = [(lat, LATITUDE_COLUMN), (lon, LONGITUDE_COLUMN)]
                .into_iter()
                .filter(|(idx, _)| idx.is_none())
                .map(|(_, name)| name)
                .collect();
            return Err(DataError::MissingColumns(missing.join(", ")));
        }
    };

    let mut dataset = LoadedDataset::default();

    // byte records so one badly encoded row cannot abort the load
    for result in csv_reader.byte_records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        match parse_point(&record, lat_idx, lon_idx, desc_idx) {
            Ok(point) => dataset.points.push(point),
            Err(e) => {
                warn!("Skipping line {}: {}", line, e);
                dataset.skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(dataset)
}

fn field(record: &ByteRecord, idx: usize) -> String {
    String::from_utf8_lossy(record.get(idx).unwrap_or(b"")).into_owned()
}

fn parse_coordinate(record: &ByteRecord, idx: usize, name: &'static str) -> Result<f64, DataError> {
    let raw = field(record, idx);
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::InvalidCoordinate {
            field: name,
            value: raw.clone(),
        })
}

fn parse_point(
    record: &ByteRecord,
    lat_idx: usize,
    lon_idx: usize,
    desc_idx: Option<usize>,
) -> Result<GeoPoint, DataError> {
    let latitude = parse_coordinate(record, lat_idx, LATITUDE_COLUMN)?;
    let longitude = parse_coordinate(record, lon_idx, LONGITUDE_COLUMN)?;
    let description = desc_idx.map(|idx| field(record, idx));

    GeoPoint::new(latitude, longitude, description)
}
