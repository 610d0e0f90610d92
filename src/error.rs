//! Error types for data loading and validation.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("The file must contain 'latitude' and 'longitude' columns (missing: {0})")]
    MissingColumns(String),
    #[error("The file {0} is empty")]
    EmptyFile(PathBuf),
    #[error("The file {0} was not found")]
    NotFound(PathBuf),
    #[error("Invalid {field} value {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Radius must be a non-negative number of kilometers, got {0}")]
    InvalidRadius(f64),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
