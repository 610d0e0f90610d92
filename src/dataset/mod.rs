//! CSV input and output for geodetic points.

mod reader;
mod sample;
mod writer;

pub use reader::{ensure_input, load_points, read_points, LoadedDataset, SkippedRow};
pub use sample::{sample_points, write_sample};
pub use writer::{write_filtered, write_nearby};

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const DESCRIPTION_COLUMN: &str = "description";
pub const DISTANCE_COLUMN: &str = "distance_km";
