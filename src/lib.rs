//! camp-radius - keep the geodetic points near a reference location
//!
//! This library provides the distance and filter core plus the CSV and map
//! I/O used by the `camp-radius` binary.

pub mod config;
pub mod dataset;
pub mod error;
pub mod geodesy;
pub mod map;
pub mod models;
pub mod proximity;

pub use error::DataError;
pub use models::{GeoPoint, NearbyPoint, ReferenceLocation};
pub use proximity::{filter_by_proximity, ProximityFilter};
