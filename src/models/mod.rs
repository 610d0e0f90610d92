//! Core data models for the proximity filter.

pub mod point;

pub use point::{GeoPoint, NearbyPoint, ReferenceLocation};
