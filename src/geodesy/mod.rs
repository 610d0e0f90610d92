//! Great-circle distance between geographic coordinates.

mod distance;

pub use distance::{distance_km, geodesic_km, haversine_km, DistanceMethod, EARTH_MEAN_RADIUS_KM};
