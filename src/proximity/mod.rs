//! Proximity filter: keep the points within a radius of a reference location.
//!
//! Both entry points are pure: input order is preserved, nothing is
//! deduplicated or sorted, and each point costs exactly one distance
//! computation.

use tracing::debug;

use crate::error::DataError;
use crate::geodesy::DistanceMethod;
use crate::models::{GeoPoint, NearbyPoint, ReferenceLocation};

/// Distances below this are treated as exactly zero.
pub const DISTANCE_EPSILON_KM: f64 = 1e-9;

/// Default filter threshold
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

fn within(distance_km: f64, radius_km: f64) -> bool {
    let distance_km = if distance_km < DISTANCE_EPSILON_KM {
        0.0
    } else {
        distance_km
    };
    distance_km <= radius_km
}

/// Distance from a point to the reference using the default method
pub fn distance_to(point: &GeoPoint, reference: &ReferenceLocation) -> f64 {
    DistanceMethod::default().distance_km(
        point.latitude(),
        point.longitude(),
        reference.latitude,
        reference.longitude,
    )
}

/// Ordered sub-sequence of `points` within `radius_km` of `reference` (haversine).
///
/// A NaN radius retains nothing; `f64::INFINITY` retains everything.
pub fn filter_by_proximity(
    points: &[GeoPoint],
    reference: &ReferenceLocation,
    radius_km: f64,
) -> Vec<GeoPoint> {
    points
        .iter()
        .filter(|p| within(distance_to(p, reference), radius_km))
        .cloned()
        .collect()
}

/// Configured filter pass: reference, threshold and distance formula.
#[derive(Debug, Clone, Copy)]
pub struct ProximityFilter {
    reference: ReferenceLocation,
    radius_km: f64,
    method: DistanceMethod,
}

impl ProximityFilter {
    pub fn new(reference: ReferenceLocation, radius_km: f64) -> Result<Self, DataError> {
        if radius_km.is_nan() || radius_km < 0.0 {
            return Err(DataError::InvalidRadius(radius_km));
        }
        Ok(Self {
            reference,
            radius_km,
            method: DistanceMethod::default(),
        })
    }

    pub fn with_method(mut self, method: DistanceMethod) -> Self {
        self.method = method;
        self
    }

    pub fn reference(&self) -> &ReferenceLocation {
        &self.reference
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn method(&self) -> DistanceMethod {
        self.method
    }

    /// Distance from `point` to the reference, in kilometers
    pub fn distance(&self, point: &GeoPoint) -> f64 {
        self.method.distance_km(
            point.latitude(),
            point.longitude(),
            self.reference.latitude,
            self.reference.longitude,
        )
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        within(self.distance(point), self.radius_km)
    }

    /// Retained points, in input order
    pub fn filter(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        points
            .iter()
            .filter(|p| self.contains(p))
            .cloned()
            .collect()
    }

    /// Consume the input and keep each retained point with its distance.
    pub fn filter_with_distances<I>(&self, points: I) -> Vec<NearbyPoint>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut total = 0usize;
        let nearby: Vec<NearbyPoint> = points
            .into_iter()
            .inspect(|_| total += 1)
            .filter_map(|point| {
                let distance_km = self.distance(&point);
                within(distance_km, self.radius_km).then_some(NearbyPoint { point, distance_km })
            })
            .collect();

        debug!(
            "Kept {} of {} points within {} km of {} ({})",
            nearby.len(),
            total,
            self.radius_km,
            self.reference,
            self.method
        );
        nearby
    }
}
