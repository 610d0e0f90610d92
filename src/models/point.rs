//! Geographic points read from the input dataset and the reference they are measured against.

use serde::Deserialize;

use crate::error::DataError;

/// Check that a latitude/longitude pair is finite and within WGS-84 bounds.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), DataError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(DataError::LatitudeOutOfRange(latitude));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(DataError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

/// Geographic point (lat/lon) with an optional label
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
    description: Option<String>,
}

impl GeoPoint {
    /// Create a validated point. Coordinates outside [-90, 90] / [-180, 180] are rejected.
    pub fn new(latitude: f64, longitude: f64, description: Option<String>) -> Result<Self, DataError> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
            description: description.filter(|d| !d.is_empty()),
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Label shown in the map popup
    pub fn popup(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| "Geodetic Point".to_string())
    }

    /// Label shown on marker hover
    pub fn tooltip(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("Lat: {}, Lon: {}", self.latitude, self.longitude))
    }
}

/// Fixed coordinate every distance is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ReferenceLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl ReferenceLocation {
    /// Student camp, Konakovo, Tverskaya Oblast'
    pub const CAMP: ReferenceLocation = ReferenceLocation {
        latitude: 56.7119,
        longitude: 36.7614,
    };

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DataError> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl Default for ReferenceLocation {
    fn default() -> Self {
        Self::CAMP
    }
}

impl std::fmt::Display for ReferenceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A retained point together with its distance to the reference
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPoint {
    pub point: GeoPoint,
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0, None).is_err());
        assert!(GeoPoint::new(0.0, -180.5, None).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0, None).is_err());
        assert!(GeoPoint::new(90.0, 180.0, None).is_ok());
    }

    #[test]
    fn test_empty_description_is_none() {
        let p = GeoPoint::new(56.711, 36.7615, Some(String::new())).unwrap();
        assert_eq!(p.description(), None);
        assert_eq!(p.popup(), "Geodetic Point");
        assert_eq!(p.tooltip(), "Lat: 56.711, Lon: 36.7615");
    }

    #[test]
    fn test_labels_use_description() {
        let p = GeoPoint::new(56.711, 36.7615, Some("Point A".into())).unwrap();
        assert_eq!(p.popup(), "Point A");
        assert_eq!(p.tooltip(), "Point A");
    }

    #[test]
    fn test_reference_default_is_camp() {
        let r = ReferenceLocation::default();
        assert_eq!(r.latitude, 56.7119);
        assert_eq!(r.longitude, 36.7614);
        assert_eq!(r.to_string(), "(56.7119, 36.7614)");
    }
}
