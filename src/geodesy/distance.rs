use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

/// IUGG mean Earth radius
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0088;

/// Formula used to measure distances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMethod {
    /// Mean-sphere haversine. Within ~0.3% of the ellipsoidal distance.
    #[default]
    Haversine,
    /// WGS-84 ellipsoid (Karney)
    Geodesic,
}

impl DistanceMethod {
    pub fn distance_km(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        match self {
            DistanceMethod::Haversine => haversine_km(lat1, lon1, lat2, lon2),
            DistanceMethod::Geodesic => geodesic_km(lat1, lon1, lat2, lon2),
        }
    }
}

impl std::fmt::Display for DistanceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMethod::Haversine => write!(f, "haversine"),
            DistanceMethod::Geodesic => write!(f, "geodesic"),
        }
    }
}

impl std::str::FromStr for DistanceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "haversine" => Ok(DistanceMethod::Haversine),
            "geodesic" => Ok(DistanceMethod::Geodesic),
            other => Err(format!(
                "unknown distance method '{}' (expected haversine or geodesic)",
                other
            )),
        }
    }
}

/// Distance in kilometers using the default method
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    DistanceMethod::default().distance_km(lat1, lon1, lat2, lon2)
}

/// Clamp latitude to [-90, 90] and wrap longitude into [-180, 180).
fn normalize(lat: f64, lon: f64) -> (f64, f64) {
    let lat = lat.clamp(-90.0, 90.0);
    let lon = if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    };
    (lat, lon)
}

/// Haversine distance on a sphere of radius [`EARTH_MEAN_RADIUS_KM`].
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1) = normalize(lat1, lon1);
    let (lat2, lon2) = normalize(lat2, lon2);

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_MEAN_RADIUS_KM * c
}

/// Ellipsoidal (WGS-84) distance.
pub fn geodesic_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1) = normalize(lat1, lon1);
    let (lat2, lon2) = normalize(lat2, lon2);

    let p1 = Point::new(lon1, lat1);
    let p2 = Point::new(lon2, lat2);
    Geodesic.distance(p1, p2) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMP: (f64, f64) = (56.7119, 36.7614);

    #[test]
    fn test_zero_for_identical() {
        for &(lat, lon) in &[CAMP, (0.0, 0.0), (90.0, 0.0), (-90.0, 180.0), (-33.9, 151.2)] {
            assert_eq!(haversine_km(lat, lon, lat, lon), 0.0);
            assert!(geodesic_km(lat, lon, lat, lon).abs() < 1e-9);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (CAMP, (55.0, 37.0)),
            ((48.573174, 2.319671), (48.566757, 2.303015)),
            ((89.9999, 10.0), (-89.9999, -170.0)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let ab = haversine_km(lat1, lon1, lat2, lon2);
            let ba = haversine_km(lat2, lon2, lat1, lon1);
            assert!((ab - ba).abs() < 1e-9, "{} != {}", ab, ba);

            let ab = geodesic_km(lat1, lon1, lat2, lon2);
            let ba = geodesic_km(lat2, lon2, lat1, lon1);
            assert!((ab - ba).abs() < 1e-6, "{} != {}", ab, ba);
        }
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_MEAN_RADIUS_KM).abs() < 1e-6);

        let d = haversine_km(90.0, 0.0, -90.0, 0.0);
        assert!((d - std::f64::consts::PI * EARTH_MEAN_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_dateline_crossing_is_short() {
        let d = haversine_km(0.0, 179.9, 0.0, -179.9);
        assert!(d < 25.0, "got {}", d);
    }

    #[test]
    fn test_known_distances() {
        // camp to (55, 37): roughly 190 km
        let d = haversine_km(CAMP.0, CAMP.1, 55.0, 37.0);
        assert!((185.0..195.0).contains(&d), "got {}", d);

        let d = geodesic_km(CAMP.0, CAMP.1, 55.0, 37.0);
        assert!((185.0..195.0).contains(&d), "got {}", d);

        // nearby sample point is about 100 m away
        let d = haversine_km(CAMP.0, CAMP.1, 56.7110, 36.7615);
        assert!(d < 0.2, "got {}", d);
    }

    #[test]
    fn test_methods_agree_within_half_percent() {
        let h = haversine_km(CAMP.0, CAMP.1, 55.0, 37.0);
        let g = geodesic_km(CAMP.0, CAMP.1, 55.0, 37.0);
        assert!(((h - g) / g).abs() < 0.005);
    }

    #[test]
    fn test_out_of_range_is_normalized() {
        // latitude clamps to the pole, longitude wraps
        assert_eq!(haversine_km(95.0, 10.0, 90.0, 10.0), 0.0);
        let wrapped = haversine_km(10.0, 370.0, 10.0, 10.0);
        assert!(wrapped.abs() < 1e-9, "got {}", wrapped);
        assert!(geodesic_km(-120.0, -540.0, 0.0, 0.0).is_finite());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("haversine".parse::<DistanceMethod>(), Ok(DistanceMethod::Haversine));
        assert_eq!("Geodesic".parse::<DistanceMethod>(), Ok(DistanceMethod::Geodesic));
        assert!("vincenty".parse::<DistanceMethod>().is_err());
        assert_eq!(DistanceMethod::Geodesic.to_string(), "geodesic");
    }
}
