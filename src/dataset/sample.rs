use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use tracing::info;

use crate::error::DataError;
use crate::models::GeoPoint;

const SAMPLE: [(f64, f64, &str); 3] = [
    (56.7110, 36.7615, "Point A (Near Camp)"),
    (56.7130, 36.7600, "Point B (Near Camp)"),
    (56.7150, 36.7590, "Point C (Near Camp)"),
];

#[derive(Serialize)]
struct SampleRow<'a> {
    latitude: f64,
    longitude: f64,
    description: Option<&'a str>,
}

/// Three points near the camp
pub fn sample_points() -> Vec<GeoPoint> {
    SAMPLE
        .iter()
        .filter_map(|&(lat, lon, desc)| GeoPoint::new(lat, lon, Some(desc.to_string())).ok())
        .collect()
}

fn write_rows<W: Write>(writer: W) -> Result<(), DataError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in &sample_points() {
        csv_writer.serialize(SampleRow {
            latitude: point.latitude(),
            longitude: point.longitude(),
            description: point.description(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the sample dataset with header `latitude,longitude,description`.
///
/// Compressed with gzip when the extension is `.gz`, matching what the loader expects.
pub fn write_sample(path: &Path) -> Result<(), DataError> {
    let file = File::create(path)?;
    if path.extension().map_or(false, |e| e == "gz") {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_rows(&mut encoder)?;
        encoder.finish()?;
    } else {
        write_rows(file)?;
    }
    info!("Sample geodetic data file created at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_sample_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        write_sample(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("latitude,longitude,description"));
        assert_eq!(lines.next(), Some("56.711,36.7615,Point A (Near Camp)"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_gz_sample_is_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv.gz");
        write_sample(&path).unwrap();

        let mut text = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert!(text.starts_with("latitude,longitude,description\n"));
        assert!(text.contains("Point C (Near Camp)"));
    }

    #[test]
    fn test_sample_points_are_near_camp() {
        let points = sample_points();
        assert_eq!(points.len(), 3);
        let camp = crate::models::ReferenceLocation::CAMP;
        assert!(points
            .iter()
            .all(|p| crate::proximity::distance_to(p, &camp) < 1.0));
    }
}
