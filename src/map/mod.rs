//! HTML map rendering.
//!
//! Produces a standalone Leaflet page (library and tiles from public CDNs)
//! with one distinguished marker for the reference location and one marker
//! per point.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::DataError;
use crate::models::{GeoPoint, ReferenceLocation};

const LEAFLET_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_CSS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css";
const AWESOME_MARKERS_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js";
const AWESOME_MARKERS_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css";
const GLYPHICONS_CSS: &str = "https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css";
const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Rendering options
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub title: String,
    pub zoom: u8,
    pub reference_popup: String,
    pub reference_tooltip: String,
    /// Stamped into the page head when set
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            title: "Student Camp".to_string(),
            zoom: 12,
            reference_popup: "Student Camp Location".to_string(),
            reference_tooltip: "Student Camp".to_string(),
            generated_at: None,
        }
    }
}

/// A marker as handed to the page script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub popup: String,
    pub tooltip: String,
    pub color: &'static str,
    pub icon: &'static str,
}

impl Marker {
    pub fn reference(reference: &ReferenceLocation, options: &MapOptions) -> Self {
        Self {
            lat: reference.latitude,
            lon: reference.longitude,
            popup: options.reference_popup.clone(),
            tooltip: options.reference_tooltip.clone(),
            color: "blue",
            icon: "info-sign",
        }
    }

    pub fn point(point: &GeoPoint) -> Self {
        Self {
            lat: point.latitude(),
            lon: point.longitude(),
            popup: point.popup(),
            tooltip: point.tooltip(),
            color: "green",
            icon: "leaf",
        }
    }
}

#[derive(Serialize)]
struct MapData<'a> {
    center: [f64; 2],
    zoom: u8,
    markers: &'a [Marker],
}

/// Mean of the point coordinates, or the reference when there are none.
pub fn map_center(points: &[GeoPoint], reference: &ReferenceLocation) -> [f64; 2] {
    if points.is_empty() {
        return [reference.latitude, reference.longitude];
    }
    let n = points.len() as f64;
    let lat = points.iter().map(GeoPoint::latitude).sum::<f64>() / n;
    let lon = points.iter().map(GeoPoint::longitude).sum::<f64>() / n;
    [lat, lon]
}

/// Reference marker first, then one marker per point in order.
pub fn markers(points: &[GeoPoint], reference: &ReferenceLocation, options: &MapOptions) -> Vec<Marker> {
    std::iter::once(Marker::reference(reference, options))
        .chain(points.iter().map(Marker::point))
        .collect()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON safe to inline in a `<script>` element
fn script_json<T: Serialize>(value: &T) -> Result<String, DataError> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Render the complete HTML document
pub fn render_map(
    points: &[GeoPoint],
    reference: &ReferenceLocation,
    options: &MapOptions,
) -> Result<String, DataError> {
    let markers = markers(points, reference, options);
    let data = script_json(&MapData {
        center: map_center(points, reference),
        zoom: options.zoom,
        markers: &markers,
    })?;

    let generated = options
        .generated_at
        .map(|ts| format!("\n<meta name=\"generated\" content=\"{}\">", ts.to_rfc3339()))
        .unwrap_or_default();

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">{generated}
<title>{title}</title>
<link rel="stylesheet" href="{leaflet_css}">
<link rel="stylesheet" href="{glyphicons_css}">
<link rel="stylesheet" href="{awesome_css}">
<script src="{leaflet_js}"></script>
<script src="{awesome_js}"></script>
<style>html, body, #map {{ width: 100%; height: 100%; margin: 0; padding: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const data = {data};
const map = L.map("map").setView(data.center, data.zoom);
L.tileLayer("{tile_url}", {{ maxZoom: 19, attribution: '{attribution}' }}).addTo(map);
for (const m of data.markers) {{
  const icon = L.AwesomeMarkers.icon({{ icon: m.icon, markerColor: m.color, prefix: "glyphicon" }});
  L.marker([m.lat, m.lon], {{ icon: icon }})
    .bindPopup(document.createTextNode(m.popup))
    .bindTooltip(document.createTextNode(m.tooltip))
    .addTo(map);
}}
</script>
</body>
</html>
"#,
        generated = generated,
        title = escape_html(&options.title),
        leaflet_css = LEAFLET_CSS,
        glyphicons_css = GLYPHICONS_CSS,
        awesome_css = AWESOME_MARKERS_CSS,
        leaflet_js = LEAFLET_JS,
        awesome_js = AWESOME_MARKERS_JS,
        data = data,
        tile_url = TILE_URL,
        attribution = TILE_ATTRIBUTION,
    ))
}

/// Render and write the map to `path`
pub fn save_map(
    path: &Path,
    points: &[GeoPoint],
    reference: &ReferenceLocation,
    options: &MapOptions,
) -> Result<(), DataError> {
    if points.is_empty() {
        info!("No data to plot on map. Map will center on the reference point.");
    }
    let html = render_map(points, reference, options)?;
    std::fs::write(path, html)?;
    info!("Map saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64, desc: Option<&str>) -> GeoPoint {
        GeoPoint::new(lat, lon, desc.map(String::from)).unwrap()
    }

    #[test]
    fn test_center_on_reference_when_empty() {
        let camp = ReferenceLocation::CAMP;
        assert_eq!(map_center(&[], &camp), [56.7119, 36.7614]);
    }

    #[test]
    fn test_center_is_mean_of_points() {
        let points = [pt(10.0, 20.0, None), pt(20.0, 40.0, None)];
        assert_eq!(map_center(&points, &ReferenceLocation::CAMP), [15.0, 30.0]);
    }

    #[test]
    fn test_reference_marker_always_first() {
        let options = MapOptions::default();
        let only = markers(&[], &ReferenceLocation::CAMP, &options);
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].popup, "Student Camp Location");
        assert_eq!(only[0].tooltip, "Student Camp");
        assert_eq!(only[0].color, "blue");

        let points = [pt(56.711, 36.7615, Some("Point 1 (In)")), pt(56.712, 36.76, None)];
        let all = markers(&points, &ReferenceLocation::CAMP, &options);
        assert_eq!(all.len(), points.len() + 1);
        assert_eq!(all[1].popup, "Point 1 (In)");
        assert_eq!(all[1].icon, "leaf");
        assert_eq!(all[2].popup, "Geodetic Point");
        assert_eq!(all[2].tooltip, "Lat: 56.712, Lon: 36.76");
    }

    #[test]
    fn test_render_contains_markers_and_view() {
        let points = [pt(56.711, 36.7615, Some("Point A"))];
        let html = render_map(&points, &ReferenceLocation::CAMP, &MapOptions::default()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("\"zoom\":12"));
        assert!(html.contains("\"popup\":\"Student Camp Location\""));
        assert!(html.contains("\"popup\":\"Point A\""));
        assert!(html.contains("<title>Student Camp</title>"));
        assert!(!html.contains("name=\"generated\""));
    }

    #[test]
    fn test_render_escapes_script_breakout() {
        let points = [pt(56.711, 36.7615, Some("</script><b>x</b> & y"))];
        let options = MapOptions {
            title: "<Camp>".to_string(),
            ..MapOptions::default()
        };
        let html = render_map(&points, &ReferenceLocation::CAMP, &options).unwrap();
        assert_eq!(html.matches("</script>").count(), 3);
        assert!(html.contains("\\u003c/script\\u003e"));
        assert!(html.contains("<title>&lt;Camp&gt;</title>"));
    }

    #[test]
    fn test_generated_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let options = MapOptions {
            generated_at: Some(ts),
            ..MapOptions::default()
        };
        let html = render_map(&[], &ReferenceLocation::CAMP, &options).unwrap();
        assert!(html.contains("content=\"2024-06-01T12:00:00+00:00\""));
    }

    #[test]
    fn test_save_map_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camp_map.html");
        save_map(&path, &[], &ReferenceLocation::CAMP, &MapOptions::default()).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Student Camp Location"));
    }
}
