//! Presentation adapter: resolved records become map markers, markers become
//! a self-contained Leaflet HTML page.
//!
//! Marker classes follow the reporting convention: red star = origin village,
//! blue marker = any other exact resolution, orange = approximate (district
//! fallback), annotated in the popup.

use crate::geocode::ResolvedPoint;
use crate::ingest::AddressRecord;
use serde::Serialize;

/// Default viewport when nothing resolves: centered on India.
const DEFAULT_CENTER: (f64, f64) = (20.5937, 78.9629);
const DEFAULT_ZOOM: u8 = 5;

/// One map marker, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub color: &'static str,
    pub icon: &'static str,
    pub tooltip: String,
    pub popup_html: String,
}

/// Build the marker for one resolved record.
pub fn marker_for(record: &AddressRecord, point: ResolvedPoint) -> Marker {
    let color = if point.approximate {
        "orange"
    } else if record.is_origin() {
        "red"
    } else {
        "blue"
    };
    let icon = if record.is_origin() { "star" } else { "map-marker" };

    let warning = if point.approximate {
        "<br><b style=\"color:orange\">(Approximate Location)</b>"
    } else {
        ""
    };
    let popup_html = format!(
        "<div style=\"width: 200px\">\
         <h4 style=\"margin-bottom: 5px; color: {color}\">{village}</h4>\
         <b>Families:</b> {families}<br>\
         <b>Type:</b> {kind}{warning}\
         </div>",
        color = color,
        village = escape_html(&record.village),
        families = format_families(record.families),
        kind = escape_html(record.kind.trim()),
        warning = warning,
    );

    Marker {
        lat: point.lat,
        lon: point.lon,
        color,
        icon,
        tooltip: record.display_label().to_string(),
        popup_html,
    }
}

/// Bounding viewport over all resolved points: ((south, west), (north, east)).
pub fn bounds(points: &[(f64, f64)]) -> Option<((f64, f64), (f64, f64))> {
    let first = points.first()?;
    let mut south = first.0;
    let mut north = first.0;
    let mut west = first.1;
    let mut east = first.1;
    for &(lat, lon) in &points[1..] {
        south = south.min(lat);
        north = north.max(lat);
        west = west.min(lon);
        east = east.max(lon);
    }
    Some(((south, west), (north, east)))
}

/// Render a complete Leaflet page. Markers use the awesome-markers plugin so
/// the color and icon classes map straight onto FontAwesome pins.
pub fn render_map(markers: &[Marker], points: &[(f64, f64)]) -> String {
    // Marker data goes in as JSON; serialization of these plain fields
    // cannot fail.
    let marker_json = serde_json::to_string(markers).unwrap_or_else(|_| "[]".to_string());

    let view_script = match bounds(points) {
        Some(((south, west), (north, east))) => format!(
            "map.fitBounds([[{}, {}], [{}, {}]]);",
            south, west, north, east
        ),
        None => format!(
            "map.setView([{}, {}], {});",
            DEFAULT_CENTER.0, DEFAULT_CENTER.1, DEFAULT_ZOOM
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>migramap</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.min.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map');
L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
var markers = {marker_json};
markers.forEach(function (m) {{
  L.marker([m.lat, m.lon], {{
    icon: L.AwesomeMarkers.icon({{ icon: m.icon, markerColor: m.color, prefix: 'fa' }})
  }}).bindTooltip(m.tooltip).bindPopup(m.popup_html, {{ maxWidth: 300 }}).addTo(map);
}});
{view_script}
</script>
</body>
</html>
"#,
        marker_json = marker_json,
        view_script = view_script,
    )
}

fn format_families(families: f64) -> String {
    if families.fract() == 0.0 && families.abs() < 1e15 {
        format!("{}", families as i64)
    } else {
        format!("{}", families)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
