//! Geocoding backends: ArcGIS World geocoder and OSM Nominatim.
//!
//! ArcGIS sits first in the chain — its coverage of Indian village and
//! Hindi-script place names is noticeably better than Nominatim's. The engine
//! treats the chain as opaque: each backend answers one query with an optional
//! point or a typed error, nothing more.

use super::types::{GeoPoint, ProviderError};
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "migramap/0.3 (village-address-mapper)";

/// One geocoding backend. A query either yields a point, yields nothing, or
/// fails with a provider error — the caller decides what failure means.
pub trait Geocoder {
    fn name(&self) -> &'static str;
    fn geocode(&self, query: &str, timeout: Duration) -> Result<Option<GeoPoint>, ProviderError>;
}

/// The default chain in priority order: ArcGIS, then Nominatim.
pub fn default_chain() -> Vec<Box<dyn Geocoder>> {
    vec![Box::new(ArcGis), Box::new(Nominatim)]
}

// ─── ArcGIS World geocoder ──────────────────────────────────────

pub struct ArcGis;

#[derive(Deserialize)]
struct ArcGisResponse {
    #[serde(default)]
    candidates: Vec<ArcGisCandidate>,
}

#[derive(Deserialize)]
struct ArcGisCandidate {
    location: ArcGisLocation,
}

#[derive(Deserialize)]
struct ArcGisLocation {
    x: f64, // longitude
    y: f64, // latitude
}

impl Geocoder for ArcGis {
    fn name(&self) -> &'static str {
        "arcgis"
    }

    fn geocode(&self, query: &str, timeout: Duration) -> Result<Option<GeoPoint>, ProviderError> {
        let url = format!(
            "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates?f=json&maxLocations=1&outFields=none&singleLine={}",
            urlencod(query),
        );

        let response = ureq::get(&url)
            .set("User-Agent", USER_AGENT)
            .timeout(timeout)
            .call()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let parsed: ArcGisResponse = response
            .into_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(parsed.candidates.first().map(|c| GeoPoint {
            lat: c.location.y,
            lon: c.location.x,
        }))
    }
}

// ─── OSM Nominatim ──────────────────────────────────────────────

pub struct Nominatim;

#[derive(Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

impl Geocoder for Nominatim {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn geocode(&self, query: &str, timeout: Duration) -> Result<Option<GeoPoint>, ProviderError> {
        let url = format!(
            "https://nominatim.openstreetmap.org/search?q={}&format=json&limit=1&addressdetails=0",
            urlencod(query),
        );

        let response = ureq::get(&url)
            .set("User-Agent", USER_AGENT)
            .timeout(timeout)
            .call()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let Some(first) = results.first() else {
            return Ok(None);
        };

        let lat: f64 = first
            .lat
            .parse()
            .map_err(|_| ProviderError::InvalidResponse(format!("bad latitude '{}'", first.lat)))?;
        let lon: f64 = first
            .lon
            .parse()
            .map_err(|_| ProviderError::InvalidResponse(format!("bad longitude '{}'", first.lon)))?;

        Ok(Some(GeoPoint { lat, lon }))
    }
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn urlencod(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b' ' => "%20".to_string(),
            b'&' => "%26".to_string(),
            b'=' => "%3D".to_string(),
            b'+' => "%2B".to_string(),
            b',' => "%2C".to_string(),
            _ if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
