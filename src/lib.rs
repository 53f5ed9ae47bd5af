//! migramap — maps multi-script village address lists to coordinates.
//!
//! The core is the geocoding subsystem: candidate queries at decreasing
//! specificity, a prioritized provider chain (ArcGIS, then Nominatim), and a
//! district-level fallback tier whose results are marked approximate and
//! jittered apart. Around it sit CSV ingestion, a rate-limited batch
//! coordinator, a Leaflet map renderer, and a small upload server.

pub mod batch;
pub mod geocode;
pub mod ingest;
pub mod map;
pub mod server;
