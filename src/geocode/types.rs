//! Core types for the geocoding subsystem.

use serde::Serialize;
use std::fmt;

/// A raw coordinate pair as returned by a provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved coordinate for one address record.
///
/// `approximate` is true only when the point came from the district-level
/// fallback tier; such points carry random jitter of at most ±0.01° per axis
/// so stacked district centroids render as separate markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPoint {
    pub lat: f64,
    pub lon: f64,
    pub approximate: bool,
}

/// Terminal outcome for one address record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Resolved(ResolvedPoint),
    Unresolved,
}

impl Outcome {
    pub fn point(&self) -> Option<ResolvedPoint> {
        match self {
            Self::Resolved(p) => Some(*p),
            Self::Unresolved => None,
        }
    }
}

/// A candidate query string derived from an address record.
/// Rank 0 is the full raw address; higher ranks are coarser.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    pub text: String,
    pub rank: u8,
}

/// Failures from an individual geocoding backend.
///
/// These never escape the resolution engine — a failing provider is
/// equivalent to a provider with no result for that query.
#[derive(Debug)]
pub enum ProviderError {
    Network(String),
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}
