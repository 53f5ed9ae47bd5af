//! Geocoding subsystem for migramap.
//!
//! Turns one raw multi-script address string into a coordinate via candidate
//! queries at decreasing specificity, a prioritized provider chain, and a
//! district-level fallback tier with jittered approximate results.

pub mod engine;
pub mod providers;
pub mod query;
pub mod types;

pub use engine::{ResolveEngine, JITTER_DEGREES};
pub use providers::{default_chain, Geocoder};
pub use query::{candidate_queries, clean_admin_tokens, district_state};
pub use types::{CandidateQuery, GeoPoint, Outcome, ProviderError, ResolvedPoint};
