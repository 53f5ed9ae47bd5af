//! Resolution engine — the tiered fallback state machine.
//!
//! Exact tier:    every candidate query × every provider, rank before
//!                provider, first hit wins.
//! Fallback tier: "{district}, {state}" against the primary provider only,
//!                result jittered and marked approximate.
//! Otherwise:     unresolved.

use super::providers::{default_chain, Geocoder};
use super::query::{candidate_queries, district_state};
use super::types::{Outcome, ResolvedPoint};
use rand::Rng;
use std::time::Duration;

/// Maximum jitter applied per axis to an approximate point, in degrees.
/// Visual-separation heuristic only, not a geodesic bound.
pub const JITTER_DEGREES: f64 = 0.01;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives the query strategy against the provider chain for one record.
pub struct ResolveEngine {
    providers: Vec<Box<dyn Geocoder>>,
    timeout: Duration,
}

impl ResolveEngine {
    /// Engine over the default provider chain with the standard 10 s timeout.
    pub fn new() -> Self {
        Self::with_chain(default_chain())
    }

    /// Engine over a specific chain, in priority order (first = primary).
    pub fn with_chain(providers: Vec<Box<dyn Geocoder>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve one raw address string to a terminal outcome.
    ///
    /// The exact tier is evaluated as an explicit prioritized list of
    /// (candidate, provider) attempts so the tie-break order — rank before
    /// provider, first success wins — is a property of the list, not of
    /// nested control flow. Provider errors are logged and treated as
    /// "no result"; they never escape this function.
    pub fn resolve(&self, full_location: &str) -> Outcome {
        let candidates = candidate_queries(full_location);

        let attempts: Vec<(&str, &dyn Geocoder)> = candidates
            .iter()
            .flat_map(|candidate| {
                self.providers
                    .iter()
                    .map(move |provider| (candidate.text.as_str(), provider.as_ref()))
            })
            .collect();

        for (query, provider) in attempts {
            match provider.geocode(query, self.timeout) {
                Ok(Some(point)) => {
                    return Outcome::Resolved(ResolvedPoint {
                        lat: point.lat,
                        lon: point.lon,
                        approximate: false,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    eprintln!("  warn: {} failed for '{}': {}", provider.name(), query, e);
                }
            }
        }

        // Coarse tier: district/state against the primary provider only.
        if let (Some((district, state)), Some(primary)) =
            (district_state(full_location), self.providers.first())
        {
            let coarse = format!("{}, {}", district, state);
            match primary.geocode(&coarse, self.timeout) {
                Ok(Some(point)) => {
                    let mut rng = rand::thread_rng();
                    return Outcome::Resolved(ResolvedPoint {
                        lat: point.lat + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
                        lon: point.lon + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
                        approximate: true,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    eprintln!("  warn: {} failed for '{}': {}", primary.name(), coarse, e);
                }
            }
        }

        Outcome::Unresolved
    }
}

impl Default for ResolveEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::types::{GeoPoint, ProviderError};
    use approx::assert_abs_diff_eq;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<String>>>;

    /// Fake provider: answers queries from a fixed table and records every
    /// call into a log shared with the test.
    struct Fake {
        name: &'static str,
        answers: Vec<(&'static str, GeoPoint)>,
        error_on_everything: bool,
        log: CallLog,
    }

    impl Fake {
        fn empty(name: &'static str) -> Self {
            Self {
                name,
                answers: vec![],
                error_on_everything: false,
                log: Arc::new(Mutex::new(vec![])),
            }
        }

        fn answering(name: &'static str, answers: Vec<(&'static str, GeoPoint)>) -> Self {
            Self {
                answers,
                ..Self::empty(name)
            }
        }

        fn erroring(name: &'static str) -> Self {
            Self {
                error_on_everything: true,
                ..Self::empty(name)
            }
        }

        fn logging_to(mut self, log: &CallLog) -> Self {
            self.log = Arc::clone(log);
            self
        }
    }

    impl Geocoder for Fake {
        fn name(&self) -> &'static str {
            self.name
        }

        fn geocode(
            &self,
            query: &str,
            _timeout: Duration,
        ) -> Result<Option<GeoPoint>, ProviderError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, query));
            if self.error_on_everything {
                return Err(ProviderError::Network("simulated outage".into()));
            }
            Ok(self
                .answers
                .iter()
                .find(|(q, _)| *q == query)
                .map(|(_, p)| *p))
        }
    }

    const FULL: &str = "Rampur, Sitapur District, Uttar Pradesh, India";
    const POINT: GeoPoint = GeoPoint { lat: 27.4, lon: 80.5 };

    #[test]
    fn test_exact_on_rank0() {
        let engine = ResolveEngine::with_chain(vec![Box::new(Fake::answering(
            "primary",
            vec![(FULL, POINT)],
        ))]);
        match engine.resolve(FULL) {
            Outcome::Resolved(p) => {
                assert!(!p.approximate);
                assert_abs_diff_eq!(p.lat, 27.4);
                assert_abs_diff_eq!(p.lon, 80.5);
            }
            Outcome::Unresolved => panic!("expected resolution"),
        }
    }

    #[test]
    fn test_rank_before_provider_order() {
        // Both providers miss everything; the full attempt sequence must be
        // rank 0 on both providers, then rank 1, then rank 2, then the
        // coarse fallback on the primary only.
        let log: CallLog = Arc::new(Mutex::new(vec![]));
        let engine = ResolveEngine::with_chain(vec![
            Box::new(Fake::empty("primary").logging_to(&log)),
            Box::new(Fake::empty("secondary").logging_to(&log)),
        ]);
        assert_eq!(engine.resolve(FULL), Outcome::Unresolved);

        let seen = log.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                format!("primary:{}", FULL),
                format!("secondary:{}", FULL),
                "primary:Rampur, Sitapur, Uttar Pradesh".to_string(),
                "secondary:Rampur, Sitapur, Uttar Pradesh".to_string(),
                "primary:Rampur, Uttar Pradesh".to_string(),
                "secondary:Rampur, Uttar Pradesh".to_string(),
                "primary:Sitapur, Uttar Pradesh".to_string(),
            ]
        );
    }

    #[test]
    fn test_exact_tier_second_provider_wins() {
        let primary = Fake::empty("primary");
        let secondary = Fake::answering("secondary", vec![(FULL, POINT)]);
        let engine = ResolveEngine::with_chain(vec![Box::new(primary), Box::new(secondary)]);
        match engine.resolve(FULL) {
            Outcome::Resolved(p) => assert!(!p.approximate),
            Outcome::Unresolved => panic!("secondary provider should have resolved"),
        }
    }

    #[test]
    fn test_rank1_used_when_rank0_misses() {
        let provider = Fake::answering(
            "primary",
            vec![("Rampur, Sitapur, Uttar Pradesh", POINT)],
        );
        let engine = ResolveEngine::with_chain(vec![Box::new(provider)]);
        match engine.resolve(FULL) {
            Outcome::Resolved(p) => assert!(!p.approximate),
            Outcome::Unresolved => panic!("rank-1 candidate should have resolved"),
        }
    }

    #[test]
    fn test_provider_errors_are_isolated() {
        // Every provider errors on every query: outcome is Unresolved, no
        // panic, no propagated error.
        let engine = ResolveEngine::with_chain(vec![
            Box::new(Fake::erroring("primary")),
            Box::new(Fake::erroring("secondary")),
        ]);
        assert_eq!(engine.resolve(FULL), Outcome::Unresolved);
    }

    #[test]
    fn test_fallback_yields_approximate_with_bounded_jitter() {
        let provider = Fake::answering("primary", vec![("Sitapur, Uttar Pradesh", POINT)]);
        let engine = ResolveEngine::with_chain(vec![Box::new(provider)]);
        match engine.resolve(FULL) {
            Outcome::Resolved(p) => {
                assert!(p.approximate);
                assert_abs_diff_eq!(p.lat, POINT.lat, epsilon = JITTER_DEGREES + 1e-12);
                assert_abs_diff_eq!(p.lon, POINT.lon, epsilon = JITTER_DEGREES + 1e-12);
            }
            Outcome::Unresolved => panic!("fallback tier should have resolved"),
        }
    }

    #[test]
    fn test_fallback_skips_secondary_provider() {
        // The secondary provider knows the coarse query, but the fallback
        // tier only consults the primary — so the record stays unresolved.
        let primary = Fake::empty("primary");
        let secondary = Fake::answering("secondary", vec![("Sitapur, Uttar Pradesh", POINT)]);
        let engine = ResolveEngine::with_chain(vec![Box::new(primary), Box::new(secondary)]);
        assert_eq!(engine.resolve(FULL), Outcome::Unresolved);
    }

    #[test]
    fn test_fallback_skipped_for_short_address() {
        // One comma part: only the rank-0 query exists and there is no
        // district/state to fall back to.
        let provider = Fake::answering("primary", vec![(", ", POINT)]);
        let engine = ResolveEngine::with_chain(vec![Box::new(provider)]);
        assert_eq!(engine.resolve("Unknown Place"), Outcome::Unresolved);
    }

    #[test]
    fn test_unresolved_when_everything_misses() {
        let engine = ResolveEngine::with_chain(vec![
            Box::new(Fake::empty("primary")),
            Box::new(Fake::empty("secondary")),
        ]);
        assert_eq!(engine.resolve(FULL), Outcome::Unresolved);
    }
}
