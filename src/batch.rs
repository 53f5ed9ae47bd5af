//! Batch coordinator: drives the resolution engine over a record set.
//!
//! Records are processed strictly in input order, one at a time, with a fixed
//! inter-record delay to stay inside provider rate limits. A single bad record
//! never aborts the batch — panics are caught at this boundary and recorded
//! alongside ordinary resolution failures.

use crate::geocode::{Outcome, ResolveEngine};
use crate::ingest::AddressRecord;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Aggregate counters for one batch run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchStats {
    /// Exact resolutions.
    pub success: usize,
    /// Approximate (district-fallback) resolutions.
    pub partial: usize,
    /// Village names of unresolved records and descriptions of unexpected
    /// per-record errors, in input order.
    pub failed_list: Vec<String>,
}

impl BatchStats {
    pub fn failed(&self) -> usize {
        self.failed_list.len()
    }

    /// success + partial + failed always equals the batch size.
    pub fn total(&self) -> usize {
        self.success + self.partial + self.failed_list.len()
    }
}

/// Result of a batch run. `outcomes[i]` belongs to `records[i]`.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
    pub stats: BatchStats,
}

/// Runs the engine over a record slice with rate limiting and isolation.
pub struct BatchRunner {
    engine: ResolveEngine,
    delay: Duration,
}

impl BatchRunner {
    pub fn new(engine: ResolveEngine) -> Self {
        Self {
            engine,
            delay: DEFAULT_DELAY,
        }
    }

    /// Override the inter-record delay (zero in tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn run(&self, records: &[AddressRecord]) -> BatchReport {
        let mut outcomes = Vec::with_capacity(records.len());
        let mut stats = BatchStats::default();

        for (i, record) in records.iter().enumerate() {
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
                self.engine.resolve(&record.full_location)
            }));

            let outcome = match attempt {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let msg = panic_message(payload);
                    eprintln!("  error: row {} ({}): {}", i + 1, record.village, msg);
                    stats
                        .failed_list
                        .push(format!("{}: row error: {}", record.village, msg));
                    outcomes.push(Outcome::Unresolved);
                    thread::sleep(self.delay);
                    continue;
                }
            };

            match outcome {
                Outcome::Resolved(point) if point.approximate => {
                    eprintln!("  ~ {} (approximate)", record.village);
                    stats.partial += 1;
                }
                Outcome::Resolved(_) => {
                    eprintln!("  + {}", record.village);
                    stats.success += 1;
                }
                Outcome::Unresolved => {
                    eprintln!("  - {} (not found)", record.village);
                    stats.failed_list.push(record.village.clone());
                }
            }
            outcomes.push(outcome);

            // Per record, regardless of outcome.
            thread::sleep(self.delay);
        }

        BatchReport { outcomes, stats }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
