//! Answer/beacon correlation
//!
//! Matches each answer event to the beacons that were plausibly in range
//! when the answer was given, using a symmetric time window around each
//! sighting. An answer matches beacon B when some sighting of B lies within
//! the window on either side of the answer's timestamp; the boundary is
//! inclusive at exactly the window width.
//!
//! An answer may match several beacons when their sighting windows overlap.
//! That reflects genuine ambiguity (the wearer near two beacons at once) and
//! is deliberately not deduplicated. Answers matching no beacon, and events
//! recording an unanswered prompt, produce no output at all.

use crate::types::{AnswerEvent, BeaconSighting};
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};

/// Default visit window in seconds.
pub const DEFAULT_VISIT_WINDOW_SECS: u64 = 60;

/// Correlator configured with the visit window.
#[derive(Debug, Clone)]
pub struct EventCorrelator {
    window: Duration,
}

impl Default for EventCorrelator {
    fn default() -> Self {
        Self::new(DEFAULT_VISIT_WINDOW_SECS)
    }
}

impl EventCorrelator {
    pub fn new(window_secs: u64) -> Self {
        Self {
            window: Duration::seconds(window_secs as i64),
        }
    }

    /// Map each beacon to the answers given within its visit window.
    ///
    /// Per beacon, matched answers keep the order in which the answer
    /// events were originally encountered.
    pub fn correlate(
        &self,
        sightings: &[BeaconSighting],
        answers: &[AnswerEvent],
    ) -> BTreeMap<String, Vec<AnswerEvent>> {
        // Index sighting times per beacon once, up front
        let mut sighting_times: HashMap<&str, Vec<DateTime<Utc>>> = HashMap::new();
        for sighting in sightings {
            sighting_times
                .entry(sighting.beacon.as_str())
                .or_default()
                .push(sighting.timestamp);
        }

        let mut correlations: BTreeMap<String, Vec<AnswerEvent>> = BTreeMap::new();

        for answer in answers {
            if answer.is_asked() {
                continue;
            }

            for (beacon, times) in &sighting_times {
                let in_window = times
                    .iter()
                    .any(|&t| self.within_window(answer.timestamp, t));
                if in_window {
                    correlations
                        .entry((*beacon).to_string())
                        .or_default()
                        .push(answer.clone());
                }
            }
        }

        correlations
    }

    fn within_window(&self, answer_at: DateTime<Utc>, sighted_at: DateTime<Utc>) -> bool {
        let delta_ms = answer_at
            .signed_duration_since(sighted_at)
            .num_milliseconds()
            .abs();
        delta_ms <= self.window.num_milliseconds()
    }
}
