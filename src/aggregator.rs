//! Closeness aggregation
//!
//! Folds a wearer's normalized reading sequence into one cumulative
//! [`ClosenessScore`] per tracked device. The fold's merge is commutative
//! and associative per device, so reading order never affects the result.

use crate::identity::{canonical_key, IdentityResolver};
use crate::types::{ClosenessScore, NormalizedReading};
use std::collections::{BTreeMap, HashSet};

/// Aggregator configured with the tracked-device allow-list.
///
/// Detections resolving to identities outside the allow-list contribute to
/// no score and raise no error.
#[derive(Debug, Clone)]
pub struct ClosenessAggregator {
    tracked: HashSet<String>,
}

impl ClosenessAggregator {
    /// Create an aggregator for the given tracked identities. Entries that
    /// look like radio addresses are canonicalized for comparison.
    pub fn new<I, S>(tracked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tracked: tracked
                .into_iter()
                .map(|id| canonical_key(id.as_ref()))
                .collect(),
        }
    }

    /// Fold the full reading sequence into per-identity scores.
    ///
    /// Create-if-absent, else accumulate: the first detection of an identity
    /// seeds its score with that detection's closeness and a count of one;
    /// every later detection adds closeness and increments the count.
    pub fn aggregate(
        &self,
        readings: &[NormalizedReading],
        resolver: &IdentityResolver,
    ) -> BTreeMap<String, ClosenessScore> {
        let mut scores: BTreeMap<String, ClosenessScore> = BTreeMap::new();

        for reading in readings {
            for (address, &closeness) in &reading.detections {
                let identity = resolver.resolve(address);
                if !self.tracked.contains(identity) {
                    continue;
                }

                let entry = scores
                    .entry(identity.to_string())
                    .or_insert_with(|| ClosenessScore {
                        device: identity.to_string(),
                        total_score: 0,
                        time_in_range: 0,
                    });
                entry.total_score += i64::from(closeness);
                entry.time_in_range += 1;
            }
        }

        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::SignalNormalizer;
    use crate::types::ProximityReading;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const DEV_A: &str = "AA:00:00:00:00:0A";
    const DEV_B: &str = "AA:00:00:00:00:0B";
    const DEV_C: &str = "AA:00:00:00:00:0C";

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn reading(seconds: i64, detections: &[(&str, i32)]) -> NormalizedReading {
        let raw = ProximityReading {
            timestamp: ts(seconds),
            detections: detections
                .iter()
                .map(|&(addr, strength)| (addr.to_string(), strength))
                .collect(),
        };
        SignalNormalizer::normalize(&raw)
    }

    #[test]
    fn accumulates_score_and_time_in_range() {
        // 128-10=118, 128-20=108; A accumulates 118+118=236
        let readings = vec![
            reading(0, &[(DEV_A, 10), (DEV_B, 20)]),
            reading(1, &[(DEV_A, 10)]),
        ];
        let aggregator = ClosenessAggregator::new([DEV_A, DEV_B]);
        let scores = aggregator.aggregate(&readings, &IdentityResolver::empty());

        assert_eq!(
            scores[DEV_A],
            ClosenessScore {
                device: DEV_A.to_string(),
                total_score: 236,
                time_in_range: 2,
            }
        );
        assert_eq!(
            scores[DEV_B],
            ClosenessScore {
                device: DEV_B.to_string(),
                total_score: 108,
                time_in_range: 1,
            }
        );
    }

    #[test]
    fn result_is_order_independent() {
        let forward = vec![
            reading(0, &[(DEV_A, 10), (DEV_B, 20)]),
            reading(1, &[(DEV_A, 30)]),
            reading(2, &[(DEV_B, 5)]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let aggregator = ClosenessAggregator::new([DEV_A, DEV_B]);
        let resolver = IdentityResolver::empty();
        assert_eq!(
            aggregator.aggregate(&forward, &resolver),
            aggregator.aggregate(&reversed, &resolver)
        );
    }

    #[test]
    fn non_tracked_devices_yield_no_scores() {
        let readings = vec![reading(0, &[(DEV_C, 10)])];
        let aggregator = ClosenessAggregator::new([DEV_A, DEV_B]);
        let scores = aggregator.aggregate(&readings, &IdentityResolver::empty());
        assert!(scores.is_empty());
    }

    #[test]
    fn time_in_range_counts_readings_not_strength() {
        let readings = vec![
            reading(0, &[(DEV_A, 5)]),
            reading(1, &[(DEV_A, 120)]),
            reading(2, &[(DEV_A, 60)]),
        ];
        let aggregator = ClosenessAggregator::new([DEV_A]);
        let scores = aggregator.aggregate(&readings, &IdentityResolver::empty());
        assert_eq!(scores[DEV_A].time_in_range, 3);
    }

    #[test]
    fn allow_list_matches_case_insensitive_addresses() {
        let readings = vec![reading(0, &[(DEV_A, 10)])];
        // Lower-case allow-list entry still matches the uppercase address
        let aggregator = ClosenessAggregator::new(["aa:00:00:00:00:0a"]);
        let scores = aggregator.aggregate(&readings, &IdentityResolver::empty());
        assert_eq!(scores[DEV_A].time_in_range, 1);
    }

    #[test]
    fn rotated_addresses_fold_into_one_identity() {
        let mut resolver = IdentityResolver::empty();
        resolver.insert(DEV_A, "Alice");
        resolver.insert(DEV_B, "Alice");

        let readings = vec![
            reading(0, &[(DEV_A, 10)]),
            reading(1, &[(DEV_B, 20)]),
        ];
        let aggregator = ClosenessAggregator::new(["Alice"]);
        let scores = aggregator.aggregate(&readings, &resolver);

        assert_eq!(scores.len(), 1);
        assert_eq!(scores["Alice"].total_score, 226);
        assert_eq!(scores["Alice"].time_in_range, 2);
    }
}
