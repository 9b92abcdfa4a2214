//! Beacon sighting extraction
//!
//! Pulls every sighting of an allow-listed beacon out of a wearer's
//! normalized readings. Sightings stay discrete (one record per detection)
//! instead of being merged into a first-seen/last-seen interval: merging
//! would treat everything between the first and last sighting as "in range"
//! and silently conflate separate physical visits to the same beacon. The
//! notion of "in range at time T" belongs entirely to the correlator's
//! time-window check.

use crate::identity::{canonical_key, IdentityResolver};
use crate::types::{BeaconSighting, NormalizedReading};
use std::collections::HashSet;

/// Extractor configured with the beacon allow-list.
#[derive(Debug, Clone)]
pub struct BeaconVisitExtractor {
    beacons: HashSet<String>,
}

impl BeaconVisitExtractor {
    /// Create an extractor for the given beacon identities. Entries that
    /// look like radio addresses are canonicalized for comparison.
    pub fn new<I, S>(beacons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            beacons: beacons
                .into_iter()
                .map(|id| canonical_key(id.as_ref()))
                .collect(),
        }
    }

    /// Collect every sighting of an allow-listed beacon, in encounter order.
    /// Sightings of other identities are ignored.
    pub fn extract(
        &self,
        readings: &[NormalizedReading],
        resolver: &IdentityResolver,
    ) -> Vec<BeaconSighting> {
        let mut sightings = Vec::new();

        for reading in readings {
            for (address, &closeness) in &reading.detections {
                let identity = resolver.resolve(address);
                if !self.beacons.contains(identity) {
                    continue;
                }
                sightings.push(BeaconSighting {
                    beacon: identity.to_string(),
                    timestamp: reading.timestamp,
                    closeness,
                });
            }
        }

        sightings
    }
}
