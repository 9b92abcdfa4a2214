//! Signal normalization
//!
//! Converts raw per-device signal strength into closeness units where a
//! larger value means a stronger, closer signal. The transform is pure,
//! total, and strictly decreasing in the raw value.

use crate::types::{NormalizedReading, ProximityReading};

/// Fixed ceiling of the instrument's native signal-strength scale. This is
/// a hardware contract, not something the engine validates.
pub const SIGNAL_CEILING: i32 = 128;

/// Normalizer for converting raw readings to closeness readings
pub struct SignalNormalizer;

impl SignalNormalizer {
    /// Convert one raw signal-strength value to closeness.
    ///
    /// Out-of-range inputs pass through the same formula; there is no
    /// clamping or special-casing.
    pub fn closeness(raw: i32) -> i32 {
        SIGNAL_CEILING - raw
    }

    /// Normalize every detection in a reading.
    pub fn normalize(reading: &ProximityReading) -> NormalizedReading {
        NormalizedReading {
            timestamp: reading.timestamp,
            detections: reading
                .detections
                .iter()
                .map(|(address, &raw)| (address.clone(), Self::closeness(raw)))
                .collect(),
        }
    }

    /// Normalize a full reading sequence.
    pub fn normalize_all(readings: &[ProximityReading]) -> Vec<NormalizedReading> {
        readings.iter().map(Self::normalize).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    #[test]
    fn closeness_inverts_signal_strength() {
        assert_eq!(SignalNormalizer::closeness(10), 118);
        assert_eq!(SignalNormalizer::closeness(20), 108);
        assert_eq!(SignalNormalizer::closeness(128), 0);
    }

    #[test]
    fn closeness_is_strictly_decreasing() {
        let raws = [-100, -1, 0, 1, 50, 127, 128, 200];
        for pair in raws.windows(2) {
            assert!(
                SignalNormalizer::closeness(pair[0]) > SignalNormalizer::closeness(pair[1]),
                "closeness({}) must exceed closeness({})",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn out_of_range_values_pass_through() {
        // No clamping below zero or above the ceiling
        assert_eq!(SignalNormalizer::closeness(130), -2);
        assert_eq!(SignalNormalizer::closeness(-10), 138);
    }

    #[test]
    fn normalize_maps_every_detection() {
        let reading = ProximityReading {
            timestamp: Utc.timestamp_millis_opt(1_000).unwrap(),
            detections: HashMap::from([
                ("AA:BB:CC:DD:EE:01".to_string(), 10),
                ("AA:BB:CC:DD:EE:02".to_string(), 20),
            ]),
        };

        let normalized = SignalNormalizer::normalize(&reading);
        assert_eq!(normalized.timestamp, reading.timestamp);
        assert_eq!(normalized.detections["AA:BB:CC:DD:EE:01"], 118);
        assert_eq!(normalized.detections["AA:BB:CC:DD:EE:02"], 108);
    }
}
