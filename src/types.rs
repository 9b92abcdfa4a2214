//! Core types for the proxtrace pipeline
//!
//! This module defines the data that flows through each stage: raw scan
//! snapshots, normalized readings, closeness scores, beacon sightings, and
//! answer events. Everything here is scoped to a single wearer and a single
//! batch run; nothing persists across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Identifier of a wearer (one wearer per subdirectory of the data root).
pub type WearerId = String;

/// Sentinel answer value marking a question that was posed but never
/// answered. Events carrying it are excluded from correlation.
pub const ASKED_SENTINEL: &str = "ASKED";

/// One scan snapshot: every device detected in a single scan pass, with the
/// raw signal strength reported by the instrument. A device address appears
/// at most once per reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityReading {
    /// When the scan pass completed (UTC)
    pub timestamp: DateTime<Utc>,
    /// Device address -> raw signal strength (native scale, larger
    /// magnitude = weaker signal, ceiling 128)
    pub detections: HashMap<String, i32>,
}

/// A scan snapshot after signal normalization. Same shape as
/// [`ProximityReading`] but detection values are in closeness units
/// (higher = closer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedReading {
    pub timestamp: DateTime<Utc>,
    /// Device address -> closeness
    pub detections: HashMap<String, i32>,
}

/// Cumulative closeness metrics for one (wearer, tracked device) pair.
///
/// Built up by the aggregation fold and read-only afterwards. Devices that
/// were never detected have no score at all rather than a zero-valued one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosenessScore {
    /// Resolved device identity (canonical name, or address when unmapped)
    pub device: String,
    /// Sum of closeness over every detection of this device
    pub total_score: i64,
    /// Number of readings in which this device appeared
    pub time_in_range: u32,
}

/// A single discrete sighting of an allow-listed beacon.
///
/// Sightings are kept discrete rather than merged into a first/last
/// interval, so separate visits to the same beacon stay distinct and are
/// matched independently by the correlator's time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconSighting {
    /// Resolved beacon identity
    pub beacon: String,
    pub timestamp: DateTime<Utc>,
    /// Closeness at the moment of the sighting
    pub closeness: i32,
}

/// One question/answer event from the wearer's prompt log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub timestamp: DateTime<Utc>,
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
}

impl AnswerEvent {
    /// True when this event records a prompt rather than a response.
    pub fn is_asked(&self) -> bool {
        self.answer == ASKED_SENTINEL
    }
}

/// One row of the device-naming log maintained by the live scanner process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceNameRow {
    pub timestamp: DateTime<Utc>,
    /// Advertised device name; may carry the canonical identity in a
    /// trailing parenthesized suffix, e.g. `Galaxy Watch4 (Alice)`
    pub name: String,
    pub address: String,
}

/// The two per-wearer output maps. `BTreeMap` keeps export order stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WearerResults {
    /// Tracked device identity -> closeness score
    pub scores: BTreeMap<String, ClosenessScore>,
    /// Beacon identity -> answers given within range of that beacon,
    /// in original event order
    pub correlations: BTreeMap<String, Vec<AnswerEvent>>,
}
