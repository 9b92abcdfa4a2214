//! Proxtrace - Offline correlation engine for wearable proximity logs
//!
//! Proxtrace turns raw proximity-scan logs (periodic snapshots of nearby
//! short-range-radio devices and their signal strength) plus a stream of
//! timestamped question/answer events into two result tables, through a
//! deterministic batch pipeline:
//! ingestion → normalization → {closeness aggregation, beacon sighting
//! extraction} → answer correlation → export.
//!
//! ## Outputs
//!
//! - **Closeness scores**: per wearer and tracked device, cumulative
//!   normalized signal strength plus a time-in-range count
//! - **Beacon answers**: per wearer and beacon, the answer events given
//!   while the wearer was within the beacon's visit window

pub mod aggregator;
pub mod config;
pub mod correlator;
pub mod error;
pub mod export;
pub mod identity;
pub mod ingest;
pub mod normalizer;
pub mod pipeline;
pub mod types;
pub mod visits;

pub use aggregator::ClosenessAggregator;
pub use config::EngineConfig;
pub use correlator::{EventCorrelator, DEFAULT_VISIT_WINDOW_SECS};
pub use error::EngineError;
pub use identity::IdentityResolver;
pub use normalizer::{SignalNormalizer, SIGNAL_CEILING};
pub use pipeline::{BatchResults, CorrelationEngine};
pub use types::{
    AnswerEvent, BeaconSighting, ClosenessScore, DeviceNameRow, NormalizedReading,
    ProximityReading, WearerId, WearerResults, ASKED_SENTINEL,
};
pub use visits::BeaconVisitExtractor;

/// Proxtrace version, reported by the CLI
pub const PROXTRACE_VERSION: &str = env!("CARGO_PKG_VERSION");
