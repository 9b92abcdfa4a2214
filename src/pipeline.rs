//! Pipeline orchestration
//!
//! Wires the stages together: ingestion -> normalization -> {aggregation,
//! beacon extraction} -> correlation. `CorrelationEngine::process_wearer`
//! is the pure per-wearer pass; `run_batch` drives a full filesystem run
//! over every wearer directory under the data root.

use crate::aggregator::ClosenessAggregator;
use crate::config::EngineConfig;
use crate::correlator::EventCorrelator;
use crate::error::EngineError;
use crate::identity::IdentityResolver;
use crate::ingest;
use crate::normalizer::SignalNormalizer;
use crate::types::{AnswerEvent, ClosenessScore, ProximityReading, WearerId, WearerResults};
use crate::visits::BeaconVisitExtractor;
use log::{debug, info};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Results of one whole batch run, keyed by wearer id.
#[derive(Debug, Clone)]
pub struct BatchResults {
    /// Identifier of this run, for log correlation
    pub run_id: Uuid,
    pub closeness: BTreeMap<WearerId, BTreeMap<String, ClosenessScore>>,
    pub beacon_answers: BTreeMap<WearerId, BTreeMap<String, Vec<AnswerEvent>>>,
}

/// The correlation engine for one configuration.
///
/// Wearers are independent units of work; the engine processes them
/// sequentially in one linear pass each, with no state shared between them.
pub struct CorrelationEngine {
    config: EngineConfig,
    aggregator: ClosenessAggregator,
    extractor: BeaconVisitExtractor,
    correlator: EventCorrelator,
}

impl CorrelationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let aggregator = ClosenessAggregator::new(&config.tracked_devices);
        let extractor = BeaconVisitExtractor::new(&config.beacons);
        let correlator = EventCorrelator::new(config.visit_window_secs);
        Self {
            config,
            aggregator,
            extractor,
            correlator,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the per-wearer pass over in-memory inputs.
    ///
    /// The answer events go into correlation unmodified; only the readings
    /// pass through normalization.
    pub fn process_wearer(
        &self,
        readings: &[ProximityReading],
        answers: &[AnswerEvent],
        resolver: &IdentityResolver,
    ) -> WearerResults {
        let normalized = SignalNormalizer::normalize_all(readings);

        let scores = self.aggregator.aggregate(&normalized, resolver);
        let sightings = self.extractor.extract(&normalized, resolver);
        let correlations = self.correlator.correlate(&sightings, answers);

        WearerResults {
            scores,
            correlations,
        }
    }

    /// Run the full batch: discover wearers under the data root, ingest
    /// their logs, process each one, and collect both result maps.
    ///
    /// Recoverable conditions (malformed rows, wearers with no logs,
    /// unmapped addresses) are skipped over; filesystem failures abort the
    /// whole run before any output is written.
    pub fn run_batch(&self) -> Result<BatchResults, EngineError> {
        let run_id = Uuid::new_v4();
        info!(
            "starting correlation run {run_id} over {}",
            self.config.data_dir.display()
        );

        let resolver = match &self.config.device_name_log {
            Some(path) if path.is_file() => {
                let rows = ingest::read_device_name_log(path)?;
                let resolver = IdentityResolver::from_rows(&rows);
                debug!("identity resolver holds {} mappings", resolver.len());
                resolver
            }
            _ => IdentityResolver::empty(),
        };

        let mut closeness = BTreeMap::new();
        let mut beacon_answers = BTreeMap::new();

        for wearer in ingest::wearer_ids(&self.config.data_dir)? {
            info!("processing wearer {wearer}");
            let wearer_dir = self.config.data_dir.join(&wearer);

            let readings =
                ingest::load_detection_logs(&wearer_dir, &self.config.detection_file_pattern)?;
            let answers =
                ingest::load_answer_logs(&wearer_dir, &self.config.answer_file_pattern)?;
            debug!(
                "wearer {wearer}: {} readings, {} answer events",
                readings.len(),
                answers.len()
            );

            let results = self.process_wearer(&readings, &answers, &resolver);
            closeness.insert(wearer.clone(), results.scores);
            beacon_answers.insert(wearer, results.correlations);
        }

        info!("run {run_id} processed {} wearers", closeness.len());
        Ok(BatchResults {
            run_id,
            closeness,
            beacon_answers,
        })
    }
}
