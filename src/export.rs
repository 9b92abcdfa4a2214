//! Result export
//!
//! Writes the two result tables. Both files are fully regenerated on each
//! run; callers only invoke these after every wearer has been processed, so
//! a failed run leaves no partial output behind.

use crate::error::EngineError;
use crate::types::{AnswerEvent, ClosenessScore, WearerId};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

/// Write the closeness results table: one row per (wearer, device).
pub fn write_closeness_csv(
    path: &Path,
    results: &BTreeMap<WearerId, BTreeMap<String, ClosenessScore>>,
) -> Result<(), EngineError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["watch_id", "bt_device", "TIR", "RSSI"])?;

    for (wearer, scores) in results {
        for score in scores.values() {
            info!(
                "wearer {wearer}: device {} in range for {} measurements, total closeness {}",
                score.device, score.time_in_range, score.total_score
            );
            let time_in_range = score.time_in_range.to_string();
            let total_score = score.total_score.to_string();
            writer.write_record([
                wearer.as_str(),
                score.device.as_str(),
                time_in_range.as_str(),
                total_score.as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the beacon-answer results table: one row per matched answer.
pub fn write_beacon_answers_csv(
    path: &Path,
    results: &BTreeMap<WearerId, BTreeMap<String, Vec<AnswerEvent>>>,
) -> Result<(), EngineError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["watch_id", "beacon_id", "questionID", "questionText", "answer"])?;

    for (wearer, beacons) in results {
        for (beacon, answers) in beacons {
            for answer in answers {
                info!(
                    "wearer {wearer}: near beacon {beacon} question {} answered with {}",
                    answer.question_id, answer.answer
                );
                writer.write_record([
                    wearer.as_str(),
                    beacon.as_str(),
                    answer.question_id.as_str(),
                    answer.question_text.as_str(),
                    answer.answer.as_str(),
                ])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
