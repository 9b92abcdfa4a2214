//! Log ingestion
//!
//! File discovery and CSV parsing for the three input streams: detection
//! logs, answer logs, and the device-naming log. Rows and tokens that fail
//! to parse are skipped with a log message; only filesystem and CSV-level
//! failures abort the run.

use crate::error::EngineError;
use crate::identity::canonical_key;
use crate::types::{AnswerEvent, DeviceNameRow, ProximityReading, WearerId};
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, trace, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Separator between address and signal strength in a detection token.
const TOKEN_SEPARATOR: &str = "--";

/// List wearer ids: the immediate subdirectories of the data root, sorted.
///
/// A missing or unreadable root is fatal; an empty root simply yields no
/// wearers.
pub fn wearer_ids(root: &Path) -> Result<Vec<WearerId>, EngineError> {
    if !root.is_dir() {
        return Err(EngineError::MissingDataRoot(root.to_path_buf()));
    }

    let mut ids = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    ids.sort();
    Ok(ids)
}

/// Recursively collect `.csv` files under `dir` whose filename contains the
/// given substring, sorted for deterministic processing order.
pub fn find_csv_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, EngineError> {
    let mut files = Vec::new();
    if dir.is_dir() {
        walk_csv_files(dir, pattern, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn walk_csv_files(
    dir: &Path,
    pattern: &str,
    files: &mut Vec<PathBuf>,
) -> Result<(), EngineError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_csv_files(&path, pattern, files)?;
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(".csv") && name.contains(pattern) {
            files.push(path);
        }
    }
    Ok(())
}

/// Parse one detection log.
///
/// Rows are `timestamp_ms, token...` with a header row and a variable
/// number of token columns; each token is `address--rawStrength`. Malformed
/// tokens and rows with unparseable timestamps are skipped.
pub fn read_detection_log(path: &Path) -> Result<Vec<ProximityReading>, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut readings = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();

        let timestamp = match fields.next().and_then(parse_timestamp_ms) {
            Some(ts) => ts,
            None => {
                debug!("skipping detection row with bad timestamp in {}", path.display());
                continue;
            }
        };

        let mut detections = HashMap::new();
        for token in fields {
            match parse_detection_token(token) {
                Some((address, strength)) => {
                    detections.insert(address, strength);
                }
                None if token.trim().is_empty() => {}
                None => trace!("skipping malformed detection token {token:?}"),
            }
        }

        readings.push(ProximityReading {
            timestamp,
            detections,
        });
    }
    Ok(readings)
}

/// Parse and concatenate every detection log for one wearer directory.
pub fn load_detection_logs(
    dir: &Path,
    pattern: &str,
) -> Result<Vec<ProximityReading>, EngineError> {
    let mut readings = Vec::new();
    for path in find_csv_files(dir, pattern)? {
        debug!("reading detection log {}", path.display());
        readings.extend(read_detection_log(&path)?);
    }
    Ok(readings)
}

#[derive(Debug, Deserialize)]
struct RawAnswerRow {
    timestamp: String,
    #[serde(rename = "questionID")]
    question_id: String,
    #[serde(rename = "questionText")]
    question_text: String,
    answer: String,
}

/// Parse one answer log (`timestamp, questionID, questionText, answer` with
/// a header row). Rows that fail to deserialize or carry bad timestamps are
/// skipped with a warning.
pub fn read_answer_log(path: &Path) -> Result<Vec<AnswerEvent>, EngineError> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut events = Vec::new();
    for row in reader.deserialize::<RawAnswerRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping malformed answer row in {}: {e}", path.display());
                continue;
            }
        };
        let timestamp = match parse_timestamp_ms(&row.timestamp) {
            Some(ts) => ts,
            None => {
                warn!("skipping answer row with bad timestamp in {}", path.display());
                continue;
            }
        };
        events.push(AnswerEvent {
            timestamp,
            question_id: row.question_id,
            question_text: row.question_text,
            answer: row.answer,
        });
    }
    Ok(events)
}

/// Parse and concatenate every answer log for one wearer directory.
pub fn load_answer_logs(dir: &Path, pattern: &str) -> Result<Vec<AnswerEvent>, EngineError> {
    let mut events = Vec::new();
    for path in find_csv_files(dir, pattern)? {
        debug!("reading answer log {}", path.display());
        events.extend(read_answer_log(&path)?);
    }
    Ok(events)
}

#[derive(Debug, Deserialize)]
struct RawNameRow {
    timestamp: String,
    name: String,
    address: String,
}

/// Parse the device-naming log (`timestamp, name, address` with a header
/// row) appended by the live scanner process.
pub fn read_device_name_log(path: &Path) -> Result<Vec<DeviceNameRow>, EngineError> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = Vec::new();
    for row in reader.deserialize::<RawNameRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping malformed name row in {}: {e}", path.display());
                continue;
            }
        };
        let timestamp = match parse_timestamp_ms(&row.timestamp) {
            Some(ts) => ts,
            None => {
                warn!("skipping name row with bad timestamp in {}", path.display());
                continue;
            }
        };
        rows.push(DeviceNameRow {
            timestamp,
            name: row.name,
            address: row.address,
        });
    }
    Ok(rows)
}

/// Split an `address--rawStrength` token; the address comes back in
/// canonical (uppercase) form. Tokens that do not split into exactly two
/// parseable parts yield `None`.
fn parse_detection_token(token: &str) -> Option<(String, i32)> {
    let (address, strength) = token.split_once(TOKEN_SEPARATOR)?;
    if address.is_empty() || strength.contains(TOKEN_SEPARATOR) {
        return None;
    }
    let strength: i32 = strength.trim().parse().ok()?;
    Some((canonical_key(address), strength))
}

/// Interpret a field as Unix epoch milliseconds.
fn parse_timestamp_ms(field: &str) -> Option<DateTime<Utc>> {
    let ms: i64 = field.trim().parse().ok()?;
    Utc.timestamp_millis_opt(ms).single()
}
