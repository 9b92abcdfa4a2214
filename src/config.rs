//! Configuration for a correlation run
//!
//! Allow-lists, the visit window, and the filesystem layout were code-level
//! constants in the historical scripts; here they are explicit per-run
//! configuration loaded from a JSON file and passed into the engine.

use crate::correlator::DEFAULT_VISIT_WINDOW_SECS;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a batch correlation run.
///
/// Every field carries a serde default so partial config files work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root directory holding one subdirectory of logs per wearer
    pub data_dir: PathBuf,

    /// Identities of devices whose closeness to the wearer is scored
    pub tracked_devices: Vec<String>,

    /// Identities of fixed reference beacons
    pub beacons: Vec<String>,

    /// Symmetric tolerance (seconds) for deciding whether an answer was
    /// given while a beacon was in range
    pub visit_window_secs: u64,

    /// Filename substring identifying detection logs
    pub detection_file_pattern: String,

    /// Filename substring identifying answer logs
    pub answer_file_pattern: String,

    /// Optional device-naming log for address -> identity resolution
    pub device_name_log: Option<PathBuf>,

    /// Output path for the closeness results table
    pub closeness_output: PathBuf,

    /// Output path for the beacon-answer results table
    pub beacon_answers_output: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tracked_devices: Vec::new(),
            beacons: Vec::new(),
            visit_window_secs: DEFAULT_VISIT_WINDOW_SECS,
            detection_file_pattern: "_BT_".to_string(),
            answer_file_pattern: "_QUESTIONS_".to_string(),
            device_name_log: None,
            closeness_output: PathBuf::from("closeness_scores.csv"),
            beacon_answers_output: PathBuf::from("beacon_answers.csv"),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON (used to scaffold a
    /// config file from the defaults).
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.detection_file_pattern.is_empty() {
            return Err(EngineError::Config(
                "detection_file_pattern must not be empty".to_string(),
            ));
        }
        if self.answer_file_pattern.is_empty() {
            return Err(EngineError::Config(
                "answer_file_pattern must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_historical_layout() {
        let config = EngineConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.visit_window_secs, 60);
        assert_eq!(config.detection_file_pattern, "_BT_");
        assert_eq!(config.answer_file_pattern, "_QUESTIONS_");
        assert_eq!(config.closeness_output, PathBuf::from("closeness_scores.csv"));
        assert_eq!(
            config.beacon_answers_output,
            PathBuf::from("beacon_answers.csv")
        );
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let json = r#"{"tracked_devices": ["AA:00:00:00:00:01"], "visit_window_secs": 30}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tracked_devices, vec!["AA:00:00:00:00:01"]);
        assert_eq!(config.visit_window_secs, 30);
        assert_eq!(config.detection_file_pattern, "_BT_");
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let config = EngineConfig {
            detection_file_pattern: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
