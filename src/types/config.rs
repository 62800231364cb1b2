//! Configuration structures.
//!
//! Configuration is loaded from a JSON file by the CLI; every field has a
//! working default so the calibrator runs with no file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::errors::{Error, Result};

/// Global calibrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Agent backend configuration.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Calibration run configuration.
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::config(format!("invalid config {}: {}", path.display(), e)))
    }
}

/// Agent backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent execution endpoint (one POST per isolated run).
    pub endpoint: String,

    /// Wall-clock budget for a single agent invocation. Enforced by the
    /// HTTP client; the only cancellation mechanism in the core.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8750/run".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Calibration run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Step budget handed to the agent per invocation.
    pub max_steps: u32,

    /// Fixed delay between consecutive trials. Cooperative backpressure
    /// against the calibrated backend, not a correctness requirement.
    #[serde(with = "humantime_serde")]
    pub attempt_delay: Duration,

    /// Trials per (tool, strategy). The recorded attempt is the fastest
    /// successful sample, or the last failure when none succeed.
    pub samples_per_strategy: u32,

    /// Persisted tool→strategy mapping file.
    pub mapping_path: PathBuf,

    /// Directory receiving per-server JSON and text reports.
    pub report_dir: PathBuf,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            max_steps: 5,
            attempt_delay: Duration::from_secs(1),
            samples_per_strategy: 1,
            mapping_path: PathBuf::from("calibration/strategy-mapping.json"),
            report_dir: PathBuf::from("calibration/reports"),
        }
    }
}
