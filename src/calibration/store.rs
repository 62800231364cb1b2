//! Persisted tool→strategy mapping.
//!
//! Loaded once at process start, updated in memory during a run, rewritten to
//! disk once per server pass. Updates are additive merges: calibrating one
//! server never removes or alters entries belonging to another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::strategy::PromptStrategy;
use crate::types::Result;

/// One persisted calibration winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStrategyEntry {
    pub server: String,
    pub tool: String,
    pub strategy: PromptStrategy,
}

/// Persisted tool→best-strategy lookup table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyMapping {
    #[serde(default)]
    pub tools: BTreeMap<String, ToolStrategyEntry>,

    /// Strategy for tools with no mapping entry.
    #[serde(default = "default_strategy")]
    pub default: PromptStrategy,

    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

fn default_strategy() -> PromptStrategy {
    PromptStrategy::Imperative
}

impl Default for StrategyMapping {
    fn default() -> Self {
        Self {
            tools: BTreeMap::new(),
            default: default_strategy(),
            last_updated: Utc::now(),
        }
    }
}

impl StrategyMapping {
    /// Load the mapping from disk. An absent file yields an empty mapping.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Rewrite the mapping on disk with a fresh `lastUpdated` stamp.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.last_updated = Utc::now();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Additive merge: inserts or replaces this tool's entry, touching
    /// nothing else.
    pub fn merge_entry(&mut self, entry: ToolStrategyEntry) {
        self.tools.insert(entry.tool.clone(), entry);
    }

    /// Calibrated strategy for a tool, if any.
    pub fn strategy_for(&self, tool: &str) -> Option<PromptStrategy> {
        self.tools.get(tool).map(|entry| entry.strategy)
    }

    /// Number of mapped tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
