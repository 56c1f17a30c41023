//! Run configuration loaded from a JSON file.
//!
//! ```json
//! {
//!   "heuristic": {
//!     "enabled": true,
//!     "low_probability_threshold": 0.3,
//!     "consecutive_low_count_threshold": 4
//!   },
//!   "blast": { "word_size": 7, "evalue": 1e-3 }
//! }
//! ```
//!
//! Missing fields take their defaults. Command-line flags override file values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::engine::ScoringConfig;
use crate::matching::scoring::HeuristicConfig;
use crate::search::blastn::BlastParams;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Everything a `search` run can be configured with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub heuristic: HeuristicConfig,
    pub blast: BlastParams,
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            heuristic: self.heuristic,
        }
    }
}
