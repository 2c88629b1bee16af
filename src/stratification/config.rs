//! Splitter configuration

use crate::error::{Result, StratifyError};
use serde::{Deserialize, Serialize};

/// Settings for [`IterativeStratifiedKFold`](super::IterativeStratifiedKFold)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StratifiedKFoldConfig {
    /// Number of folds, at least 2
    pub n_splits: usize,
    /// Shuffle samples before stratifying
    pub shuffle: bool,
    /// Seed for shuffling and tie-breaking; `None` draws from OS entropy
    pub random_state: Option<u64>,
}

impl Default for StratifiedKFoldConfig {
    fn default() -> Self {
        Self {
            n_splits: 3,
            shuffle: false,
            random_state: None,
        }
    }
}

impl StratifiedKFoldConfig {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            ..Default::default()
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_splits < 2 {
            return Err(StratifyError::InvalidParameter {
                name: "n_splits".to_string(),
                value: self.n_splits.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        Ok(())
    }
}
