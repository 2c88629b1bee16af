//! Post-hoc checks on fold assignments

use crate::error::{Result, StratifyError};
use crate::labels::LabelIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fail if any sample index appears in more than one fold
pub fn assert_disjoint(folds: &[Vec<usize>]) -> Result<()> {
    let mut owner: HashMap<usize, usize> = HashMap::new();

    for (fold, members) in folds.iter().enumerate() {
        for &sample in members {
            let prev = *owner.entry(sample).or_insert(fold);
            if prev != fold {
                return Err(StratifyError::InvariantViolation(format!(
                    "sample {} is in both fold {} and fold {}",
                    sample, prev, fold
                )));
            }
        }
    }
    Ok(())
}

/// Fail unless the folds together hold every index in `0..n_samples` exactly once
pub fn assert_covers_all(folds: &[Vec<usize>], n_samples: usize) -> Result<()> {
    let mut seen = vec![false; n_samples];

    for &sample in folds.iter().flatten() {
        if sample >= n_samples {
            return Err(StratifyError::InvariantViolation(format!(
                "sample {} is out of range for {} samples",
                sample, n_samples
            )));
        }
        if seen[sample] {
            return Err(StratifyError::InvariantViolation(format!(
                "sample {} is assigned more than once",
                sample
            )));
        }
        seen[sample] = true;
    }

    if let Some(missing) = seen.iter().position(|&s| !s) {
        let n_missing = seen.iter().filter(|&&s| !s).count();
        return Err(StratifyError::InvariantViolation(format!(
            "{} samples are unassigned, first is {}",
            n_missing, missing
        )));
    }
    Ok(())
}

/// Observed versus ideal occurrence of one label across folds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBalance<L> {
    pub label: L,
    /// Samples carrying the label in the whole dataset
    pub total: usize,
    /// `total / n_splits`
    pub ideal: f64,
    /// Samples carrying the label in each fold
    pub observed: Vec<usize>,
}

impl<L> LabelBalance<L> {
    /// Largest `|observed - ideal|` over the folds
    pub fn max_deviation(&self) -> f64 {
        self.observed
            .iter()
            .map(|&c| (c as f64 - self.ideal).abs())
            .fold(0.0, f64::max)
    }

    /// Mean observed count per fold
    pub fn mean(&self) -> f64 {
        if self.observed.is_empty() {
            return 0.0;
        }
        self.observed.iter().sum::<usize>() as f64 / self.observed.len() as f64
    }

    /// Population standard deviation of the observed counts
    pub fn std(&self) -> f64 {
        if self.observed.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .observed
            .iter()
            .map(|&c| (c as f64 - mean).powi(2))
            .sum::<f64>()
            / self.observed.len() as f64;
        variance.sqrt()
    }
}

/// Per-label balance of a fold assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport<L> {
    pub n_splits: usize,
    pub labels: Vec<LabelBalance<L>>,
}

impl<L> BalanceReport<L> {
    /// Entry with the largest deviation from its ideal share
    pub fn worst(&self) -> Option<&LabelBalance<L>> {
        self.labels
            .iter()
            .max_by(|a, b| a.max_deviation().total_cmp(&b.max_deviation()))
    }

    /// Largest deviation over every label and fold
    pub fn max_deviation(&self) -> f64 {
        self.worst().map_or(0.0, LabelBalance::max_deviation)
    }

    /// Whether every label is within `tolerance` of its ideal share in every fold
    pub fn within(&self, tolerance: f64) -> bool {
        self.max_deviation() <= tolerance
    }
}

/// Count, for each label and fold, how many fold members carry the label.
///
/// `folds` holds sample indices in the same numbering as `index`; an index
/// outside `0..index.n_samples()` is an `InvariantViolation`.
pub fn label_balance_report<L: Clone>(
    folds: &[Vec<usize>],
    index: &LabelIndex<L>,
) -> Result<BalanceReport<L>> {
    let n_splits = folds.len();
    let n_samples = index.n_samples();
    let mut observed = vec![vec![0usize; n_splits]; index.n_labels()];

    for (fold, members) in folds.iter().enumerate() {
        for &sample in members {
            if sample >= n_samples {
                return Err(StratifyError::InvariantViolation(format!(
                    "fold {} holds sample {}, out of range for {} samples",
                    fold, sample, n_samples
                )));
            }
            for &l in index.sample_labels(sample) {
                observed[l][fold] += 1;
            }
        }
    }

    let labels = observed
        .into_iter()
        .enumerate()
        .map(|(l, observed)| {
            let total = index.counts()[l];
            LabelBalance {
                label: index.label(l).clone(),
                total,
                ideal: if n_splits == 0 { 0.0 } else { total as f64 / n_splits as f64 },
                observed,
            }
        })
        .collect();

    Ok(BalanceReport { n_splits, labels })
}
