//! K-fold splitters built on iterative stratification

use crate::error::{Result, StratifyError};
use crate::labels::{indicator_to_label_sets, LabelIndex};
use crate::stratification::config::StratifiedKFoldConfig;
use crate::stratification::iterative::{FoldAssignment, IterativeStratifier};
use crate::tie_break::RngTieBreaker;
use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use tracing::info;

/// A single train/test split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Iterator over the train/test pairs of one fold assignment.
///
/// Cloning, or calling [`Splits::restart`], replays the same assignment.
#[derive(Debug, Clone)]
pub struct Splits {
    assignment: FoldAssignment,
    next_fold: usize,
}

impl Splits {
    pub(crate) fn new(assignment: FoldAssignment) -> Self {
        Self {
            assignment,
            next_fold: 0,
        }
    }

    pub fn assignment(&self) -> &FoldAssignment {
        &self.assignment
    }

    /// Rewind to the first fold
    pub fn restart(&mut self) {
        self.next_fold = 0;
    }
}

impl Iterator for Splits {
    type Item = CVSplit;

    fn next(&mut self) -> Option<CVSplit> {
        let fold_idx = self.next_fold;
        if fold_idx >= self.assignment.n_splits() {
            return None;
        }
        self.next_fold += 1;

        let (test_indices, train_indices): (Vec<usize>, Vec<usize>) =
            (0..self.assignment.n_samples()).partition(|&i| self.assignment.test_folds()[i] == fold_idx);

        Some(CVSplit {
            train_indices,
            test_indices,
            fold_idx,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.assignment.n_splits().saturating_sub(self.next_fold);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Splits {}

fn make_rng(random_state: Option<u64>) -> ChaCha8Rng {
    match random_state {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Multi-label stratified K-fold cross-validator
#[derive(Debug, Clone, Default)]
pub struct IterativeStratifiedKFold {
    config: StratifiedKFoldConfig,
}

impl IterativeStratifiedKFold {
    /// Create a splitter with `n_splits` folds, no shuffling and no seed
    pub fn new(n_splits: usize) -> Self {
        Self::from_config(StratifiedKFoldConfig::new(n_splits))
    }

    pub fn from_config(config: StratifiedKFoldConfig) -> Self {
        Self { config }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.config.shuffle = shuffle;
        self
    }

    /// Set random state for reproducibility
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.config.random_state = Some(seed);
        self
    }

    pub fn config(&self) -> &StratifiedKFoldConfig {
        &self.config
    }

    /// Number of train/test pairs [`split`](Self::split) yields
    pub fn n_splits(&self) -> usize {
        self.config.n_splits
    }

    /// Compute a fresh fold assignment for the label sets in `y`.
    ///
    /// Indices in the result always refer to positions in `y`, also when
    /// shuffling is enabled.
    pub fn assign<L>(&self, y: &[Vec<L>]) -> Result<FoldAssignment>
    where
        L: Clone + Ord + Hash,
    {
        self.config.validate()?;

        let mut rng = make_rng(self.config.random_state);
        let mut order: Vec<usize> = (0..y.len()).collect();
        if self.config.shuffle {
            order.shuffle(&mut rng);
        }

        let index = LabelIndex::from_label_sets(order.iter().map(|&i| &y[i]))?;
        info!(
            n_samples = index.n_samples(),
            n_labels = index.n_labels(),
            n_splits = self.config.n_splits,
            shuffle = self.config.shuffle,
            "Stratifying samples into folds"
        );

        let mut breaker = RngTieBreaker::new(rng);
        let assignment = IterativeStratifier::new(self.config.n_splits).assign(&index, &mut breaker)?;

        Ok(if self.config.shuffle {
            assignment.remap(&order)
        } else {
            assignment
        })
    }

    /// Generate train/test indices, one pair per fold
    pub fn split<L>(&self, y: &[Vec<L>]) -> Result<Splits>
    where
        L: Clone + Ord + Hash,
    {
        Ok(self.assign(y)?.into_splits())
    }

    /// Like [`split`](Self::split); `x` only has to agree with `y` on the
    /// number of rows
    pub fn split_xy<F, L>(&self, x: ArrayView2<'_, F>, y: &[Vec<L>]) -> Result<Splits>
    where
        L: Clone + Ord + Hash,
    {
        if x.nrows() != y.len() {
            return Err(StratifyError::ShapeError {
                expected: format!("{} rows in X to match y", y.len()),
                actual: format!("{} rows", x.nrows()),
            });
        }
        self.split(y)
    }

    /// Split an `N x L` label-indicator matrix
    pub fn split_indicator<T>(&self, y: ArrayView2<'_, T>) -> Result<Splits>
    where
        T: Copy + PartialEq + Default,
    {
        self.split(&indicator_to_label_sets(y))
    }
}

/// Iterative stratified K-fold repeated with a different seed each round
#[derive(Debug, Clone)]
pub struct RepeatedIterativeStratifiedKFold {
    n_splits: usize,
    n_repeats: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl RepeatedIterativeStratifiedKFold {
    pub fn new(n_splits: usize, n_repeats: usize) -> Self {
        Self {
            n_splits,
            n_repeats,
            shuffle: true,
            random_state: None,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Round `r` is seeded with `seed + r`
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits * self.n_repeats
    }

    /// All splits of all rounds; `fold_idx` runs over `0..n_splits * n_repeats`
    pub fn split<L>(&self, y: &[Vec<L>]) -> Result<Vec<CVSplit>>
    where
        L: Clone + Ord + Hash,
    {
        if self.n_repeats == 0 {
            return Err(StratifyError::InvalidParameter {
                name: "n_repeats".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let mut all_splits = Vec::with_capacity(self.n_splits());
        for repeat in 0..self.n_repeats {
            let mut config = StratifiedKFoldConfig::new(self.n_splits).with_shuffle(self.shuffle);
            config.random_state = self.random_state.map(|s| s.wrapping_add(repeat as u64));

            let splits = IterativeStratifiedKFold::from_config(config).split(y)?;
            all_splits.extend(splits.map(|mut split| {
                split.fold_idx += repeat * self.n_splits;
                split
            }));
        }

        Ok(all_splits)
    }
}
