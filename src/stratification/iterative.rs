//! Iterative stratification (Sechidis, Tsoumakas & Vlahavas, 2011)
//!
//! Labels are processed from the rarest to the most common. Every unassigned
//! sample carrying the current label goes to the fold that still wants the
//! most of that label, falling back to the fold that wants the most samples
//! overall. Fold budgets are fractional and consumed greedily, so no explicit
//! rounding happens anywhere.

use crate::error::{Result, StratifyError};
use crate::labels::LabelIndex;
use crate::stratification::diagnostics::{assert_covers_all, assert_disjoint};
use crate::stratification::splitter::Splits;
use crate::tie_break::{arg_ties, pick_tied, Extremum, TieBreaker};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Non-fatal problems detected while stratifying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StratifyWarning {
    /// The least populated label cannot appear in every fold
    TooFewMembers { min_count: usize, n_splits: usize },
}

impl fmt::Display for StratifyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StratifyWarning::TooFewMembers { min_count, n_splits } => write!(
                f,
                "the least populated label has only {} members, which is too few; \
                 the minimum number of members for any label cannot be less than n_splits={}",
                min_count, n_splits
            ),
        }
    }
}

/// Fold id of every sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment {
    n_splits: usize,
    test_folds: Vec<usize>,
    warnings: Vec<StratifyWarning>,
}

impl FoldAssignment {
    /// Build from explicit fold member lists covering `0..n_samples`
    pub fn from_folds(folds: &[Vec<usize>], n_samples: usize) -> Result<Self> {
        assert_disjoint(folds)?;
        assert_covers_all(folds, n_samples)?;

        let mut test_folds = vec![0; n_samples];
        for (fold, members) in folds.iter().enumerate() {
            for &sample in members {
                test_folds[sample] = fold;
            }
        }

        Ok(Self {
            n_splits: folds.len(),
            test_folds,
            warnings: Vec::new(),
        })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    pub fn n_samples(&self) -> usize {
        self.test_folds.len()
    }

    /// The assignment vector: `test_folds()[i]` is the fold holding sample `i`
    pub fn test_folds(&self) -> &[usize] {
        &self.test_folds
    }

    /// Fold holding `sample`
    pub fn fold_of(&self, sample: usize) -> Option<usize> {
        self.test_folds.get(sample).copied()
    }

    /// Members of `fold`, ascending
    pub fn fold_members(&self, fold: usize) -> Vec<usize> {
        self.test_folds
            .iter()
            .enumerate()
            .filter(|(_, &f)| f == fold)
            .map(|(i, _)| i)
            .collect()
    }

    /// Members of every fold, ascending within each fold
    pub fn folds(&self) -> Vec<Vec<usize>> {
        let mut folds = vec![Vec::new(); self.n_splits];
        for (sample, &fold) in self.test_folds.iter().enumerate() {
            folds[fold].push(sample);
        }
        folds
    }

    pub fn fold_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_splits];
        for &fold in &self.test_folds {
            sizes[fold] += 1;
        }
        sizes
    }

    /// Warnings raised while this assignment was computed
    pub fn warnings(&self) -> &[StratifyWarning] {
        &self.warnings
    }

    /// Train/test pairs for every fold, reusing this assignment
    pub fn splits(&self) -> Splits {
        Splits::new(self.clone())
    }

    pub fn into_splits(self) -> Splits {
        Splits::new(self)
    }

    /// Renumber samples: the sample at position `i` becomes `order[i]`
    pub(crate) fn remap(self, order: &[usize]) -> Self {
        let mut test_folds = vec![0; self.test_folds.len()];
        for (i, &fold) in self.test_folds.iter().enumerate() {
            test_folds[order[i]] = fold;
        }
        Self { test_folds, ..self }
    }
}

/// Greedy label-by-label fold assignment
#[derive(Debug, Clone, Copy)]
pub struct IterativeStratifier {
    n_splits: usize,
}

impl IterativeStratifier {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Check that the labels can support `n_splits` folds.
    ///
    /// Fails when every label has fewer members than `n_splits`. Returns a
    /// warning when only some of them do.
    pub fn check_support<L>(&self, index: &LabelIndex<L>) -> Result<Option<StratifyWarning>> {
        if self.n_splits < 2 {
            return Err(StratifyError::InvalidParameter {
                name: "n_splits".to_string(),
                value: self.n_splits.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }

        if index.counts().iter().all(|&c| c < self.n_splits) {
            return Err(StratifyError::ConfigError(format!(
                "all {} labels have fewer members than n_splits={}",
                index.n_labels(),
                self.n_splits
            )));
        }

        let min_count = index.min_count();
        if self.n_splits > min_count {
            let warning = StratifyWarning::TooFewMembers {
                min_count,
                n_splits: self.n_splits,
            };
            warn!(min_count, n_splits = self.n_splits, "{}", warning);
            return Ok(Some(warning));
        }
        Ok(None)
    }

    /// Assign every sample of `index` to a fold
    pub fn assign<L, B>(&self, index: &LabelIndex<L>, breaker: &mut B) -> Result<FoldAssignment>
    where
        B: TieBreaker + ?Sized,
    {
        let warning = self.check_support(index)?;
        let folds = self.stratify(index, breaker);

        // from_folds re-checks disjointness and coverage.
        let mut assignment = FoldAssignment::from_folds(&folds, index.n_samples())?;
        assignment.warnings.extend(warning);
        Ok(assignment)
    }

    /// Core loop; returns fold members in commit order
    fn stratify<L, B>(&self, index: &LabelIndex<L>, breaker: &mut B) -> Vec<Vec<usize>>
    where
        B: TieBreaker + ?Sized,
    {
        let k = self.n_splits;
        let r = 1.0 / k as f64;
        let n_samples = index.n_samples();
        let n_labels = index.n_labels();

        // Selection key per label; uses the global count, not what is left.
        let desired: Vec<f64> = index.counts().iter().map(|&c| c as f64 * r).collect();

        let mut target_size = Array1::from_elem(k, n_samples as f64 * r);
        let mut target_count = Array2::<f64>::zeros((k, n_labels));
        for mut row in target_count.rows_mut() {
            for (l, cell) in row.iter_mut().enumerate() {
                *cell = desired[l];
            }
        }

        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); k];
        let mut assigned = vec![false; n_samples];
        let mut n_assigned = 0usize;
        let mut completed = vec![false; n_labels];
        // Survives across label passes: a pass that commits nothing still
        // charges the fold that most recently received a sample.
        let mut last_fold: Option<usize> = None;

        while n_assigned < n_samples {
            let open: Vec<usize> = (0..n_labels).filter(|&l| !completed[l]).collect();
            let keys: Vec<f64> = open.iter().map(|&l| desired[l]).collect();
            let label = match pick_tied(&keys, Extremum::Min, &mut *breaker) {
                Some(pos) => open[pos],
                None => break,
            };

            let mut committed = 0usize;
            for &sample in index.members(label) {
                if assigned[sample] {
                    continue;
                }

                let hunger: Vec<f64> = target_count.column(label).to_vec();
                let hungriest = arg_ties(&hunger, Extremum::Max);
                let sizes: Vec<f64> = hungriest.iter().map(|&f| target_size[f]).collect();
                let fold = hungriest[pick_tied(&sizes, Extremum::Max, &mut *breaker).unwrap_or(0)];

                folds[fold].push(sample);
                assigned[sample] = true;
                n_assigned += 1;
                committed += 1;
                for &l in index.sample_labels(sample) {
                    target_count[[fold, l]] -= 1.0;
                }
                last_fold = Some(fold);
            }

            if let Some(fold) = last_fold {
                target_size[fold] -= 1.0;
            }
            completed[label] = true;
            debug!(label, committed, remaining = n_samples - n_assigned, "label pass done");
        }

        // Only samples without labels can be left at this point. They carry
        // no label signal, so they just even out the fold sizes.
        for sample in index.unlabeled() {
            if assigned[sample] {
                continue;
            }
            let sizes: Vec<f64> = folds.iter().map(|f| f.len() as f64).collect();
            let fold = pick_tied(&sizes, Extremum::Min, &mut *breaker).unwrap_or(0);
            folds[fold].push(sample);
            assigned[sample] = true;
        }

        folds
    }
}
