//! Label encoding for multi-label datasets
//!
//! Maps arbitrary label identifiers onto a dense `0..L` range and keeps the
//! per-label statistics the stratifier needs:
//! - global occurrence counts
//! - per-label sample membership, in original sample order
//! - the encoded label set of every sample

use crate::error::{Result, StratifyError};
use ndarray::ArrayView2;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Dense encoding of the labels present in a dataset
#[derive(Debug, Clone)]
pub struct LabelIndex<L> {
    /// Distinct labels, sorted ascending; position is the encoded id
    labels: Vec<L>,
    /// Reverse lookup from label to encoded id
    lookup: HashMap<L, usize>,
    /// Number of samples carrying each label
    counts: Vec<usize>,
    /// Samples carrying each label, ascending
    members: Vec<Vec<usize>>,
    /// Encoded, de-duplicated label set of each sample
    sample_labels: Vec<Vec<usize>>,
}

impl<L> LabelIndex<L>
where
    L: Clone + Ord + Hash,
{
    /// Build the index from per-sample label collections.
    ///
    /// Fails with [`StratifyError::EmptyDataset`] when there are no samples or
    /// when no sample carries a label. Individual samples may be unlabeled.
    pub fn from_label_sets<'a, S, I>(samples: S) -> Result<Self>
    where
        L: 'a,
        S: IntoIterator<Item = I>,
        I: IntoIterator<Item = &'a L>,
    {
        let raw: Vec<Vec<&'a L>> = samples
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect();

        if raw.is_empty() {
            return Err(StratifyError::EmptyDataset(
                "cannot index labels of zero samples".to_string(),
            ));
        }

        let distinct: BTreeSet<&L> = raw.iter().flatten().copied().collect();
        if distinct.is_empty() {
            return Err(StratifyError::EmptyDataset(format!(
                "none of the {} samples carries a label",
                raw.len()
            )));
        }

        let labels: Vec<L> = distinct.into_iter().cloned().collect();
        let lookup: HashMap<L, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();

        let mut counts = vec![0usize; labels.len()];
        let mut members = vec![Vec::new(); labels.len()];
        let mut sample_labels = Vec::with_capacity(raw.len());

        for (sample, set) in raw.iter().enumerate() {
            let mut encoded: Vec<usize> = set.iter().map(|l| lookup[*l]).collect();
            encoded.sort_unstable();
            encoded.dedup();
            for &l in &encoded {
                counts[l] += 1;
                members[l].push(sample);
            }
            sample_labels.push(encoded);
        }

        Ok(Self {
            labels,
            lookup,
            counts,
            members,
            sample_labels,
        })
    }

    /// Encoded id of `label`, if it occurs in the dataset
    pub fn position(&self, label: &L) -> Option<usize> {
        self.lookup.get(label).copied()
    }

    /// Occurrence count of `label` (zero for unknown labels)
    pub fn count_of(&self, label: &L) -> usize {
        self.position(label).map_or(0, |l| self.counts[l])
    }
}

impl LabelIndex<usize> {
    /// Build the index from an `N x L` label-indicator matrix.
    ///
    /// Any cell different from `T::default()` marks membership; the label id is
    /// the column number. Columns without a single positive are not indexed.
    pub fn from_indicator<T>(y: ArrayView2<'_, T>) -> Result<Self>
    where
        T: Copy + PartialEq + Default,
    {
        let sets = indicator_to_label_sets(y);
        Self::from_label_sets(sets.iter())
    }
}

impl<L> LabelIndex<L> {
    /// Number of indexed samples
    pub fn n_samples(&self) -> usize {
        self.sample_labels.len()
    }

    /// Number of distinct labels
    pub fn n_labels(&self) -> usize {
        self.labels.len()
    }

    /// Distinct labels in encoded order
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Label for an encoded id
    pub fn label(&self, position: usize) -> &L {
        &self.labels[position]
    }

    /// Occurrence counts indexed by encoded id
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Samples carrying the label with encoded id `position`
    pub fn members(&self, position: usize) -> &[usize] {
        &self.members[position]
    }

    /// Encoded labels of `sample`
    pub fn sample_labels(&self, sample: usize) -> &[usize] {
        &self.sample_labels[sample]
    }

    /// Smallest occurrence count among all labels
    pub fn min_count(&self) -> usize {
        self.counts.iter().copied().min().unwrap_or(0)
    }

    /// Samples with an empty label set
    pub fn unlabeled(&self) -> impl Iterator<Item = usize> + '_ {
        self.sample_labels
            .iter()
            .enumerate()
            .filter(|(_, set)| set.is_empty())
            .map(|(i, _)| i)
    }
}

/// Convert an indicator matrix into per-row lists of positive column ids
pub fn indicator_to_label_sets<T>(y: ArrayView2<'_, T>) -> Vec<Vec<usize>>
where
    T: Copy + PartialEq + Default,
{
    let zero = T::default();
    y.rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, &v)| v != zero)
                .map(|(j, _)| j)
                .collect()
        })
        .collect()
}
