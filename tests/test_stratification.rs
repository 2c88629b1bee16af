//! Integration test: multi-label stratified K-fold end-to-end

use ppi_stratify::prelude::*;
use std::collections::HashSet;

fn repeat(labels: &[&'static str], times: usize) -> Vec<Vec<&'static str>> {
    (0..times).map(|_| labels.to_vec()).collect()
}

fn check_partition(splits: &[CVSplit], n_samples: usize) {
    let folds: Vec<Vec<usize>> = splits.iter().map(|s| s.test_indices.clone()).collect();
    assert!(assert_disjoint(&folds).is_ok());
    assert!(assert_covers_all(&folds, n_samples).is_ok());

    for split in splits {
        let test: HashSet<usize> = split.test_indices.iter().copied().collect();
        assert_eq!(split.train_indices.len() + split.test_indices.len(), n_samples);
        assert!(split.train_indices.iter().all(|i| !test.contains(i)));
    }
}

/// Interaction-style dataset: every sample has one or two pathway labels
fn pathway_dataset() -> Vec<Vec<&'static str>> {
    let mut y = Vec::new();
    y.extend(repeat(&["activation"], 12));
    y.extend(repeat(&["inhibition"], 9));
    y.extend(repeat(&["activation", "phosphorylation"], 6));
    y.extend(repeat(&["binding"], 15));
    y.extend(repeat(&["binding", "inhibition"], 6));
    y
}

#[test]
fn test_single_label_nine_samples_three_folds() {
    let y = repeat(&["A"], 9);
    let cv = IterativeStratifiedKFold::new(3);
    let splits: Vec<CVSplit> = cv.split(&y).unwrap().collect();

    assert_eq!(splits.len(), 3);
    check_partition(&splits, 9);
    for split in &splits {
        assert_eq!(split.test_indices.len(), 3);
    }
}

#[test]
fn test_two_labels_exact_balance() {
    let mut y = repeat(&["A"], 6);
    y.extend(repeat(&["B"], 4));

    for seed in 0..10 {
        let cv = IterativeStratifiedKFold::new(2).with_random_state(seed);
        let splits: Vec<CVSplit> = cv.split(&y).unwrap().collect();
        check_partition(&splits, 10);

        for split in &splits {
            let a = split.test_indices.iter().filter(|&&i| y[i] == ["A"]).count();
            let b = split.test_indices.iter().filter(|&&i| y[i] == ["B"]).count();
            assert_eq!((a, b), (3, 2), "seed {}", seed);
        }
    }
}

#[test]
fn test_one_sample_per_fold() {
    let y = repeat(&["A"], 5);
    let cv = IterativeStratifiedKFold::new(5);
    assert_eq!(cv.n_splits(), 5);

    let splits: Vec<CVSplit> = cv.split(&y).unwrap().collect();
    assert_eq!(splits.len(), 5);
    check_partition(&splits, 5);
    for split in &splits {
        assert_eq!(split.test_indices.len(), 1);
    }
}

#[test]
fn test_too_many_folds_is_configuration_error() {
    let y = repeat(&["A"], 5);
    let err = IterativeStratifiedKFold::new(6).split(&y).unwrap_err();
    assert!(matches!(err, StratifyError::ConfigError(_)));
}

#[test]
fn test_same_seed_same_assignment() {
    let y = repeat(&["A"], 9);
    let run = |seed| {
        IterativeStratifiedKFold::new(3)
            .with_random_state(seed)
            .assign(&y)
            .unwrap()
    };

    assert_eq!(run(42).test_folds(), run(42).test_folds());

    let other = run(7);
    let folds = other.folds();
    assert!(assert_disjoint(&folds).is_ok());
    assert!(assert_covers_all(&folds, 9).is_ok());
}

#[test]
fn test_same_seed_same_assignment_with_shuffle() {
    let y = pathway_dataset();
    let cv = IterativeStratifiedKFold::new(3).with_shuffle(true).with_random_state(42);
    assert_eq!(cv.assign(&y).unwrap(), cv.assign(&y).unwrap());
}

#[test]
fn test_degenerate_label_warns_but_partitions() {
    let mut y = repeat(&["common"], 12);
    y.extend(repeat(&["rare"], 2));

    let assignment = IterativeStratifiedKFold::new(4)
        .with_random_state(3)
        .assign(&y)
        .unwrap();

    assert_eq!(
        assignment.warnings(),
        &[StratifyWarning::TooFewMembers { min_count: 2, n_splits: 4 }]
    );
    let folds = assignment.folds();
    assert!(assert_disjoint(&folds).is_ok());
    assert!(assert_covers_all(&folds, 14).is_ok());

    // The rare label can only reach two folds.
    let rare_folds: HashSet<usize> = (12..14).filter_map(|i| assignment.fold_of(i)).collect();
    assert_eq!(rare_folds.len(), 2);
}

/// Every label count divides by 3, so greedy placement meets every share
#[test]
fn test_multi_label_balance_within_one() {
    let y = pathway_dataset();
    let index = LabelIndex::from_label_sets(&y).unwrap();

    for seed in [0, 1, 42] {
        let assignment = IterativeStratifiedKFold::new(3)
            .with_random_state(seed)
            .assign(&y)
            .unwrap();
        let report = label_balance_report(&assignment.folds(), &index).unwrap();

        assert!(assignment.warnings().is_empty());
        assert!(report.within(1.0), "seed {}: {:?}", seed, report.worst());
        let sizes = assignment.fold_sizes();
        assert_eq!(sizes.iter().sum::<usize>(), y.len());
    }
}

#[test]
fn test_co_occurring_label_can_drift_past_one() {
    // "z" only ever rides along with "a" or "d". Both of those are placed
    // before "z" (equal counts, first label wins), and each of their passes
    // puts its "z" samples on fold 0. Nothing is left for the "z" pass.
    let y = vec![
        vec!["a", "z"],
        vec!["a"],
        vec!["a", "z"],
        vec!["a"],
        vec!["d", "z"],
        vec!["d"],
        vec!["d", "z"],
        vec!["d"],
    ];
    let index = LabelIndex::from_label_sets(&y).unwrap();
    let assignment = IterativeStratifier::new(2)
        .assign(&index, &mut FirstTieBreaker)
        .unwrap();

    assert_eq!(assignment.test_folds(), &[0, 1, 0, 1, 0, 1, 0, 1]);
    assert!(assignment.warnings().is_empty());

    let report = label_balance_report(&assignment.folds(), &index).unwrap();
    assert_eq!(report.labels[0].observed, vec![2, 2]);
    assert_eq!(report.labels[1].observed, vec![2, 2]);

    let z = &report.labels[2];
    assert_eq!(z.label, "z");
    assert_eq!(z.observed, vec![4, 0]);
    assert_eq!(z.max_deviation(), 2.0);
    assert_eq!(report.worst().map(|w| w.label), Some("z"));
}

#[test]
fn test_empty_inputs_rejected() {
    let cv = IterativeStratifiedKFold::new(2);

    let none: Vec<Vec<&str>> = Vec::new();
    assert!(matches!(cv.split(&none).unwrap_err(), StratifyError::EmptyDataset(_)));

    let unlabeled: Vec<Vec<&str>> = vec![Vec::new(); 4];
    assert!(matches!(cv.split(&unlabeled).unwrap_err(), StratifyError::EmptyDataset(_)));
}

#[test]
fn test_unlabeled_samples_still_assigned() {
    let mut y = repeat(&["A"], 6);
    y.extend(vec![Vec::new(); 3]);

    let splits: Vec<CVSplit> = IterativeStratifiedKFold::new(3)
        .with_random_state(9)
        .split(&y)
        .unwrap()
        .collect();
    check_partition(&splits, 9);
    for split in &splits {
        assert_eq!(split.test_indices.len(), 3);
    }
}

#[test]
fn test_integer_labels_and_indicator_agree() {
    let rows: Vec<Vec<usize>> = (0..24).map(|i| if i % 4 == 0 { vec![0, 1] } else { vec![i % 2] }).collect();
    let mut y = ndarray::Array2::<u8>::zeros((24, 2));
    for (i, row) in rows.iter().enumerate() {
        for &l in row {
            y[[i, l]] = 1;
        }
    }

    let cv = IterativeStratifiedKFold::new(4).with_random_state(12);
    let from_sets: Vec<CVSplit> = cv.split(&rows).unwrap().collect();
    let from_matrix: Vec<CVSplit> = cv.split_indicator(y.view()).unwrap().collect();
    assert_eq!(from_sets, from_matrix);
}

#[test]
fn test_stratifier_with_predictable_breaker() {
    let y = pathway_dataset();
    let index = LabelIndex::from_label_sets(&y).unwrap();
    let stratifier = IterativeStratifier::new(3);

    let a = stratifier.assign(&index, &mut FirstTieBreaker).unwrap();
    let b = stratifier.assign(&index, &mut FirstTieBreaker).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.n_splits(), 3);
}

#[test]
fn test_repeated_rounds_are_valid_partitions() {
    let y = pathway_dataset();
    let cv = RepeatedIterativeStratifiedKFold::new(3, 5).with_random_state(0);
    let splits = cv.split(&y).unwrap();

    assert_eq!(splits.len(), 15);
    for round in splits.chunks(3) {
        check_partition(round, y.len());
    }
}

#[test]
fn test_config_driven_splitter() {
    let config = StratifiedKFoldConfig::from_json_str(r#"{"n_splits": 4, "shuffle": true, "random_state": 5}"#).unwrap();
    let cv = IterativeStratifiedKFold::from_config(config);
    assert_eq!(cv.n_splits(), 4);

    let splits: Vec<CVSplit> = cv.split(&pathway_dataset()).unwrap().collect();
    check_partition(&splits, 48);
}
