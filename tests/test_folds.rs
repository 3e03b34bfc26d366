//! Tests for stratified fold assignment

use cvroc::pipeline::folds::training_indices;
use cvroc::pipeline::{partition, CvError};

fn labels(n_pos: usize, n_neg: usize) -> Vec<u8> {
    let mut labels = vec![1u8; n_pos];
    labels.extend(vec![0u8; n_neg]);
    labels
}

#[test]
fn test_every_index_assigned_exactly_once() {
    let labels = labels(13, 29);
    let folds = partition(&labels, 5, 42).unwrap();

    let mut seen: Vec<usize> = folds.iter().flatten().copied().collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..labels.len()).collect::<Vec<_>>());
}

#[test]
fn test_class_balance_within_one() {
    let labels = labels(13, 29);
    let k = 5;
    let folds = partition(&labels, k, 7).unwrap();

    let sizes: Vec<usize> = folds.iter().map(|f| f.len()).collect();
    let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
    assert!(max - min <= 1, "fold sizes {:?}", sizes);

    for fold in &folds {
        let pos = fold.iter().filter(|&&i| labels[i] == 1).count();
        let neg = fold.len() - pos;
        assert!(pos == 13 / k || pos == 13 / k + 1, "positives per fold: {}", pos);
        assert!(neg == 29 / k || neg == 29 / k + 1, "negatives per fold: {}", neg);
    }
}

#[test]
fn test_same_seed_same_partition() {
    let labels = labels(20, 20);
    assert_eq!(
        partition(&labels, 10, 42).unwrap(),
        partition(&labels, 10, 42).unwrap()
    );
    assert_ne!(
        partition(&labels, 10, 42).unwrap(),
        partition(&labels, 10, 43).unwrap(),
        "different seeds should shuffle differently"
    );
}

#[test]
fn test_folds_exceeding_minority_class_rejected() {
    let labels = labels(4, 30);
    match partition(&labels, 5, 42) {
        Err(CvError::Configuration(msg)) => assert!(msg.contains("class 1"), "{}", msg),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_single_fold_rejected() {
    assert!(matches!(
        partition(&labels(5, 5), 1, 42),
        Err(CvError::Configuration(_))
    ));
}

#[test]
fn test_training_indices_complement_fold() {
    let labels = labels(6, 6);
    let folds = partition(&labels, 3, 1).unwrap();
    let train = training_indices(&folds, 1);

    assert_eq!(train.len() + folds[1].len(), labels.len());
    assert!(train.iter().all(|i| !folds[1].contains(i)));
    assert!(train.windows(2).all(|w| w[0] < w[1]));
}
