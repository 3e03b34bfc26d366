//! Integration tests for the cross-validated evaluation

use cvroc::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn quick_config() -> CvConfig {
    CvConfig {
        folds: 5,
        n_bootstrap: 200,
        ..Default::default()
    }
}

#[test]
fn test_default_config_values() {
    let config = CvConfig::default();
    assert_eq!(config.folds, 10);
    assert_eq!(config.seed, 42);
    assert_eq!(config.n_bootstrap, 1000);
    assert_eq!(config.ci, 95.0);
    assert_eq!(config.imputation, ImputationScope::Global);
    assert_eq!(config.logistic.c, 1.0);
    assert_eq!(config.logistic.max_iter, 1000);
}

#[test]
fn test_oof_vector_covers_every_sample() {
    let ds = create_dataset(20, 2.0, 3);
    let classifier = CrossValidatedClassifier::new(&ds, quick_config()).unwrap();
    let evaluation = classifier.evaluate().unwrap();

    assert_eq!(evaluation.oof_probabilities.len(), ds.len());
    assert!(evaluation
        .oof_probabilities
        .iter()
        .all(|p| p.is_finite() && (0.0..=1.0).contains(p)));

    let tested: usize = evaluation.folds.iter().map(|f| f.test_size).sum();
    assert_eq!(tested, ds.len());
    for fold in &evaluation.folds {
        assert_eq!(fold.train_size + fold.test_size, ds.len());
    }
}

#[test]
fn test_same_seed_reproduces_run() {
    let ds = create_dataset(25, 1.0, 11);
    let a = CrossValidatedClassifier::new(&ds, quick_config())
        .unwrap()
        .run(None)
        .unwrap();
    let b = CrossValidatedClassifier::new(&ds, quick_config())
        .unwrap()
        .run(None)
        .unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_informative_feature_scores_high() {
    let ds = create_dataset(30, 4.0, 5);
    let summary = CrossValidatedClassifier::new(&ds, quick_config())
        .unwrap()
        .run(None)
        .unwrap();

    assert!(summary.evaluation.auc > 0.9, "auc {}", summary.evaluation.auc);
    assert!(summary.interval.lower <= summary.evaluation.auc);
    assert!(summary.evaluation.auc <= summary.interval.upper);
    assert!(summary.operating_point.youden_index > 0.5);
}

#[test]
fn test_noise_only_auc_near_chance() {
    let ds = create_dataset(40, 0.0, 9);
    let evaluation = CrossValidatedClassifier::new(&ds, quick_config())
        .unwrap()
        .evaluate()
        .unwrap();

    assert!(
        (0.2..=0.8).contains(&evaluation.auc),
        "noise AUC should hover around 0.5, got {}",
        evaluation.auc
    );
}

#[test]
fn test_within_fold_imputation_runs_with_missing_values() {
    let mut ds = create_dataset(15, 3.0, 2);
    for i in (0..ds.len()).step_by(4) {
        ds.features[i][1] = None;
    }

    for scope in [ImputationScope::Global, ImputationScope::WithinFold] {
        let config = CvConfig {
            imputation: scope,
            ..quick_config()
        };
        let evaluation = CrossValidatedClassifier::new(&ds, config)
            .unwrap()
            .evaluate()
            .unwrap();
        assert_eq!(evaluation.oof_probabilities.len(), ds.len());
        assert!(evaluation.auc > 0.8, "{} auc {}", scope, evaluation.auc);
    }
}

#[test]
fn test_too_many_folds_for_minority_class() {
    let ds = create_dataset(4, 1.0, 1);
    let config = CvConfig {
        folds: 5,
        ..Default::default()
    };
    let classifier = CrossValidatedClassifier::new(&ds, config).unwrap();

    assert!(matches!(
        classifier.evaluate(),
        Err(CvError::Configuration(_))
    ));
}

#[test]
fn test_invalid_confidence_level_rejected() {
    let ds = create_dataset(10, 1.0, 1);
    let config = CvConfig {
        ci: 100.0,
        ..Default::default()
    };

    assert!(matches!(
        CrossValidatedClassifier::new(&ds, config),
        Err(CvError::Configuration(_))
    ));
}

#[test]
fn test_fold_auc_mean_within_unit_interval() {
    let ds = create_dataset(20, 1.5, 4);
    let evaluation = CrossValidatedClassifier::new(&ds, quick_config())
        .unwrap()
        .evaluate()
        .unwrap();

    let (mean, std) = evaluation.fold_auc_mean_std();
    assert_eq!(
        evaluation.fold_aucs().len() + evaluation.insufficient_folds,
        evaluation.folds.len()
    );
    assert!((0.0..=1.0).contains(&mean));
    assert!(std >= 0.0);
}

#[test]
fn test_held_out_row_cannot_move_its_fold_mates() {
    let ds = create_dataset(20, 1.5, 8);
    let config = quick_config();
    let classifier = CrossValidatedClassifier::new(&ds, config.clone()).unwrap();
    let folds = classifier.partition().unwrap();
    let baseline = classifier.evaluate().unwrap();

    let target = folds[0][0];
    let mut perturbed = ds.clone();
    for value in perturbed.features[target].iter_mut() {
        *value = Some(1e6);
    }
    let shifted = CrossValidatedClassifier::new(&perturbed, config)
        .unwrap()
        .evaluate()
        .unwrap();

    for &i in folds[0].iter().filter(|&&i| i != target) {
        assert_eq!(
            baseline.oof_probabilities[i].to_bits(),
            shifted.oof_probabilities[i].to_bits(),
            "sample {} depends on a held-out row of its own fold",
            i
        );
    }
    assert_ne!(
        baseline.oof_probabilities[target],
        shifted.oof_probabilities[target]
    );
}

#[test]
fn test_held_out_row_isolated_with_within_fold_imputation() {
    let mut ds = create_dataset(20, 1.5, 8);
    ds.features[3][1] = None;
    let config = CvConfig {
        imputation: ImputationScope::WithinFold,
        ..quick_config()
    };
    let classifier = CrossValidatedClassifier::new(&ds, config.clone()).unwrap();
    let folds = classifier.partition().unwrap();
    let baseline = classifier.evaluate().unwrap();

    let target = *folds[0].iter().find(|&&i| i != 3).unwrap();
    let mut perturbed = ds.clone();
    perturbed.features[target] = vec![Some(-1e6), Some(1e6)];
    let shifted = CrossValidatedClassifier::new(&perturbed, config)
        .unwrap()
        .evaluate()
        .unwrap();

    for &i in folds[0].iter().filter(|&&i| i != target) {
        assert_eq!(
            baseline.oof_probabilities[i].to_bits(),
            shifted.oof_probabilities[i].to_bits()
        );
    }
}

#[test]
fn test_run_combines_evaluation_interval_and_threshold() {
    let ds = create_dataset(15, 1.0, 21);
    let config = quick_config();
    let classifier = CrossValidatedClassifier::new(&ds, config.clone()).unwrap();

    let summary = classifier.run(None).unwrap();
    let evaluation = classifier.evaluate().unwrap();

    assert_eq!(summary.evaluation, evaluation);
    assert_eq!(
        summary.interval,
        confidence_interval(
            &ds.labels,
            &evaluation.oof_probabilities,
            config.n_bootstrap,
            config.ci,
            config.seed,
        )
        .unwrap()
    );
    assert_eq!(
        summary.operating_point,
        optimal_threshold(&ds.labels, &evaluation.oof_probabilities).unwrap()
    );
}
