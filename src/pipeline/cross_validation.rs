//! Stratified K-fold evaluation of a logistic classifier
//!
//! Within every fold the standardizer and the model are fit on the training
//! rows only and then applied to the held-out rows. Held-out probabilities are
//! collected into a single out-of-fold vector from which the global AUC,
//! its bootstrap interval and the Youden operating point are computed.

use indicatif::ProgressBar;
use serde::Serialize;

use super::bootstrap::{confidence_interval_with_progress, ConfidenceInterval};
use super::dataset::Dataset;
use super::error::{CvError, CvResult};
use super::folds::{partition, training_indices};
use super::imputation::{fit_means, impute_rows, ImputationScope};
use super::logistic::{LogisticConfig, LogisticModel};
use super::metrics::{mean_and_std, optimal_threshold, roc_auc, OperatingPoint};
use super::scaler::Standardizer;

/// Run configuration for the cross-validated evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvConfig {
    /// Number of folds
    pub folds: usize,
    /// Seed for fold assignment and bootstrap resampling
    pub seed: u64,
    /// Number of bootstrap replicates
    pub n_bootstrap: usize,
    /// Confidence level in percent
    pub ci: f64,
    /// Where imputation means come from
    pub imputation: ImputationScope,
    pub logistic: LogisticConfig,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            seed: 42,
            n_bootstrap: 1000,
            ci: 95.0,
            imputation: ImputationScope::Global,
            logistic: LogisticConfig::default(),
        }
    }
}

/// Diagnostics for one held-out fold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldOutcome {
    /// 1-based fold number
    pub fold: usize,
    pub train_size: usize,
    pub test_size: usize,
    /// Local AUC, absent when the held-out fold contains a single class
    pub auc: Option<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Out-of-fold predictions and the AUC computed from them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvEvaluation {
    pub folds: Vec<FoldOutcome>,
    /// One probability per sample, in dataset order
    pub oof_probabilities: Vec<f64>,
    pub auc: f64,
    /// Folds whose local AUC was undefined
    pub insufficient_folds: usize,
}

impl CvEvaluation {
    /// Local AUCs of the folds where one was defined
    pub fn fold_aucs(&self) -> Vec<f64> {
        self.folds.iter().filter_map(|f| f.auc).collect()
    }

    /// Mean and population standard deviation of the fold AUCs
    pub fn fold_auc_mean_std(&self) -> (f64, f64) {
        mean_and_std(&self.fold_aucs())
    }
}

/// Everything a report needs from one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvSummary {
    pub evaluation: CvEvaluation,
    pub interval: ConfidenceInterval,
    pub operating_point: OperatingPoint,
}

/// Cross-validated logistic classifier over a borrowed dataset
#[derive(Debug, Clone)]
pub struct CrossValidatedClassifier<'a> {
    dataset: &'a Dataset,
    config: CvConfig,
}

impl<'a> CrossValidatedClassifier<'a> {
    /// Validate the configuration against the dataset.
    ///
    /// Fold-count compatibility with class sizes is checked by `partition`.
    pub fn new(dataset: &'a Dataset, config: CvConfig) -> CvResult<Self> {
        if dataset.is_empty() {
            return Err(CvError::data("dataset has no samples"));
        }
        if config.n_bootstrap == 0 {
            return Err(CvError::configuration("n_bootstrap must be at least 1"));
        }
        if !(config.ci > 0.0 && config.ci < 100.0) {
            return Err(CvError::configuration(format!(
                "confidence level must lie strictly between 0 and 100, got {}",
                config.ci
            )));
        }
        Ok(Self { dataset, config })
    }

    pub fn config(&self) -> &CvConfig {
        &self.config
    }

    /// Stratified fold assignment for the configured `folds` and `seed`
    pub fn partition(&self) -> CvResult<Vec<Vec<usize>>> {
        partition(&self.dataset.labels, self.config.folds, self.config.seed)
    }

    /// Run every fold and aggregate the out-of-fold predictions.
    pub fn evaluate(&self) -> CvResult<CvEvaluation> {
        let ds = self.dataset;
        let n = ds.len();
        let folds = self.partition()?;

        let global = match self.config.imputation {
            ImputationScope::Global => {
                let all: Vec<usize> = (0..n).collect();
                let means = fit_means(&ds.features, &all)?;
                log::info!(
                    "Imputing missing values with means over all {} samples before fold splitting",
                    n
                );
                Some(impute_rows(&ds.features, &all, &means))
            }
            ImputationScope::WithinFold => None,
        };

        let mut slots: Vec<Option<f64>> = vec![None; n];
        let mut outcomes = Vec::with_capacity(folds.len());
        let mut insufficient_folds = 0;

        for (f, test_idx) in folds.iter().enumerate() {
            let train_idx = training_indices(&folds, f);

            let (x_train, x_test) = match &global {
                Some(filled) => (
                    train_idx.iter().map(|&i| filled[i].clone()).collect::<Vec<_>>(),
                    test_idx.iter().map(|&i| filled[i].clone()).collect::<Vec<_>>(),
                ),
                None => {
                    let means = fit_means(&ds.features, &train_idx)?;
                    (
                        impute_rows(&ds.features, &train_idx, &means),
                        impute_rows(&ds.features, test_idx, &means),
                    )
                }
            };

            let scaler = Standardizer::fit(&x_train)?;
            let z_train = scaler.transform(&x_train)?;
            let z_test = scaler.transform(&x_test)?;

            let y_train: Vec<u8> = train_idx.iter().map(|&i| ds.labels[i]).collect();
            let y_test: Vec<u8> = test_idx.iter().map(|&i| ds.labels[i]).collect();

            let model = LogisticModel::fit(&z_train, &y_train, &self.config.logistic)?;
            let probabilities = model.predict_proba(&z_test);

            for (&idx, &p) in test_idx.iter().zip(&probabilities) {
                if slots[idx].replace(p).is_some() {
                    return Err(CvError::data(format!(
                        "sample {} was held out by more than one fold",
                        ds.ids[idx]
                    )));
                }
            }

            let auc = match roc_auc(&y_test, &probabilities) {
                Ok(auc) => Some(auc),
                Err(CvError::InsufficientVariation(msg)) => {
                    log::warn!("Fold {} has no local AUC: {}", f + 1, msg);
                    insufficient_folds += 1;
                    None
                }
                Err(e) => return Err(e),
            };

            log::debug!(
                "Fold {:2}: train={}, test={}, auc={:?}, newton iterations={}",
                f + 1,
                train_idx.len(),
                test_idx.len(),
                auc,
                model.iterations
            );

            outcomes.push(FoldOutcome {
                fold: f + 1,
                train_size: train_idx.len(),
                test_size: test_idx.len(),
                auc,
                iterations: model.iterations,
                converged: model.converged,
            });
        }

        let oof_probabilities: Vec<f64> = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| {
                    CvError::data(format!(
                        "sample {} received no out-of-fold prediction",
                        ds.ids[i]
                    ))
                })
            })
            .collect::<CvResult<_>>()?;

        let auc = roc_auc(&ds.labels, &oof_probabilities)?;

        Ok(CvEvaluation {
            folds: outcomes,
            oof_probabilities,
            auc,
            insufficient_folds,
        })
    }

    /// Evaluate, then bootstrap the interval and pick the operating point
    pub fn run(&self, progress: Option<&ProgressBar>) -> CvResult<CvSummary> {
        let evaluation = self.evaluate()?;

        let interval = confidence_interval_with_progress(
            &self.dataset.labels,
            &evaluation.oof_probabilities,
            self.config.n_bootstrap,
            self.config.ci,
            self.config.seed,
            progress,
        )?;

        let operating_point = optimal_threshold(&self.dataset.labels, &evaluation.oof_probabilities)?;

        Ok(CvSummary {
            evaluation,
            interval,
            operating_point,
        })
    }
}
