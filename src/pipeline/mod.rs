//! Pipeline module - loading, cross-validation and ROC statistics

pub mod bootstrap;
pub mod cross_validation;
pub mod dataset;
pub mod error;
pub mod features;
pub mod folds;
pub mod imputation;
pub mod loader;
pub mod logistic;
pub mod metrics;
pub mod scaler;
pub mod target;

pub use bootstrap::{confidence_interval, confidence_interval_with_progress, ConfidenceInterval};
pub use cross_validation::*;
pub use dataset::Dataset;
pub use error::{CvError, CvResult};
pub use features::{assemble_features, assemble_features_from_files, write_csv, FeatureSources};
pub use folds::partition;
pub use imputation::ImputationScope;
pub use loader::*;
pub use logistic::{LogisticConfig, LogisticModel};
pub use metrics::{optimal_threshold, roc_auc, roc_curve, OperatingPoint, RocPoint};
pub use scaler::Standardizer;
pub use target::*;
