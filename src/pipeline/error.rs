//! Error types for the cross-validated evaluation.
//!
//! Library operations return `CvError`; the loading and CLI layers wrap it in
//! `anyhow::Error` with file context.

use thiserror::Error;

/// Errors raised by partitioning, model fitting and ROC statistics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CvError {
    /// Requested settings are incompatible with the data (e.g. more folds
    /// than members of the smallest class).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input rows or vectors are malformed or carry no usable values.
    #[error("data error: {0}")]
    Data(String),

    /// AUC is undefined because only one class is present in the subset.
    #[error("insufficient variation: {0}")]
    InsufficientVariation(String),

    /// The logistic fit failed numerically.
    #[error("model error: {0}")]
    Model(String),
}

impl CvError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        CvError::Configuration(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        CvError::Data(msg.into())
    }

    pub fn insufficient_variation(msg: impl Into<String>) -> Self {
        CvError::InsufficientVariation(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        CvError::Model(msg.into())
    }
}

pub type CvResult<T> = std::result::Result<T, CvError>;
