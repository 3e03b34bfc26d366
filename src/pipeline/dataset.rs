//! In-memory sample table consumed by the classifier

use super::error::{CvError, CvResult};
use super::imputation::validate_feature_rows;

/// One row per participant: identifier, group, raw features and binary label.
///
/// Feature cells are `None` when the source value was missing; they are
/// imputed later according to the configured `ImputationScope`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub ids: Vec<String>,
    pub groups: Vec<String>,
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<Option<f64>>>,
    pub labels: Vec<u8>,
}

impl Dataset {
    /// Build a dataset, rejecting mismatched lengths, non-binary labels and
    /// rows without any measurable feature.
    pub fn new(
        ids: Vec<String>,
        groups: Vec<String>,
        feature_names: Vec<String>,
        features: Vec<Vec<Option<f64>>>,
        labels: Vec<u8>,
    ) -> CvResult<Self> {
        let n = ids.len();
        if groups.len() != n || features.len() != n || labels.len() != n {
            return Err(CvError::data(format!(
                "column lengths differ: {} ids, {} groups, {} feature rows, {} labels",
                n,
                groups.len(),
                features.len(),
                labels.len()
            )));
        }
        if let Some(pos) = labels.iter().position(|&l| l > 1) {
            return Err(CvError::data(format!(
                "label for {} must be 0 or 1, got {}",
                ids[pos], labels[pos]
            )));
        }

        validate_feature_rows(&ids, &features)?;

        if let Some(row) = features.first() {
            if row.len() != feature_names.len() {
                return Err(CvError::data(format!(
                    "{} feature names for {} feature columns",
                    feature_names.len(),
                    row.len()
                )));
            }
        }

        Ok(Self {
            ids,
            groups,
            feature_names,
            features,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Number of (positive, negative) samples
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        (positives, self.labels.len() - positives)
    }
}
