//! Mean imputation of missing feature values
//!
//! Missing cells (null or NaN) are filled with per-feature means. By default
//! the means come from the whole sample set before fold splitting, which lets
//! held-out rows influence the fill values of training rows. That leak is kept
//! for reproducibility of published results; `WithinFold` fits the means on
//! each fold's training rows instead.

use serde::Serialize;

use super::error::{CvError, CvResult};

/// Which rows the imputation means are computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImputationScope {
    /// Means over every sample, computed once before fold splitting
    #[default]
    Global,
    /// Means over each fold's training rows only
    WithinFold,
}

impl std::fmt::Display for ImputationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputationScope::Global => write!(f, "global"),
            ImputationScope::WithinFold => write!(f, "within-fold"),
        }
    }
}

impl std::str::FromStr for ImputationScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" => Ok(ImputationScope::Global),
            "within-fold" | "within_fold" | "fold" => Ok(ImputationScope::WithinFold),
            _ => Err(format!(
                "Unknown imputation scope: '{}'. Use 'global' or 'within-fold'.",
                s
            )),
        }
    }
}

fn measurable(value: &Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Reject rows with no measurable feature and rows of the wrong width.
///
/// `ids` is only used to name the offending participant.
pub fn validate_feature_rows(ids: &[String], rows: &[Vec<Option<f64>>]) -> CvResult<()> {
    let Some(width) = rows.first().map(|r| r.len()) else {
        return Err(CvError::data("feature table has no rows"));
    };
    if width == 0 {
        return Err(CvError::data("feature table has no feature columns"));
    }

    for (i, row) in rows.iter().enumerate() {
        let id = ids.get(i).map(String::as_str).unwrap_or("?");
        if row.len() != width {
            return Err(CvError::data(format!(
                "row {} ({}) has {} features, expected {}",
                i,
                id,
                row.len(),
                width
            )));
        }
        if row.iter().all(|v| measurable(v).is_none()) {
            return Err(CvError::data(format!(
                "row {} ({}) has no measurable feature values",
                i, id
            )));
        }
    }

    Ok(())
}

/// Per-feature means over the rows selected by `indices`
pub fn fit_means(rows: &[Vec<Option<f64>>], indices: &[usize]) -> CvResult<Vec<f64>> {
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut sums = vec![0.0; width];
    let mut counts = vec![0usize; width];

    for &i in indices {
        for (j, value) in rows[i].iter().enumerate() {
            if let Some(x) = measurable(value) {
                sums[j] += x;
                counts[j] += 1;
            }
        }
    }

    sums.iter()
        .zip(&counts)
        .enumerate()
        .map(|(j, (&sum, &count))| {
            if count == 0 {
                Err(CvError::data(format!(
                    "feature column {} has no measurable values to impute from",
                    j
                )))
            } else {
                Ok(sum / count as f64)
            }
        })
        .collect()
}

/// Fill missing cells of the selected rows with `means`
pub fn impute_rows(rows: &[Vec<Option<f64>>], indices: &[usize], means: &[f64]) -> Vec<Vec<f64>> {
    indices
        .iter()
        .map(|&i| {
            rows[i]
                .iter()
                .zip(means)
                .map(|(value, &mean)| measurable(value).unwrap_or(mean))
                .collect()
        })
        .collect()
}

/// Number of missing cells per feature column
pub fn count_missing(rows: &[Vec<Option<f64>>]) -> Vec<usize> {
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut counts = vec![0usize; width];
    for row in rows {
        for (j, value) in row.iter().enumerate() {
            if measurable(value).is_none() {
                counts[j] += 1;
            }
        }
    }
    counts
}
