//! Per-feature standardization (zero mean, unit variance)

use super::error::{CvError, CvResult};

/// Standardizer fit on a set of rows and applied to any other rows.
///
/// Uses the population standard deviation. Zero-variance features are
/// centred but not scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl Standardizer {
    /// Fit means and scales on the given rows only
    pub fn fit(rows: &[Vec<f64>]) -> CvResult<Self> {
        let first = rows
            .first()
            .ok_or_else(|| CvError::data("cannot fit a standardizer on zero rows"))?;
        let n_features = first.len();
        let n = rows.len() as f64;

        let mut means = vec![0.0; n_features];
        for row in rows {
            if row.len() != n_features {
                return Err(CvError::data(format!(
                    "row has {} features, expected {}",
                    row.len(),
                    n_features
                )));
            }
            for (m, &x) in means.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in means.iter_mut() {
            *m /= n;
        }

        let mut scales = vec![0.0; n_features];
        for row in rows {
            for ((s, &x), &m) in scales.iter_mut().zip(row).zip(&means) {
                *s += (x - m) * (x - m);
            }
        }
        for s in scales.iter_mut() {
            let std = (*s / n).sqrt();
            *s = if std > f64::EPSILON { std } else { 1.0 };
        }

        Ok(Self { means, scales })
    }

    /// Apply the fitted transform without refitting
    pub fn transform(&self, rows: &[Vec<f64>]) -> CvResult<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                if row.len() != self.means.len() {
                    return Err(CvError::data(format!(
                        "row has {} features, standardizer was fit on {}",
                        row.len(),
                        self.means.len()
                    )));
                }
                Ok(row
                    .iter()
                    .zip(&self.means)
                    .zip(&self.scales)
                    .map(|((&x, &m), &s)| (x - m) / s)
                    .collect())
            })
            .collect()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}
