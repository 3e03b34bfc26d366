//! L2-penalised binary logistic regression
//!
//! Fit by Newton-Raphson on the penalised negative log-likelihood with an
//! unpenalised intercept. Each Newton system is solved through a Cholesky
//! factorisation of the (positive definite) penalised Hessian.

use faer::prelude::*;
use faer::{Mat, Side};
use serde::Serialize;

use super::error::{CvError, CvResult};

/// Diagonal jitter keeping the intercept block positive definite
const HESSIAN_JITTER: f64 = 1e-10;

/// Maximum number of step halvings per Newton iteration
const MAX_STEP_HALVINGS: usize = 30;

/// Settings for the logistic fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogisticConfig {
    /// Inverse regularisation strength; the penalty is `||w||² / (2C)`
    pub c: f64,
    /// Maximum Newton iterations
    pub max_iter: usize,
    /// Convergence tolerance on the largest coefficient update
    pub tolerance: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tolerance: 1e-8,
        }
    }
}

/// Fitted logistic model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

#[inline]
fn sigmoid(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + exp(eta))` without overflow
#[inline]
fn log1p_exp(eta: f64) -> f64 {
    if eta > 0.0 {
        eta + (-eta).exp().ln_1p()
    } else {
        eta.exp().ln_1p()
    }
}

fn linear_predictor(beta: &[f64], row: &[f64]) -> f64 {
    beta[0] + row.iter().zip(&beta[1..]).map(|(x, b)| x * b).sum::<f64>()
}

fn penalised_objective(beta: &[f64], rows: &[Vec<f64>], labels: &[u8], lambda: f64) -> f64 {
    let nll: f64 = rows
        .iter()
        .zip(labels)
        .map(|(row, &y)| {
            let eta = linear_predictor(beta, row);
            log1p_exp(eta) - f64::from(y) * eta
        })
        .sum();
    let penalty: f64 = beta[1..].iter().map(|b| b * b).sum();
    nll + 0.5 * lambda * penalty
}

impl LogisticModel {
    /// Fit on standardized rows and 0/1 labels.
    ///
    /// Reaching `max_iter` keeps the last iterate and logs a warning;
    /// non-finite coefficients or a failed factorisation is a `Model` error.
    pub fn fit(rows: &[Vec<f64>], labels: &[u8], config: &LogisticConfig) -> CvResult<Self> {
        if rows.is_empty() {
            return Err(CvError::data("cannot fit a logistic model on zero rows"));
        }
        if rows.len() != labels.len() {
            return Err(CvError::data(format!(
                "{} training rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if !(config.c > 0.0 && config.c.is_finite()) {
            return Err(CvError::configuration(format!(
                "regularisation strength C must be positive, got {}",
                config.c
            )));
        }

        let n_features = rows[0].len();
        let dim = n_features + 1;
        let lambda = 1.0 / config.c;

        let mut beta = vec![0.0; dim];
        let mut objective = penalised_objective(&beta, rows, labels, lambda);
        let mut converged = false;
        let mut iterations = 0;

        while iterations < config.max_iter {
            iterations += 1;

            let mut gradient = Mat::<f64>::zeros(dim, 1);
            let mut hessian = Mat::<f64>::zeros(dim, dim);

            for (row, &y) in rows.iter().zip(labels) {
                let mu = sigmoid(linear_predictor(&beta, row));
                let residual = mu - f64::from(y);
                let w = mu * (1.0 - mu);

                for a in 0..dim {
                    let xa = if a == 0 { 1.0 } else { row[a - 1] };
                    gradient[(a, 0)] += residual * xa;
                    for b in 0..=a {
                        let xb = if b == 0 { 1.0 } else { row[b - 1] };
                        hessian[(a, b)] += w * xa * xb;
                    }
                }
            }

            for a in 0..dim {
                if a > 0 {
                    gradient[(a, 0)] += lambda * beta[a];
                    hessian[(a, a)] += lambda;
                }
                hessian[(a, a)] += HESSIAN_JITTER;
                for b in 0..a {
                    hessian[(b, a)] = hessian[(a, b)];
                }
            }

            let llt = hessian.cholesky(Side::Lower).map_err(|_| {
                CvError::model(format!(
                    "penalised Hessian is not positive definite at iteration {}",
                    iterations
                ))
            })?;
            let step = llt.solve(&gradient);

            let mut scale = 1.0;
            let mut trial: Vec<f64> = (0..dim).map(|j| beta[j] - step[(j, 0)]).collect();
            let mut trial_objective = penalised_objective(&trial, rows, labels, lambda);
            let mut halvings = 0;

            while !(trial_objective.is_finite() && trial_objective <= objective + 1e-12)
                && halvings < MAX_STEP_HALVINGS
            {
                scale *= 0.5;
                halvings += 1;
                trial = (0..dim).map(|j| beta[j] - scale * step[(j, 0)]).collect();
                trial_objective = penalised_objective(&trial, rows, labels, lambda);
            }

            if !trial.iter().all(|b| b.is_finite()) {
                log::error!("Non-finite coefficients at iteration {iterations}: {trial:?}");
                return Err(CvError::model(format!(
                    "non-finite coefficients at iteration {}",
                    iterations
                )));
            }

            let max_change = (0..dim)
                .map(|j| (scale * step[(j, 0)]).abs())
                .fold(0.0, f64::max);

            log::debug!(
                "Newton iter #{}: objective {:.8e} -> {:.8e}, max change {:.3e}, halvings {}",
                iterations,
                objective,
                trial_objective,
                max_change,
                halvings
            );

            beta = trial;
            objective = trial_objective;

            if max_change < config.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "Logistic fit stopped after {} iterations without reaching tolerance {:.1e}",
                iterations,
                config.tolerance
            );
        }

        Ok(Self {
            intercept: beta[0],
            coefficients: beta[1..].to_vec(),
            iterations,
            converged,
        })
    }

    /// Probability of the positive class for each row
    pub fn predict_proba(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter()
            .map(|row| {
                let eta = self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, b)| x * b)
                        .sum::<f64>();
                sigmoid(eta)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_symmetry() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
        assert!((sigmoid(3.0) + sigmoid(-3.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
    }

    #[test]
    fn test_log1p_exp_large_inputs() {
        assert!((log1p_exp(800.0) - 800.0).abs() < 1e-9);
        assert!(log1p_exp(-800.0) >= 0.0);
    }

    #[test]
    fn test_fit_learns_positive_slope() {
        let rows: Vec<Vec<f64>> = [-2.0, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5, 2.0]
            .iter()
            .map(|&x| vec![x])
            .collect();
        let labels = [0, 0, 0, 1, 0, 1, 1, 1];
        let model = LogisticModel::fit(&rows, &labels, &LogisticConfig::default()).unwrap();

        assert!(model.converged);
        assert!(model.coefficients[0] > 0.0);
        let p = model.predict_proba(&[vec![-2.0], vec![2.0]]);
        assert!(p[0] < 0.5 && p[1] > 0.5);
    }

    #[test]
    fn test_penalty_keeps_separable_data_finite() {
        let rows = vec![vec![-1.0], vec![-0.5], vec![0.5], vec![1.0]];
        let labels = [0, 0, 1, 1];
        let model = LogisticModel::fit(&rows, &labels, &LogisticConfig::default()).unwrap();
        assert!(model.converged);
        assert!(model.coefficients[0].is_finite());
        assert!(model.intercept.abs() < 1e-6, "symmetric data, got {}", model.intercept);
    }

    #[test]
    fn test_fit_rejects_bad_c() {
        let cfg = LogisticConfig {
            c: 0.0,
            ..Default::default()
        };
        let err = LogisticModel::fit(&[vec![1.0]], &[1], &cfg).unwrap_err();
        assert!(matches!(err, CvError::Configuration(_)));
    }

    #[test]
    fn test_fit_rejects_length_mismatch() {
        let err = LogisticModel::fit(&[vec![1.0], vec![2.0]], &[1], &LogisticConfig::default())
            .unwrap_err();
        assert!(matches!(err, CvError::Data(_)));
    }
}
