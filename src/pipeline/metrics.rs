//! ROC statistics: AUC, ROC curve and Youden-optimal operating point

use serde::Serialize;

use super::error::{CvError, CvResult};

/// A single point of the ROC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RocPoint {
    /// False positive rate (1 - specificity)
    pub fpr: f64,
    /// True positive rate (sensitivity)
    pub tpr: f64,
    /// Scores greater than or equal to this value are classified positive
    pub threshold: f64,
}

/// Operating point selected by maximizing the Youden index
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingPoint {
    pub threshold: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub youden_index: f64,
}

/// Check that labels and scores line up and that labels are binary 0/1.
///
/// Returns the (positive, negative) class counts.
pub fn validate_scored_labels(labels: &[u8], scores: &[f64]) -> CvResult<(usize, usize)> {
    if labels.len() != scores.len() {
        return Err(CvError::data(format!(
            "label vector has {} entries but score vector has {}",
            labels.len(),
            scores.len()
        )));
    }

    if let Some(bad) = labels.iter().find(|&&l| l > 1) {
        return Err(CvError::data(format!(
            "labels must be binary 0/1, found {}",
            bad
        )));
    }

    if let Some(pos) = scores.iter().position(|s| !s.is_finite()) {
        return Err(CvError::data(format!(
            "score at index {} is not finite ({})",
            pos, scores[pos]
        )));
    }

    let positives = labels.iter().filter(|&&l| l == 1).count();
    Ok((positives, labels.len() - positives))
}

/// Area under the ROC curve via the Mann-Whitney U statistic.
///
/// Tied scores between a positive and a negative sample contribute 0.5.
/// Returns `InsufficientVariation` when only one class is present.
pub fn roc_auc(labels: &[u8], scores: &[f64]) -> CvResult<f64> {
    let (n_pos, n_neg) = validate_scored_labels(labels, scores)?;
    if n_pos == 0 || n_neg == 0 {
        return Err(CvError::insufficient_variation(format!(
            "AUC undefined with {} positive and {} negative samples",
            n_pos, n_neg
        )));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let n = order.len();
    let mut rank_sum_pos = 0.0;
    let mut i = 0;

    while i < n {
        let current = scores[order[i]];
        let mut j = i;

        // Tie group shares the average of ranks i+1..=j
        while j < n && scores[order[j]] == current {
            j += 1;
        }

        let avg_rank = (i + 1 + j) as f64 / 2.0;
        let group_pos = order[i..j].iter().filter(|&&idx| labels[idx] == 1).count();
        rank_sum_pos += avg_rank * group_pos as f64;

        i = j;
    }

    let n_pos_f = n_pos as f64;
    let u = rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0;

    Ok(u / (n_pos_f * n_neg as f64))
}

/// ROC curve from sweeping every distinct score as a threshold, descending.
///
/// The first point is `(0, 0)` at an infinite threshold.
pub fn roc_curve(labels: &[u8], scores: &[f64]) -> CvResult<Vec<RocPoint>> {
    let (n_pos, n_neg) = validate_scored_labels(labels, scores)?;
    if n_pos == 0 || n_neg == 0 {
        return Err(CvError::insufficient_variation(format!(
            "ROC curve undefined with {} positive and {} negative samples",
            n_pos, n_neg
        )));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut points = Vec::with_capacity(order.len() + 1);
    points.push(RocPoint {
        fpr: 0.0,
        tpr: 0.0,
        threshold: f64::INFINITY,
    });

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;

    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if labels[order[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }

        points.push(RocPoint {
            fpr: fp as f64 / n_neg as f64,
            tpr: tp as f64 / n_pos as f64,
            threshold,
        });
    }

    Ok(points)
}

/// Select the threshold maximizing `tpr - fpr`.
///
/// Ties go to the first point in descending-score order.
pub fn optimal_threshold(labels: &[u8], scores: &[f64]) -> CvResult<OperatingPoint> {
    let curve = roc_curve(labels, scores)?;

    let mut best = curve[0];
    let mut best_youden = best.tpr - best.fpr;
    for point in curve.iter().skip(1) {
        let youden = point.tpr - point.fpr;
        if youden > best_youden {
            best = *point;
            best_youden = youden;
        }
    }

    Ok(OperatingPoint {
        threshold: best.threshold,
        sensitivity: best.tpr,
        specificity: 1.0 - best.fpr,
        youden_index: best_youden,
    })
}

/// Mean and population standard deviation of a slice (0, 0 when empty)
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
