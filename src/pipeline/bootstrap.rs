//! Bootstrap percentile confidence interval for the AUC

use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use super::error::{CvError, CvResult};
use super::metrics::{roc_auc, validate_scored_labels};

/// Percentile interval estimated from bootstrap replicates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Confidence level in percent (e.g. 95.0)
    pub level: f64,
    /// Replicates that produced an AUC
    pub valid_resamples: usize,
    /// Replicates discarded because they drew a single class
    pub skipped_resamples: usize,
}

/// Percentile with linear interpolation between order statistics.
///
/// `sorted` must be ascending and non-empty; `q` is in percent.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = (q / 100.0).clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Bootstrap confidence interval for the AUC of `(labels, scores)`.
///
/// Draws `n_resamples` index vectors with replacement, each the size of the
/// input. A master `StdRng` seeded with `seed` emits one seed per replicate so
/// replicates can run on any number of threads with identical results. Draws
/// containing a single class are skipped and counted.
///
/// # Errors
/// `Configuration` for `n_resamples == 0` or a level outside (0, 100);
/// `InsufficientVariation` when fewer than two draws yield an AUC.
pub fn confidence_interval(
    labels: &[u8],
    scores: &[f64],
    n_resamples: usize,
    level: f64,
    seed: u64,
) -> CvResult<ConfidenceInterval> {
    confidence_interval_with_progress(labels, scores, n_resamples, level, seed, None)
}

/// `confidence_interval` that advances `progress` as replicates complete
pub fn confidence_interval_with_progress(
    labels: &[u8],
    scores: &[f64],
    n_resamples: usize,
    level: f64,
    seed: u64,
    progress: Option<&ProgressBar>,
) -> CvResult<ConfidenceInterval> {
    if n_resamples == 0 {
        return Err(CvError::configuration("bootstrap needs at least one resample"));
    }
    if !(level > 0.0 && level < 100.0) {
        return Err(CvError::configuration(format!(
            "confidence level must lie strictly between 0 and 100, got {}",
            level
        )));
    }
    validate_scored_labels(labels, scores)?;
    if labels.is_empty() {
        return Err(CvError::data("cannot bootstrap an empty sample"));
    }

    let n = labels.len();
    let mut master = StdRng::seed_from_u64(seed);
    let replicate_seeds: Vec<u64> = (0..n_resamples).map(|_| master.gen()).collect();

    let replicates: Vec<Option<f64>> = replicate_seeds
        .par_iter()
        .map(|&replicate_seed| {
            let mut rng = StdRng::seed_from_u64(replicate_seed);
            let mut y = Vec::with_capacity(n);
            let mut p = Vec::with_capacity(n);
            for _ in 0..n {
                let idx = rng.gen_range(0..n);
                y.push(labels[idx]);
                p.push(scores[idx]);
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }

            roc_auc(&y, &p).ok()
        })
        .collect();

    let mut aucs: Vec<f64> = replicates.iter().flatten().copied().collect();
    let skipped = n_resamples - aucs.len();

    if skipped > 0 {
        log::debug!(
            "Skipped {} of {} bootstrap draws with a single class",
            skipped,
            n_resamples
        );
    }

    if aucs.len() < 2 {
        return Err(CvError::insufficient_variation(format!(
            "only {} of {} bootstrap draws contained both classes",
            aucs.len(),
            n_resamples
        )));
    }

    aucs.sort_by(|a, b| a.total_cmp(b));
    let alpha = (100.0 - level) / 2.0;

    Ok(ConfidenceInterval {
        lower: percentile(&aucs, alpha),
        upper: percentile(&aucs, 100.0 - alpha),
        level,
        valid_resamples: aucs.len(),
        skipped_resamples: skipped,
    })
}
