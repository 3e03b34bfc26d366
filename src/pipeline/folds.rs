//! Stratified K-fold partitioning

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::{CvError, CvResult};

/// Split sample indices into `k` folds stratified by label.
///
/// Each class is shuffled with a `StdRng` seeded from `seed` and dealt
/// round-robin into the folds. The round-robin offset carries over from one
/// class to the next, so fold sizes differ by at most one and each fold holds
/// `floor` or `ceil` of `class_count / k` members of every class.
///
/// Returned folds hold sorted indices.
///
/// # Errors
/// `Configuration` when `k < 2` or any class has fewer than `k` members,
/// `Data` when a label is not 0/1.
pub fn partition(labels: &[u8], k: usize, seed: u64) -> CvResult<Vec<Vec<usize>>> {
    if k < 2 {
        return Err(CvError::configuration(format!(
            "fold count must be at least 2, got {}",
            k
        )));
    }

    let mut by_class: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (idx, &label) in labels.iter().enumerate() {
        match label {
            0 | 1 => by_class[label as usize].push(idx),
            other => {
                return Err(CvError::data(format!(
                    "label at index {} must be 0 or 1, got {}",
                    idx, other
                )))
            }
        }
    }

    for (class, members) in by_class.iter().enumerate() {
        if members.len() < k {
            return Err(CvError::configuration(format!(
                "cannot split into {} folds: class {} has only {} member(s)",
                k,
                class,
                members.len()
            )));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut folds: Vec<Vec<usize>> = vec![Vec::new(); k];
    let mut offset = 0usize;

    for members in by_class.iter_mut() {
        members.shuffle(&mut rng);
        for (i, &idx) in members.iter().enumerate() {
            folds[(offset + i) % k].push(idx);
        }
        offset = (offset + members.len()) % k;
    }

    for fold in folds.iter_mut() {
        fold.sort_unstable();
    }

    Ok(folds)
}

/// Indices of every fold except `held_out`, sorted ascending
pub fn training_indices(folds: &[Vec<usize>], held_out: usize) -> Vec<usize> {
    let mut train: Vec<usize> = folds
        .iter()
        .enumerate()
        .filter(|(f, _)| *f != held_out)
        .flat_map(|(_, fold)| fold.iter().copied())
        .collect();
    train.sort_unstable();
    train
}
