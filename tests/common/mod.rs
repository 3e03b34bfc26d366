//! Shared test utilities and fixture generators
#![allow(dead_code)]

use cvroc::pipeline::Dataset;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a samples table with known characteristics for testing
///
/// This DataFrame includes:
/// - `n_per_group` Control and `n_per_group` MCI participants
/// - `VR_MMSE_total`: informative, MCI scores sit about `separation` points lower
/// - `Mean_FixTime`: pure noise
/// - `Mean_Saccade_Amplitude`: every fifth value missing
/// - two `AD` participants that fall outside the default mapping
pub fn create_samples_dataframe(n_per_group: usize, separation: f64, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ids = Vec::new();
    let mut groups = Vec::new();
    let mut mmse = Vec::new();
    let mut fix_time = Vec::new();
    let mut amplitude: Vec<Option<f64>> = Vec::new();

    for (group, shift) in [("Control", 0.0), ("MCI", -separation), ("AD", -2.0 * separation)] {
        let count = if group == "AD" { 2 } else { n_per_group };
        for i in 0..count {
            ids.push(format!("{}_{:03}", group, i));
            groups.push(group.to_string());
            mmse.push(28.0 + shift + rng.gen_range(-2.0..2.0));
            fix_time.push(rng.gen_range(200.0..400.0));
            amplitude.push(if ids.len() % 5 == 0 {
                None
            } else {
                Some(rng.gen_range(2.0..8.0))
            });
        }
    }

    DataFrame::new(vec![
        Column::new("ParticipantID".into(), ids),
        Column::new("Group".into(), groups),
        Column::new("VR_MMSE_total".into(), mmse),
        Column::new("Mean_FixTime".into(), fix_time),
        Column::new("Mean_Saccade_Amplitude".into(), amplitude),
    ])
    .unwrap()
}

/// Build a labelled dataset directly, skipping CSV round-trips
///
/// Positives are shifted by `separation` on the first feature; the second
/// feature is noise.
pub fn create_dataset(n_per_group: usize, separation: f64, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = 2 * n_per_group;
    let labels: Vec<u8> = (0..n).map(|i| (i % 2) as u8).collect();
    let ids = (0..n).map(|i| format!("p{:03}", i)).collect();
    let groups = labels
        .iter()
        .map(|&l| if l == 1 { "MCI" } else { "Control" }.to_string())
        .collect();
    let features = labels
        .iter()
        .map(|&l| {
            vec![
                Some(l as f64 * separation + rng.gen_range(-1.0..1.0)),
                Some(rng.gen_range(-1.0..1.0)),
            ]
        })
        .collect();

    Dataset::new(
        ids,
        groups,
        vec!["signal".to_string(), "noise".to_string()],
        features,
        labels,
    )
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("samples.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Write a DataFrame as CSV inside an existing directory
pub fn write_csv_in(dir: &TempDir, name: &str, df: &mut DataFrame) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}
