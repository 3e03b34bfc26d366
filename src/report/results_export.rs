//! Out-of-fold predictions table

use std::path::Path;

use anyhow::Result;
use polars::prelude::*;

use crate::pipeline::{write_csv, Dataset};

/// Build the per-participant results table:
/// `ParticipantID, True_Label, Predicted_Probability, Group`
pub fn results_frame(dataset: &Dataset, probabilities: &[f64]) -> Result<DataFrame> {
    if probabilities.len() != dataset.len() {
        anyhow::bail!(
            "{} predictions for {} participants",
            probabilities.len(),
            dataset.len()
        );
    }

    let labels: Vec<i32> = dataset.labels.iter().map(|&l| i32::from(l)).collect();

    let df = DataFrame::new(vec![
        Column::new("ParticipantID".into(), dataset.ids.clone()),
        Column::new("True_Label".into(), labels),
        Column::new("Predicted_Probability".into(), probabilities.to_vec()),
        Column::new("Group".into(), dataset.groups.clone()),
    ])?;

    Ok(df)
}

/// Write the results table as CSV
pub fn export_results(dataset: &Dataset, probabilities: &[f64], path: &Path) -> Result<()> {
    let mut df = results_frame(dataset, probabilities)?;
    write_csv(&mut df, path)
}
