//! JSON export of an evaluation run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    ConfidenceInterval, CvConfig, CvSummary, Dataset, FoldOutcome, OperatingPoint, TargetMapping,
};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// cvroc version
    pub cvroc_version: String,
    /// Input file path
    pub input_file: String,
    pub mapping: TargetMapping,
    pub config: CvConfig,
}

/// Sample counts after group mapping
#[derive(Serialize)]
pub struct SampleCounts {
    pub events: usize,
    pub non_events: usize,
    pub total: usize,
    /// Rows whose group matched neither side of the mapping
    pub ignored: usize,
}

/// Complete evaluation export
#[derive(Serialize)]
pub struct EvaluationExport<'a> {
    pub metadata: RunMetadata,
    pub samples: SampleCounts,
    pub features: &'a [String],
    pub auc: f64,
    pub fold_auc_mean: f64,
    pub fold_auc_std: f64,
    pub insufficient_folds: usize,
    pub folds: &'a [FoldOutcome],
    pub confidence_interval: ConfidenceInterval,
    pub operating_point: OperatingPoint,
}

/// Parameters for the JSON export
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub mapping: &'a TargetMapping,
    pub config: &'a CvConfig,
    pub ignored_rows: usize,
}

/// Assemble the export structure without writing it
pub fn build_export<'a>(
    dataset: &'a Dataset,
    summary: &'a CvSummary,
    params: &ExportParams,
) -> EvaluationExport<'a> {
    let (events, non_events) = dataset.class_counts();
    let (fold_auc_mean, fold_auc_std) = summary.evaluation.fold_auc_mean_std();

    EvaluationExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            cvroc_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            mapping: params.mapping.clone(),
            config: params.config.clone(),
        },
        samples: SampleCounts {
            events,
            non_events,
            total: dataset.len(),
            ignored: params.ignored_rows,
        },
        features: &dataset.feature_names,
        auc: summary.evaluation.auc,
        fold_auc_mean,
        fold_auc_std,
        insufficient_folds: summary.evaluation.insufficient_folds,
        folds: &summary.evaluation.folds,
        confidence_interval: summary.interval,
        operating_point: summary.operating_point,
    }
}

/// Export the evaluation to a pretty-printed JSON file
///
/// An infinite Youden threshold is written as `null`.
pub fn export_evaluation_json(
    dataset: &Dataset,
    summary: &CvSummary,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = build_export(dataset, summary, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize evaluation results to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write evaluation results to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
