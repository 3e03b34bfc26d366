//! Tests for the results table, text report and JSON export

use chrono::NaiveDate;
use cvroc::pipeline::*;
use cvroc::report::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn run_summary(ds: &Dataset, config: &CvConfig) -> CvSummary {
    CrossValidatedClassifier::new(ds, config.clone())
        .unwrap()
        .run(None)
        .unwrap()
}

fn quick_config() -> CvConfig {
    CvConfig {
        folds: 5,
        n_bootstrap: 100,
        ..Default::default()
    }
}

#[test]
fn test_results_frame_layout() {
    let ds = create_dataset(10, 2.0, 1);
    let summary = run_summary(&ds, &quick_config());

    let df = results_frame(&ds, &summary.evaluation.oof_probabilities).unwrap();
    assert_eq!(df.height(), ds.len());
    assert_has_columns(
        &df,
        &["ParticipantID", "True_Label", "Predicted_Probability", "Group"],
    );
    assert_eq!(df.get_column_names()[0].as_str(), "ParticipantID");
}

#[test]
fn test_results_frame_rejects_length_mismatch() {
    let ds = create_dataset(10, 2.0, 1);
    assert!(results_frame(&ds, &[0.5; 3]).is_err());
}

#[test]
fn test_text_report_sections() {
    let ds = create_dataset(10, 2.0, 1);
    let config = quick_config();
    let summary = run_summary(&ds, &config);
    let mapping = TargetMapping::default();

    let ctx = ReportContext {
        analysis_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        dataset: &ds,
        mapping: &mapping,
        config: &config,
        summary: &summary,
    };
    let report = render_text_report(&ctx).unwrap();

    assert!(report.contains("MCI vs Control - Cross-Validated ROC Analysis Report"));
    assert!(report.contains("Analysis Date: 2025-03-14"));
    assert!(report.contains("5-Fold Stratified Cross-Validation"));
    assert!(report.contains("Fold  5:"));
    assert!(report.contains("[CV_AUC_MCI] = "));
    assert!(report.contains("[Sens_MCI] = "));
    assert!(report.contains("Total: 20 participants"));
    assert!(report.contains("1. signal"));
}

#[test]
fn test_write_text_report_matches_rendered_text() {
    let ds = create_dataset(10, 2.0, 1);
    let config = quick_config();
    let summary = run_summary(&ds, &config);
    let mapping = TargetMapping::default();
    let ctx = ReportContext {
        analysis_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        dataset: &ds,
        mapping: &mapping,
        config: &config,
        summary: &summary,
    };
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");

    write_text_report(&ctx, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_text_report(&ctx).unwrap());
    assert!(written.trim_end().ends_with("at the optimal threshold.\""));
}

#[test]
fn test_manuscript_values_formatting() {
    let ds = create_dataset(10, 2.0, 1);
    let summary = run_summary(&ds, &quick_config());
    let values = manuscript_values(&summary, &TargetMapping::default());

    assert_eq!(values.len(), 4);
    assert_eq!(values[0].1, format!("{:.2}", summary.evaluation.auc));
    assert!(values[2].1.ends_with('%'));
}

#[test]
fn test_threshold_formatting() {
    assert_eq!(format_threshold(f64::INFINITY), "inf");
    assert_eq!(format_threshold(0.123456), "0.1235");
    assert_eq!(percent(0.8125, 1), "81.2%");
}

#[test]
fn test_json_export_contents() {
    let ds = create_dataset(10, 2.0, 1);
    let config = quick_config();
    let summary = run_summary(&ds, &config);
    let mapping = TargetMapping::default();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("summary.json");

    let params = ExportParams {
        input_file: "samples.csv",
        mapping: &mapping,
        config: &config,
        ignored_rows: 3,
    };
    export_evaluation_json(&ds, &summary, &path, &params).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["samples"]["events"], 10);
    assert_eq!(json["samples"]["ignored"], 3);
    assert_eq!(json["metadata"]["config"]["folds"], 5);
    assert_eq!(json["metadata"]["config"]["imputation"], "global");
    assert_eq!(json["folds"].as_array().unwrap().len(), 5);
    assert!(json["auc"].as_f64().is_some());
}

#[test]
fn test_summary_table_mentions_groups() {
    let ds = create_dataset(10, 2.0, 1);
    let summary = run_summary(&ds, &quick_config());
    let table = summary_table(&summary, 10, 10, &TargetMapping::default()).to_string();

    assert!(table.contains("MCI"));
    assert!(table.contains("Control"));
}
