//! Human-readable evaluation report with manuscript-ready values

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::pipeline::{CvConfig, CvSummary, Dataset, ImputationScope, TargetMapping};

/// Everything the text report is rendered from
pub struct ReportContext<'a> {
    pub analysis_date: NaiveDate,
    pub dataset: &'a Dataset,
    pub mapping: &'a TargetMapping,
    pub config: &'a CvConfig,
    pub summary: &'a CvSummary,
}

/// Format a proportion as a percentage, e.g. `0.8125` -> `81.2%`
pub fn percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// Format a threshold, spelling out the infinite start of the ROC curve
pub fn format_threshold(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// Placeholder/value pairs for pasting into the manuscript
pub fn manuscript_values(summary: &CvSummary, mapping: &TargetMapping) -> Vec<(String, String)> {
    let event = &mapping.event_value;
    let ci = &summary.interval;
    let op = &summary.operating_point;
    vec![
        (
            format!("[CV_AUC_{}]", event),
            format!("{:.2}", summary.evaluation.auc),
        ),
        (
            "[CI_low–CI_high]".to_string(),
            format!("{:.2}–{:.2}", ci.lower, ci.upper),
        ),
        (format!("[Sens_{}]", event), percent(op.sensitivity, 1)),
        (format!("[Spec_{}]", event), percent(op.specificity, 1)),
    ]
}

/// Render the full report
pub fn render_text_report(ctx: &ReportContext) -> Result<String, fmt::Error> {
    let rule = "=".repeat(80);
    let eval = &ctx.summary.evaluation;
    let ci = &ctx.summary.interval;
    let op = &ctx.summary.operating_point;
    let (positives, negatives) = ctx.dataset.class_counts();
    let (fold_mean, fold_std) = eval.fold_auc_mean_std();
    let event = &ctx.mapping.event_value;
    let non_event = &ctx.mapping.non_event_value;

    let mut out = String::new();

    writeln!(out, "{}", rule)?;
    writeln!(
        out,
        "{} vs {} - Cross-Validated ROC Analysis Report",
        event, non_event
    )?;
    writeln!(out, "{}\n", rule)?;
    writeln!(out, "Analysis Date: {}", ctx.analysis_date.format("%Y-%m-%d"))?;
    writeln!(
        out,
        "Method: {}-Fold Stratified Cross-Validation (seed {})",
        ctx.config.folds, ctx.config.seed
    )?;
    writeln!(
        out,
        "Standardization: Leakage-safe (within-fold, training-only fit)"
    )?;
    let imputation = match ctx.config.imputation {
        ImputationScope::Global => {
            "Mean imputation over all samples before fold splitting (minor leakage, kept for reproducibility)"
        }
        ImputationScope::WithinFold => "Mean imputation fit on training folds only",
    };
    writeln!(out, "Missing values: {}\n", imputation)?;

    writeln!(out, "Sample Size:")?;
    writeln!(out, "  {}: {} participants", non_event, negatives)?;
    writeln!(out, "  {}: {} participants", event, positives)?;
    writeln!(out, "  Total: {} participants\n", ctx.dataset.len())?;

    writeln!(out, "Features Used:")?;
    for (i, name) in ctx.dataset.feature_names.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, name)?;
    }
    writeln!(out)?;

    writeln!(out, "Cross-Validation Results:")?;
    writeln!(out, "  Cross-validated AUC: {:.4}", eval.auc)?;
    writeln!(
        out,
        "  {}% CI (Bootstrap, {} valid of {} resamples): [{:.2}–{:.2}]",
        ci.level,
        ci.valid_resamples,
        ci.valid_resamples + ci.skipped_resamples,
        ci.lower,
        ci.upper
    )?;
    writeln!(out, "  Mean Fold AUC: {:.4} ± {:.4}\n", fold_mean, fold_std)?;

    writeln!(out, "Fold-by-Fold AUCs:")?;
    for fold in &eval.folds {
        match fold.auc {
            Some(auc) => writeln!(out, "  Fold {:2}: {:.4}", fold.fold, auc)?,
            None => writeln!(out, "  Fold {:2}: n/a (single class held out)", fold.fold)?,
        }
    }
    writeln!(out)?;

    writeln!(out, "Optimal Classification Threshold (Youden Index):")?;
    writeln!(out, "  Threshold: {}", format_threshold(op.threshold))?;
    writeln!(
        out,
        "  Sensitivity: {:.4} ({})",
        op.sensitivity,
        percent(op.sensitivity, 1)
    )?;
    writeln!(
        out,
        "  Specificity: {:.4} ({})",
        op.specificity,
        percent(op.specificity, 1)
    )?;
    writeln!(out, "  Youden Index: {:.4}\n", op.youden_index)?;

    writeln!(out, "{}", rule)?;
    writeln!(out, "For Manuscript (Copy-Paste Values)")?;
    writeln!(out, "{}\n", rule)?;
    for (placeholder, value) in manuscript_values(ctx.summary, ctx.mapping) {
        writeln!(out, "{} = {}", placeholder, value)?;
    }
    writeln!(out)?;

    writeln!(out, "Example sentence for Results:")?;
    writeln!(
        out,
        "\"For {} vs {}, the cross-validated AUC was {:.2} ({}% CI {:.2}–{:.2}), with sensitivity of {} and specificity of {} at the optimal threshold.\"",
        event,
        non_event.to_lowercase(),
        eval.auc,
        ci.level,
        ci.lower,
        ci.upper,
        percent(op.sensitivity, 1),
        percent(op.specificity, 1)
    )?;

    Ok(out)
}

/// Render and write the report as UTF-8 text
pub fn write_text_report(ctx: &ReportContext, path: &Path) -> Result<()> {
    let report = render_text_report(ctx).context("Failed to render text report")?;
    std::fs::write(path, report)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
