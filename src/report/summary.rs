//! Terminal summary of an evaluation run

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CvSummary, TargetMapping};

use super::text_report::{format_threshold, manuscript_values, percent};

/// Colour an AUC by conventional discrimination bands
fn auc_color(auc: f64) -> Color {
    if auc >= 0.8 {
        Color::Green
    } else if auc >= 0.7 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Build the metric/value table shown after a run
pub fn summary_table(summary: &CvSummary, n_events: usize, n_non_events: usize, mapping: &TargetMapping) -> Table {
    let eval = &summary.evaluation;
    let ci = &summary.interval;
    let op = &summary.operating_point;
    let (fold_mean, fold_std) = eval.fold_auc_mean_std();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new(format!("👥 {}", mapping.non_event_value)),
        Cell::new(n_non_events),
    ]);
    table.add_row(vec![
        Cell::new(format!("👥 {}", mapping.event_value)),
        Cell::new(n_events),
    ]);
    table.add_row(vec![
        Cell::new("📈 Cross-validated AUC"),
        Cell::new(format!("{:.4}", eval.auc))
            .fg(auc_color(eval.auc))
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(format!("📏 {}% CI", ci.level)),
        Cell::new(format!("{:.2}–{:.2}", ci.lower, ci.upper)),
    ]);
    table.add_row(vec![
        Cell::new("🔁 Mean fold AUC"),
        Cell::new(format!("{:.4} ± {:.4}", fold_mean, fold_std)),
    ]);
    table.add_row(vec![
        Cell::new("🎯 Youden threshold"),
        Cell::new(format_threshold(op.threshold)),
    ]);
    table.add_row(vec![
        Cell::new("✅ Sensitivity"),
        Cell::new(percent(op.sensitivity, 1)),
    ]);
    table.add_row(vec![
        Cell::new("✅ Specificity"),
        Cell::new(percent(op.specificity, 1)),
    ]);

    if ci.skipped_resamples > 0 || eval.insufficient_folds > 0 {
        table.add_row(vec![
            Cell::new("⚠️  Skipped (single class)"),
            Cell::new(format!(
                "{} resample(s), {} fold(s)",
                ci.skipped_resamples, eval.insufficient_folds
            ))
            .fg(Color::Yellow),
        ]);
    }

    table
}

/// Print the summary table and the manuscript placeholders
pub fn display_summary(summary: &CvSummary, n_events: usize, n_non_events: usize, mapping: &TargetMapping) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("EVALUATION SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let table = summary_table(summary, n_events, n_non_events, mapping);

    // Indent the table
    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    println!();
    println!(
        "    {} {}",
        style("📝").cyan(),
        style("MANUSCRIPT VALUES").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    for (placeholder, value) in manuscript_values(summary, mapping) {
        println!("      {} = {}", style(placeholder).yellow(), value);
    }
}
