//! cvroc: Cross-validated ROC CLI Tool
//!
//! Evaluates how well eye-tracking features separate two participant groups
//! using stratified K-fold logistic regression and bootstrap AUC intervals.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use console::style;

use cvroc::cli::{self, Cli, Commands};
use cvroc::pipeline::{load_samples, CrossValidatedClassifier};
use cvroc::report::{
    display_summary, export_evaluation_json, export_results, write_text_report, ExportParams,
    ReportContext,
};
use cvroc::utils::{
    create_progress_bar, create_spinner, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning,
};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Features {
                participants,
                roi_summary,
                events,
                output,
                groups,
            } => cli::features::run_features(
                participants,
                roi_summary,
                events,
                output.as_deref(),
                groups,
            ),
        };
    }

    // Main evaluation pipeline - require input
    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;

    let results_path = cli
        .results_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive a results path from the input"))?;
    let report_path = cli
        .report_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive a report path from the input"))?;
    let json_path = cli
        .json_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive a JSON path from the input"))?;

    let mapping = cli.mapping();
    let config = cli.cv_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, &mapping, &results_path, &config);

    // Step 1: Load samples
    print_step_header(1, "Load Samples");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading samples table...");
    let loaded = load_samples(input, &cli.load_options())?;
    finish_with_success(&spinner, "Samples loaded");

    let dataset = &loaded.dataset;
    let (n_events, n_non_events) = dataset.class_counts();
    println!("\n    {} Sample Statistics:", style("✧").cyan());
    println!("      Rows read: {}", loaded.total_rows);
    println!("      {}: {}", mapping.event_value, n_events);
    println!("      {}: {}", mapping.non_event_value, n_non_events);
    println!(
        "      Features ({}): {}",
        dataset.n_features(),
        dataset.feature_names.join(", ")
    );
    if loaded.ignored_rows > 0 {
        print_count(
            "row(s) outside the compared groups",
            loaded.ignored_rows,
            Some("(ignored)"),
        );
    }
    print_step_time(step_start.elapsed());

    // Step 2: Cross-validation, bootstrap interval and operating point
    print_step_header(2, "Stratified Cross-Validation");
    let step_start = Instant::now();
    let classifier = CrossValidatedClassifier::new(dataset, config.clone())?;
    println!();
    let progress = create_progress_bar(
        config.n_bootstrap as u64,
        &format!("{} folds, resampling", config.folds),
    );
    let summary = classifier.run(Some(&progress))?;
    let evaluation = &summary.evaluation;
    let interval = &summary.interval;
    if interval.skipped_resamples > 0 {
        finish_with_warning(
            &progress,
            &format!(
                "{} single-class resample(s) skipped",
                interval.skipped_resamples
            ),
        );
    } else {
        finish_with_success(&progress, "Cross-validation and bootstrap complete");
    }

    for fold in &evaluation.folds {
        let auc = fold
            .auc
            .map(|a| format!("{:.3}", a))
            .unwrap_or_else(|| "n/a (single class)".to_string());
        println!(
            "      Fold {:>2}: train={:<4} test={:<4} AUC={}",
            fold.fold, fold.train_size, fold.test_size, auc
        );
        if !fold.converged {
            print_warning(&format!(
                "Fold {} stopped after {} iterations without converging",
                fold.fold, fold.iterations
            ));
        }
    }
    if evaluation.insufficient_folds > 0 {
        print_count(
            "fold(s) with a single class",
            evaluation.insufficient_folds,
            Some("(excluded from fold mean)"),
        );
    }
    print_success(&format!("Out-of-fold AUC: {:.3}", evaluation.auc));
    print_success(&format!(
        "{}% CI: {:.3} - {:.3}",
        interval.level, interval.lower, interval.upper
    ));
    print_step_time(step_start.elapsed());

    // Step 3: Operating point
    print_step_header(3, "Youden Operating Point");
    let operating_point = &summary.operating_point;
    print_info(&format!(
        "Threshold {:.4}: sensitivity {:.1}%, specificity {:.1}%",
        operating_point.threshold,
        operating_point.sensitivity * 100.0,
        operating_point.specificity * 100.0
    ));

    // Step 4: Save outputs
    print_step_header(4, "Save Outputs");
    let outputs: Vec<PathBuf> = vec![results_path.clone(), report_path.clone(), json_path.clone()];
    if !cli.no_confirm && !cli::confirm_overwrite(&outputs)? {
        print_warning("Outputs not written (cancelled by user)");
        display_summary(&summary, n_events, n_non_events, &mapping);
        return Ok(());
    }

    let step_start = Instant::now();
    export_results(dataset, &summary.evaluation.oof_probabilities, &results_path)?;
    print_success(&format!("Predictions saved to {}", results_path.display()));

    let context = ReportContext {
        analysis_date: Local::now().date_naive(),
        dataset,
        mapping: &mapping,
        config: &config,
        summary: &summary,
    };
    write_text_report(&context, &report_path)?;
    print_success(&format!("Report saved to {}", report_path.display()));

    let input_file = input.display().to_string();
    let params = ExportParams {
        input_file: &input_file,
        mapping: &mapping,
        config: &config,
        ignored_rows: loaded.ignored_rows,
    };
    export_evaluation_json(dataset, &summary, &json_path, &params)?;
    print_success(&format!("Summary saved to {}", json_path.display()));
    print_step_time(step_start.elapsed());

    display_summary(&summary, n_events, n_non_events, &mapping);
    print_completion();

    Ok(())
}
