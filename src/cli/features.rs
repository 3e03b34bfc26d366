//! `features` subcommand: build the samples table from long-format exports

use std::path::Path;

use anyhow::Result;
use console::style;

use crate::pipeline::{assemble_features_from_files, write_csv, FeatureSources};
use crate::utils::create_spinner;

/// Aggregate the participants, ROI-summary and events tables into one
/// row per participant and write it as CSV.
pub fn run_features(
    participants: &Path,
    roi_summary: &Path,
    events: &Path,
    output: Option<&Path>,
    groups: &[String],
) -> Result<()> {
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => participants
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("samples.csv"),
    };

    println!(
        "\n {} Assembling participant features",
        style("◆").cyan().bold()
    );
    println!("   Participants: {}", style(participants.display()).dim());
    println!("   ROI summary:  {}", style(roi_summary.display()).dim());
    println!("   Events:       {}", style(events.display()).dim());
    println!("   Groups:       {}", style(groups.join(", ")).dim());
    println!("   Output:       {}", style(output_path.display()).dim());
    println!();

    let spinner = create_spinner("Aggregating ROI and saccade metrics...");
    let sources = FeatureSources {
        participants,
        roi_summary,
        events,
    };
    let mut df = assemble_features_from_files(&sources, groups)?;
    spinner.finish_with_message(format!(
        "{} Aggregated {} participant(s)",
        style("✓").green(),
        df.height()
    ));

    for name in df.get_column_names() {
        let nulls = df.column(name)?.null_count();
        if nulls > 0 {
            log::info!("Column '{}' has {} missing value(s)", name, nulls);
        }
    }

    write_csv(&mut df, &output_path)?;
    println!(
        "\n {} Samples table written to {}",
        style("✓").green().bold(),
        style(output_path.display()).cyan()
    );

    Ok(())
}
