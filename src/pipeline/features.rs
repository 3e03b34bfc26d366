//! Participant-level feature assembly
//!
//! Builds the samples table from the long-format exports: one participants
//! row per person, many ROI-summary rows and many gaze-event rows. ROI metrics
//! and saccade amplitudes are averaged per participant and left-joined onto
//! the participants restricted to the requested groups.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::loader::load_table;

pub const PARTICIPANT_ID: &str = "ParticipantID";
pub const GROUP: &str = "Group";
pub const COGNITIVE_SCORE: &str = "VR_MMSE_total";

/// Output feature columns, in order
pub const FEATURE_COLUMNS: [&str; 5] = [
    COGNITIVE_SCORE,
    "Mean_FixTime",
    "Mean_EnterCount",
    "Mean_RegressionCount",
    "Mean_Saccade_Amplitude",
];

/// Paths of the three long-format inputs
#[derive(Debug, Clone)]
pub struct FeatureSources<'a> {
    pub participants: &'a Path,
    pub roi_summary: &'a Path,
    pub events: &'a Path,
}

fn string_ids(lf: LazyFrame) -> LazyFrame {
    lf.with_column(col(PARTICIPANT_ID).cast(DataType::String))
}

/// Aggregate the long tables into one row per participant.
///
/// Participants without ROI rows or saccades get nulls, which the classifier
/// later imputes.
pub fn assemble_features(
    participants: LazyFrame,
    roi_summary: LazyFrame,
    events: LazyFrame,
    groups: &[String],
) -> Result<DataFrame> {
    let group_filter = groups
        .iter()
        .map(|g| col(GROUP).eq(lit(g.clone())))
        .reduce(|acc, e| acc.or(e))
        .ok_or_else(|| anyhow::anyhow!("At least one group must be selected"))?;

    let base = string_ids(participants)
        .filter(group_filter)
        .select([col(PARTICIPANT_ID), col(GROUP), col(COGNITIVE_SCORE)]);

    let roi_features = string_ids(roi_summary)
        .group_by([col(PARTICIPANT_ID)])
        .agg([
            col("FixTime").cast(DataType::Float64).mean().alias("Mean_FixTime"),
            col("EnterCount").cast(DataType::Float64).mean().alias("Mean_EnterCount"),
            col("RegressionCount")
                .cast(DataType::Float64)
                .mean()
                .alias("Mean_RegressionCount"),
        ]);

    let saccade_features = string_ids(events)
        .filter(col("EventType").eq(lit("saccade")))
        .group_by([col(PARTICIPANT_ID)])
        .agg([col("Amplitude_deg")
            .cast(DataType::Float64)
            .mean()
            .alias("Mean_Saccade_Amplitude")]);

    let joined = base
        .join(
            roi_features,
            [col(PARTICIPANT_ID)],
            [col(PARTICIPANT_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            saccade_features,
            [col(PARTICIPANT_ID)],
            [col(PARTICIPANT_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()
        .context("Failed to aggregate participant features")?;

    Ok(joined)
}

/// Read the three CSV exports and assemble the samples table
pub fn assemble_features_from_files(sources: &FeatureSources, groups: &[String]) -> Result<DataFrame> {
    let participants = load_table(sources.participants, 10000)?;
    let roi_summary = load_table(sources.roi_summary, 10000)?;
    let events = load_table(sources.events, 10000)?;

    assemble_features(participants.lazy(), roi_summary.lazy(), events.lazy(), groups)
}

/// Write a DataFrame as CSV
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}
