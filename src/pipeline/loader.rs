//! Sample table loader for CSV files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::dataset::Dataset;
use super::target::{column_to_string_vec, create_target_mask, TargetMapping};

/// Which columns of the samples table to read and how to label rows
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub id_column: String,
    pub group_column: String,
    /// Feature columns in order; empty means every numeric column other than
    /// the id and group columns
    pub feature_columns: Vec<String>,
    pub mapping: TargetMapping,
    /// Rows used for CSV schema inference (0 = full scan)
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            id_column: "ParticipantID".to_string(),
            group_column: "Group".to_string(),
            feature_columns: Vec::new(),
            mapping: TargetMapping::default(),
            infer_schema_length: 10000,
        }
    }
}

/// Dataset plus bookkeeping about rows that were left out
#[derive(Debug, Clone)]
pub struct LoadedSamples {
    pub dataset: Dataset,
    /// Rows whose group matched neither the event nor the non-event value
    pub ignored_rows: usize,
    /// Rows in the source table
    pub total_rows: usize,
}

/// Read a comma-separated table with a header row
pub fn load_table(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "csv" {
        anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv",
            extension
        );
    }

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .finish()
        .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        .collect()
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))
}

/// Column names of a table, in file order
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let df = load_table(path, 100)?;
    Ok(df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect())
}

/// Load the samples table and build a labelled dataset
pub fn load_samples(path: &Path, options: &LoadOptions) -> Result<LoadedSamples> {
    let df = load_table(path, options.infer_schema_length)?;
    dataset_from_frame(&df, options)
        .with_context(|| format!("Invalid samples table: {}", path.display()))
}

/// Build a labelled dataset from an already loaded DataFrame.
///
/// Rows whose group maps to neither label are dropped and counted. The id and
/// group columns must exist; requested feature columns must be numeric.
pub fn dataset_from_frame(df: &DataFrame, options: &LoadOptions) -> Result<LoadedSamples> {
    if df.height() == 0 {
        anyhow::bail!("Samples table is empty");
    }

    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for required in [&options.id_column, &options.group_column] {
        if !column_names.contains(required) {
            anyhow::bail!(
                "Column '{}' not found in samples table. Available columns: {:?}",
                required,
                column_names
            );
        }
    }

    let feature_columns = resolve_feature_columns(df, options)?;
    if feature_columns.is_empty() {
        anyhow::bail!("Samples table has no numeric feature columns");
    }

    let mask = create_target_mask(df, &options.group_column, &options.mapping)?;
    let ids = column_to_string_vec(df.column(&options.id_column)?)?;
    let groups = column_to_string_vec(df.column(&options.group_column)?)?;

    let mut feature_values: Vec<Vec<Option<f64>>> = Vec::with_capacity(feature_columns.len());
    for name in &feature_columns {
        let col = df.column(name)?.cast(&DataType::Float64)?;
        feature_values.push(col.f64()?.into_iter().collect());
    }

    let mut kept_ids = Vec::new();
    let mut kept_groups = Vec::new();
    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for (i, label) in mask.iter().enumerate() {
        let Some(label) = *label else { continue };
        let id = ids[i]
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Row {} has no value in '{}'", i, options.id_column))?;
        kept_ids.push(id);
        kept_groups.push(groups[i].clone().unwrap_or_default().trim().to_string());
        rows.push(feature_values.iter().map(|col| col[i]).collect());
        labels.push(label);
    }

    let ignored_rows = df.height() - labels.len();
    let positives = labels.iter().filter(|&&l| l == 1).count();
    if positives == 0 || positives == labels.len() {
        anyhow::bail!(
            "Need both '{}' and '{}' rows in column '{}'; found {} and {}",
            options.mapping.event_value,
            options.mapping.non_event_value,
            options.group_column,
            positives,
            labels.len() - positives
        );
    }

    let dataset = Dataset::new(kept_ids, kept_groups, feature_columns, rows, labels)?;

    Ok(LoadedSamples {
        dataset,
        ignored_rows,
        total_rows: df.height(),
    })
}

fn resolve_feature_columns(df: &DataFrame, options: &LoadOptions) -> Result<Vec<String>> {
    if options.feature_columns.is_empty() {
        return Ok(df
            .get_columns()
            .iter()
            .filter(|col| {
                col.dtype().is_primitive_numeric()
                    && col.name().as_str() != options.id_column
                    && col.name().as_str() != options.group_column
            })
            .map(|col| col.name().to_string())
            .collect());
    }

    for name in &options.feature_columns {
        let col = df
            .column(name)
            .with_context(|| format!("Feature column '{}' not found", name))?;
        // All-null columns are read back as String; let them through so the
        // dataset check reports them as missing data
        let dtype = col.dtype();
        if !(dtype.is_primitive_numeric() || col.null_count() == col.len()) {
            anyhow::bail!("Feature column '{}' must be numeric, found {}", name, dtype);
        }
    }
    Ok(options.feature_columns.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_from_frame_filters_groups() {
        let df = df! {
            "ParticipantID" => ["c01", "m01", "a01", "c02", "m02"],
            "Group" => ["Control", "MCI", "AD", "Control", "MCI"],
            "VR_MMSE_total" => [29.0f64, 24.0, 15.0, 28.0, 23.0],
            "Mean_FixTime" => [Some(210.0f64), Some(260.0), Some(300.0), None, Some(270.0)],
        }
        .unwrap();

        let loaded = dataset_from_frame(&df, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.ignored_rows, 1);
        assert_eq!(loaded.total_rows, 5);
        assert_eq!(loaded.dataset.ids, vec!["c01", "m01", "c02", "m02"]);
        assert_eq!(loaded.dataset.labels, vec![0, 1, 0, 1]);
        assert_eq!(
            loaded.dataset.feature_names,
            vec!["VR_MMSE_total", "Mean_FixTime"]
        );
        assert_eq!(loaded.dataset.features[2], vec![Some(28.0), None]);
    }

    #[test]
    fn test_explicit_feature_order() {
        let df = df! {
            "ParticipantID" => ["c01", "m01"],
            "Group" => ["Control", "MCI"],
            "a" => [1.0f64, 2.0],
            "b" => [3.0f64, 4.0],
        }
        .unwrap();
        let options = LoadOptions {
            feature_columns: vec!["b".to_string(), "a".to_string()],
            ..Default::default()
        };
        let loaded = dataset_from_frame(&df, &options).unwrap();
        assert_eq!(loaded.dataset.features[0], vec![Some(3.0), Some(1.0)]);
    }

    #[test]
    fn test_missing_id_column() {
        let df = df! {
            "Group" => ["Control", "MCI"],
            "a" => [1.0f64, 2.0],
        }
        .unwrap();
        let err = dataset_from_frame(&df, &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("ParticipantID"));
    }

    #[test]
    fn test_single_class_rejected() {
        let df = df! {
            "ParticipantID" => ["c01", "c02"],
            "Group" => ["Control", "Control"],
            "a" => [1.0f64, 2.0],
        }
        .unwrap();
        assert!(dataset_from_frame(&df, &LoadOptions::default()).is_err());
    }

    #[test]
    fn test_non_numeric_feature_rejected() {
        let df = df! {
            "ParticipantID" => ["c01", "m01"],
            "Group" => ["Control", "MCI"],
            "site" => ["A", "B"],
        }
        .unwrap();
        let options = LoadOptions {
            feature_columns: vec!["site".to_string()],
            ..Default::default()
        };
        let err = dataset_from_frame(&df, &options).unwrap_err();
        assert!(err.to_string().contains("numeric"));
    }
}
