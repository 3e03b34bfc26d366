//! Group column mapping
//!
//! Maps the categorical group column (Control / MCI / AD) to the binary label
//! used by the classifier. Rows whose group matches neither side are ignored.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Mapping configuration for converting group values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl TargetMapping {
    /// Create a new target mapping
    pub fn new(event_value: String, non_event_value: String) -> Self {
        Self {
            event_value,
            non_event_value,
        }
    }

    /// Label for a single group value
    pub fn label_for(&self, value: &str) -> Option<u8> {
        if value == self.event_value {
            Some(1)
        } else if value == self.non_event_value {
            Some(0)
        } else {
            None
        }
    }
}

impl Default for TargetMapping {
    fn default() -> Self {
        Self::new("MCI".to_string(), "Control".to_string())
    }
}

/// Create a binary label mask for the group column.
///
/// Returns a Vec<Option<u8>> where:
/// - Some(1) for event values
/// - Some(0) for non-event values
/// - None for values that match neither (excluded from analysis)
pub fn create_target_mask(
    df: &DataFrame,
    group_column: &str,
    mapping: &TargetMapping,
) -> Result<Vec<Option<u8>>> {
    let group_col = df
        .column(group_column)
        .with_context(|| format!("Group column '{}' not found", group_column))?;

    let string_values = column_to_string_vec(group_col)?;

    Ok(string_values
        .iter()
        .map(|v| v.as_deref().and_then(|s| mapping.label_for(s.trim())))
        .collect())
}

/// Convert a column to a Vec of Option<String> for comparison
pub(crate) fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            // For other types, try to cast to string
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

/// Count how many records are events, non-events and ignored
pub fn count_mapped_records(
    df: &DataFrame,
    group_column: &str,
    mapping: &TargetMapping,
) -> Result<(usize, usize, usize)> {
    let mask = create_target_mask(df, group_column, mapping)?;

    let events = mask.iter().filter(|v| **v == Some(1)).count();
    let non_events = mask.iter().filter(|v| **v == Some(0)).count();
    let ignored = mask.iter().filter(|v| v.is_none()).count();

    Ok((events, non_events, ignored))
}
