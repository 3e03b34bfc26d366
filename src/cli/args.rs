//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{CvConfig, ImputationScope, LoadOptions, LogisticConfig, TargetMapping};

/// cvroc - Cross-validated ROC analysis of a participant feature table
#[derive(Parser, Debug)]
#[command(name = "cvroc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Samples table (CSV): one row per participant with id, group and numeric features
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output path for the out-of-fold predictions table (CSV).
    /// Defaults to the input directory with a '_cv_roc_results.csv' suffix.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output path for the text report.
    /// Defaults to the input directory with a '_cv_roc_report.txt' suffix.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Output path for the JSON summary.
    /// Defaults to the input directory with a '_cv_roc.json' suffix.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Participant identifier column
    #[arg(long, default_value = "ParticipantID")]
    pub id_column: String,

    /// Group column mapped to the binary label
    #[arg(long, default_value = "Group")]
    pub group_column: String,

    /// Feature columns (comma-separated). Defaults to every numeric column
    /// other than the id and group columns.
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Group value that represents the EVENT (maps to 1)
    #[arg(long, default_value = "MCI")]
    pub event_value: String,

    /// Group value that represents the NON-EVENT (maps to 0).
    /// Rows matching neither value are ignored.
    #[arg(long, default_value = "Control")]
    pub non_event_value: String,

    /// Number of stratified cross-validation folds
    #[arg(short = 'k', long, default_value = "10", value_parser = validate_folds)]
    pub folds: usize,

    /// Seed for fold assignment and bootstrap resampling
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of bootstrap resamples for the AUC confidence interval
    #[arg(long, default_value = "1000", value_parser = validate_n_bootstrap)]
    pub n_bootstrap: usize,

    /// Confidence level in percent for the bootstrap interval (0-100, exclusive)
    #[arg(long, default_value = "95", value_parser = validate_ci)]
    pub ci: f64,

    /// Inverse L2 regularisation strength of the logistic model
    #[arg(long, default_value = "1.0", value_parser = validate_penalty_c)]
    pub penalty_c: f64,

    /// Maximum Newton iterations per logistic fit
    #[arg(long, default_value = "1000")]
    pub max_iter: usize,

    /// Where mean-imputation statistics come from.
    /// Options: "global" (all samples, default) or "within-fold" (training rows only)
    #[arg(long, default_value = "global")]
    pub imputation: ImputationScope,

    /// Skip interactive confirmation prompts (e.g. overwriting outputs)
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the participant-level samples table from the long-format exports
    Features {
        /// Participants master table (ParticipantID, Group, VR_MMSE_total)
        #[arg(long)]
        participants: PathBuf,

        /// ROI summary table (ParticipantID, FixTime, EnterCount, RegressionCount)
        #[arg(long)]
        roi_summary: PathBuf,

        /// Gaze events table (ParticipantID, EventType, Amplitude_deg)
        #[arg(long)]
        events: PathBuf,

        /// Output path (optional, defaults to 'samples.csv' next to the participants table)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Groups to keep (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "Control,MCI")]
        groups: Vec<String>,
    },
}

impl Cli {
    /// Get the input path if one was provided.
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    fn derived_path(&self, suffix: &str) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        let parent = input.parent().unwrap_or_else(|| Path::new("."));
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("samples");
        Some(parent.join(format!("{}{}", stem, suffix)))
    }

    /// Results table path, derived from input if not explicitly provided.
    pub fn results_path(&self) -> Option<PathBuf> {
        self.output
            .clone()
            .or_else(|| self.derived_path("_cv_roc_results.csv"))
    }

    /// Text report path, derived from input if not explicitly provided.
    pub fn report_path(&self) -> Option<PathBuf> {
        self.report
            .clone()
            .or_else(|| self.derived_path("_cv_roc_report.txt"))
    }

    /// JSON summary path, derived from input if not explicitly provided.
    pub fn json_path(&self) -> Option<PathBuf> {
        self.json.clone().or_else(|| self.derived_path("_cv_roc.json"))
    }

    pub fn mapping(&self) -> TargetMapping {
        TargetMapping::new(self.event_value.clone(), self.non_event_value.clone())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            id_column: self.id_column.clone(),
            group_column: self.group_column.clone(),
            feature_columns: self.features.clone(),
            mapping: self.mapping(),
            infer_schema_length: self.infer_schema_length,
        }
    }

    pub fn cv_config(&self) -> CvConfig {
        CvConfig {
            folds: self.folds,
            seed: self.seed,
            n_bootstrap: self.n_bootstrap,
            ci: self.ci,
            imputation: self.imputation,
            logistic: LogisticConfig {
                c: self.penalty_c,
                max_iter: self.max_iter,
                ..Default::default()
            },
        }
    }
}

/// Validator for the fold count
fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid fold count", s))?;

    if value < 2 {
        Err(format!("folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the bootstrap resample count
fn validate_n_bootstrap(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value == 0 {
        Err("n_bootstrap must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for the confidence level
fn validate_ci(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 100.0 {
        Ok(value)
    } else {
        Err(format!("ci must be between 0 and 100 (exclusive), got {}", value))
    }
}

/// Validator for the regularisation strength
fn validate_penalty_c(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("penalty_c must be a positive number, got {}", value))
    }
}
