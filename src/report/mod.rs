//! Report module - results table, text report, JSON export and terminal summary

pub mod json_export;
pub mod results_export;
pub mod summary;
pub mod text_report;

pub use json_export::*;
pub use results_export::*;
pub use summary::*;
pub use text_report::*;
