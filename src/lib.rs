//! cvroc: Cross-validated ROC analysis library
//!
//! Stratified K-fold evaluation of an L2 logistic classifier on a
//! participant feature table, with bootstrap AUC intervals, a Youden
//! operating point and text/CSV/JSON reporting.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
