//! CLI module - argument parsing, interactive prompts and subcommands

mod args;
pub mod features;
mod prompts;

pub use args::{Cli, Commands};
pub use prompts::*;
