//! Interactive prompts using dialoguer

use std::path::PathBuf;

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt before overwriting output files that already exist.
///
/// Returns `true` when nothing exists yet or the user agrees.
pub fn confirm_overwrite(paths: &[PathBuf]) -> Result<bool> {
    let existing: Vec<String> = paths
        .iter()
        .filter(|p| p.exists())
        .map(|p| p.display().to_string())
        .collect();

    if existing.is_empty() {
        return Ok(true);
    }

    let message = format!(
        "Overwrite {} existing file(s): {}?",
        existing.len(),
        existing.join(", ")
    );
    confirm_step(&message)
}
