//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::{CvConfig, TargetMapping};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static DICE: Emoji<'_, '_> = Emoji("🎲 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ██████╗██╗   ██╗      ██████╗  ██████╗  ██████╗
    ██╔════╝██║   ██║      ██╔══██╗██╔═══██╗██╔════╝
    ██║     ██║   ██║█████╗██████╔╝██║   ██║██║
    ██║     ╚██╗ ██╔╝╚════╝██╔══██╗██║   ██║██║
    ╚██████╗ ╚████╔╝       ██║  ██║╚██████╔╝╚██████╗
     ╚═════╝  ╚═══╝        ╚═╝  ╚═╝ ╚═════╝  ╚═════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Cross-validated ROC analysis, leakage-safe by default").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, mapping: &TargetMapping, results: &Path, config: &CvConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:   {:<38}│", FOLDER, truncate_path(input, 37));
    println!(
        "    │  {} Compare: {:<38}│",
        TARGET,
        truncate_string(
            &format!("{} vs {}", mapping.event_value, mapping.non_event_value),
            37
        )
    );
    println!("    │  {} Results: {:<38}│", SAVE, truncate_path(results, 37));
    println!("    ├{}┤", line);
    println!(
        "    │  {} Folds / bootstrap:  {:<27}│",
        CHART,
        style(format!("{} / {}", config.folds, config.n_bootstrap)).yellow()
    );
    println!(
        "    │  {} Seed / CI level:    {:<27}│",
        DICE,
        style(format!("{} / {}%", config.seed, config.ci)).yellow()
    );
    println!(
        "    │  {} Imputation:         {:<27}│",
        INFO,
        style(config.imputation.to_string()).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("cvroc evaluation complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

/// Print elapsed time for a step
pub fn print_step_time(elapsed: std::time::Duration) {
    println!(
        "      {}",
        style(format!("({:.2}s)", elapsed.as_secs_f64())).dim()
    );
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
