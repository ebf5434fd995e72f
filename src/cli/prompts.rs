//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{Confirm, Select};

use super::args::Section;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Ask whether an optional section should run.
///
/// The expensive relevance section defaults to "no".
pub fn confirm_section(section: Section) -> Result<bool> {
    confirm_step(section.prompt(), section != Section::Relevance)
}

/// Let the user pick the target column when the configured one is missing
pub fn select_target(columns: &[&str]) -> Result<String> {
    let index = Select::new()
        .with_prompt("Target column not found - select the target column")
        .items(columns)
        .default(0)
        .interact()?;
    Ok(columns[index].to_string())
}
