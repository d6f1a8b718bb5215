//! Platforms command

use anyhow::Result;
use bizfly_schema::Formula;
use crossterm::style::Stylize;

/// List every archive in the release table
pub fn platforms(formula: &Formula, json: bool) -> Result<()> {
    let table = formula.artifact_table()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    let width = table
        .entries()
        .iter()
        .map(|e| e.target.to_string().len())
        .max()
        .unwrap_or(0)
        + 2;

    for entry in table.entries() {
        println!(
            "  {:<width$}{}  {}",
            entry.target.to_string(),
            entry.filename(),
            entry.sha256.as_str().dark_grey()
        );
    }
    Ok(())
}
