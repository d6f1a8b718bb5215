//! Info command

use anyhow::Result;
use bizfly_schema::Formula;
use crossterm::style::Stylize;

use crate::ui::theme::LABEL_WIDTH;

/// Show release metadata
pub fn info(formula: &Formula) -> Result<()> {
    let lw = LABEL_WIDTH;
    let table = formula.artifact_table()?;

    println!();
    println!(
        "  {} {}",
        formula.name.white().bold(),
        formula.version.dark_grey()
    );
    println!("  {}", formula.desc);
    println!();
    println!("  {:<lw$}{}", "homepage", formula.homepage);
    println!("  {:<lw$}{}", "binary", formula.binary);
    println!("  {:<lw$}{}", "archives", table.len());
    println!();
    Ok(())
}
